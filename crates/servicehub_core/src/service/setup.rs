//! Readiness capabilities an implementation may opt into.

use async_trait::async_trait;
use std::error::Error;

/// Failure payload returned by constructors and setup hooks.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Synchronous readiness: the implementation manages its own readiness and
/// never suspends the registration flow.
pub trait SyncSetup: Send {
    fn setup(&mut self) -> Result<(), BoxError>;
}

/// Asynchronous readiness (network calls, file loads, cache warm-up).
///
/// Registration does not complete until this future resolves.
#[async_trait]
pub trait AsyncSetup: Send {
    async fn async_setup(&mut self) -> Result<(), BoxError>;
}

/// The single hook the registry drives for one instance.
pub enum SetupHook<'a> {
    /// No hook; ready immediately after construction.
    Ready,
    Sync(&'a mut dyn SyncSetup),
    Async(&'a mut dyn AsyncSetup),
}

impl SetupHook<'_> {
    /// Stable label used in diagnostic records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "none",
            Self::Sync(_) => "sync",
            Self::Async(_) => "async",
        }
    }

    /// Runs the selected hook to completion.
    pub(crate) async fn run(self) -> Result<(), BoxError> {
        match self {
            Self::Ready => Ok(()),
            Self::Sync(hook) => hook.setup(),
            Self::Async(hook) => hook.async_setup().await,
        }
    }
}
