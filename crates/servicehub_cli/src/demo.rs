//! Demo services wired by the smoke binary.

use servicehub_core::{
    implements, AsyncSetup, BoxError, CatalogError, Provider, Service, ServiceCatalog, SetupHook,
    SyncSetup,
};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Logger: Service {
    fn write(&self, line: &str);
}

pub trait Clock: Service {
    fn now_ms(&self) -> u128;
}

pub struct ConsoleLogger {
    written: Mutex<usize>,
}

impl Service for ConsoleLogger {
    fn name(&self) -> &str {
        "ConsoleLogger"
    }

    fn debug_fields(&self) -> BTreeMap<String, String> {
        let written = self.written.lock().map(|count| *count).unwrap_or_default();
        BTreeMap::from([("lines_written".to_string(), written.to_string())])
    }
}

impl Provider for ConsoleLogger {
    fn construct() -> Result<Self, BoxError> {
        Ok(Self {
            written: Mutex::new(0),
        })
    }

    fn setup_hook(&mut self) -> SetupHook<'_> {
        SetupHook::Sync(self)
    }
}

impl SyncSetup for ConsoleLogger {
    fn setup(&mut self) -> Result<(), BoxError> {
        self.write("ready");
        Ok(())
    }
}

impl Logger for ConsoleLogger {
    fn write(&self, line: &str) {
        eprintln!("[console] {line}");
        if let Ok(mut count) = self.written.lock() {
            *count += 1;
        }
    }
}

pub struct SystemClock {
    started_at_ms: u128,
}

impl Service for SystemClock {
    fn name(&self) -> &str {
        "SystemClock"
    }

    fn debug_fields(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("started_at_ms".to_string(), self.started_at_ms.to_string())])
    }
}

impl Provider for SystemClock {
    fn construct() -> Result<Self, BoxError> {
        Ok(Self { started_at_ms: 0 })
    }

    fn setup_hook(&mut self) -> SetupHook<'_> {
        SetupHook::Async(self)
    }
}

#[async_trait::async_trait]
impl AsyncSetup for SystemClock {
    async fn async_setup(&mut self) -> Result<(), BoxError> {
        self.started_at_ms = self.now_ms();
        Ok(())
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default()
    }
}

implements!(ConsoleLogger: dyn Logger);
implements!(SystemClock: dyn Clock);

/// Implementations the smoke binary can bootstrap by name.
pub fn catalog() -> Result<ServiceCatalog, CatalogError> {
    ServiceCatalog::new()
        .with::<dyn Logger, ConsoleLogger>()?
        .with::<dyn Clock, SystemClock>()
}

pub const DEFAULT_MANIFEST: &str = r#"{
  "services": [
    { "contract": "Logger", "implementation": "ConsoleLogger" },
    { "contract": "Clock", "implementation": "SystemClock" }
  ]
}"#;
