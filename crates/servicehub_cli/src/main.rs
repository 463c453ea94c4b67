//! CLI smoke entry point.
//!
//! # Responsibility
//! - Bootstrap the demo services from a manifest and install the registry.
//! - Print the registry snapshot as JSON for quick local sanity checks.
//!
//! Usage: `servicehub_cli [manifest.json]`. Logging is enabled when
//! `SERVICEHUB_LOG_DIR` is set.

mod demo;

use demo::{Clock, Logger};
use servicehub_core::{bootstrap, install, BootstrapManifest, LoggingConfig, ServiceRegistry};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("servicehub: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(config) = LoggingConfig::from_env() {
        config.init()?;
    }

    let manifest = match std::env::args().nth(1) {
        Some(path) => BootstrapManifest::load(path)?,
        None => BootstrapManifest::from_json_str(demo::DEFAULT_MANIFEST)?,
    };

    let catalog = demo::catalog()?;
    for implementation in catalog.implementations() {
        log::debug!(
            "event=catalog_entry module=cli implementation={} contract={}",
            implementation.name(),
            implementation.contract().name()
        );
    }

    let mut registry = ServiceRegistry::new();
    bootstrap(&mut registry, &catalog, &manifest).await?;
    let registry = install(registry)?;
    log::info!(
        "event=cli_ready module=cli status=ok version={} services={}",
        servicehub_core::core_version(),
        registry.len()
    );

    if registry.contains::<dyn Logger>() && registry.contains::<dyn Clock>() {
        registry.use_services2::<dyn Logger, dyn Clock, _>(|logger, clock| {
            logger.write(&format!("clock reads {}ms", clock.now_ms()));
        })?;
    }

    println!("{}", serde_json::to_string_pretty(&registry.snapshot())?);
    Ok(())
}
