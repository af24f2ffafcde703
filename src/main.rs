//! Conformance runner.
//!
//! Builds the resource registry against the live service, runs the full
//! check battery for every resource, prints the summary report, and exits
//! non-zero if any check failed. Takes no arguments; `RUST_LOG` controls
//! verbosity.

use jsonplaceholder_conformance::{
    init_logging, ApiClient, ConformanceChecker, ResourceRegistry, RunReport, SuiteConfig,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging("info");

    let config = SuiteConfig::default();
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(host = %config.host, "Starting conformance run");

    let client = ApiClient::new(&config)?;
    let registry = ResourceRegistry::discover(&client).await?;

    let checker = ConformanceChecker::new(client, config);
    let mut report = RunReport::new();
    for definition in registry.definitions() {
        info!(resource = definition.name, "Running check battery");
        report.record_all(checker.run_battery(definition).await);
    }

    print!("{report}");

    if !report.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}
