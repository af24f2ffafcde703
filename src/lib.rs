//! # jsonplaceholder-conformance - REST API Conformance Suite
//!
//! A conformance test suite for the fixed, externally hosted REST service
//! at `jsonplaceholder.typicode.com`. The service exposes six resource
//! collections with standard CRUD verbs and simple parent/child
//! relationships; this crate issues live HTTP requests against it and
//! asserts status codes, Content-Type headers, and JSON response shape
//! against a dynamically discovered field set per resource.
//!
//! ## Resources
//!
//! | Resource | Parent filter key |
//! |----------|------------------|
//! | posts | `userId` |
//! | comments | `postId` |
//! | albums | `userId` |
//! | photos | `albumId` |
//! | todos | `userId` |
//! | users | — |
//!
//! ## Checked operations
//!
//! | Operation | Request | Expected |
//! |-----------|---------|----------|
//! | GET by id | `GET /{name}/1` | 200, object with all discovered fields |
//! | GET by id (out of range) | `GET /{name}/{len+10}` | 404 |
//! | GET collection | `GET /{name}` | 200, array; element 0 has all fields |
//! | GET filtered | `GET /{name}?{key}=1` | 200, array; element 1 has all fields |
//! | GET filtered (out of range) | `GET /{name}?{key}={len+10}` | 404 |
//! | POST | `POST /{name}` full field map | 201, object echoing the fields |
//! | PUT | `PUT /{name}/1` full field map | 200, object with all fields |
//! | PATCH (full) | `PATCH /{name}/1` full field map | 200, object with all fields |
//! | PATCH (single) | `PATCH /{name}/1` one field | 200, field carries the new value |
//! | DELETE | `DELETE /{name}/1` | 200 |
//! | POST (oversized) | `POST /{name}` ~100 000 keys | rejected |
//!
//! Every successful response must carry
//! `Content-Type: application/json; charset=utf-8`.
//!
//! ## Execution model
//!
//! Fully sequential: each check is one blocking request/response cycle
//! bounded by a fixed timeout. The resource registry is built once, up
//! front, by live discovery calls ([`registry::ResourceRegistry::discover`])
//! and is read-only afterwards; a discovery failure aborts the whole run.
//! Check failures are local: an assertion mismatch or transport failure
//! fails one [`checker::CheckResult`] and nothing else.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use jsonplaceholder_conformance::{
//!     ApiClient, ConformanceChecker, ResourceRegistry, RunReport, SuiteConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SuiteConfig::default();
//!     let client = ApiClient::new(&config)?;
//!     let registry = ResourceRegistry::discover(&client).await?;
//!
//!     let checker = ConformanceChecker::new(client, config);
//!     let mut report = RunReport::new();
//!     for definition in registry.definitions() {
//!         report.record_all(checker.run_battery(definition).await);
//!     }
//!
//!     print!("{report}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Suite configuration and compile-time constants
//! - [`error`] - Discovery/transport/assertion failure taxonomy
//! - [`client`] - reqwest wrapper and transport scheme handling
//! - [`registry`] - Static resource table and live field discovery
//! - [`assertions`] - Value-level response assertions
//! - [`checker`] - The per-operation conformance checks
//! - [`report`] - Run summary and exit-status mapping

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod assertions;
pub mod checker;
pub mod client;
pub mod config;
pub mod error;
pub mod registry;
pub mod report;

// Re-export commonly used types
pub use checker::{CheckResult, ConformanceChecker, Operation};
pub use client::{ApiClient, Scheme};
pub use config::SuiteConfig;
pub use error::{Assertion, CheckError, DiscoveryError};
pub use registry::{ResourceDefinition, ResourceRegistry};
pub use report::RunReport;

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The default log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jsonplaceholder_conformance={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
