//! Shared plumbing for the live conformance tests.
//!
//! The resource registry is discovered once per test run and cached; every
//! test gets its own checker over a fresh client with the test timeouts.

use jsonplaceholder_conformance::{
    ApiClient, ConformanceChecker, ResourceRegistry, SuiteConfig,
};
use tokio::sync::OnceCell;

static REGISTRY: OnceCell<ResourceRegistry> = OnceCell::const_new();

/// Creates a checker with the test configuration.
pub fn checker() -> ConformanceChecker {
    let config = SuiteConfig::for_testing();
    let client = ApiClient::new(&config).expect("Failed to build HTTP client");
    ConformanceChecker::new(client, config)
}

/// Returns the shared resource registry, discovering it on first use.
pub async fn registry() -> &'static ResourceRegistry {
    REGISTRY
        .get_or_init(|| async {
            let config = SuiteConfig::for_testing();
            let client = ApiClient::new(&config).expect("Failed to build HTTP client");
            ResourceRegistry::discover(&client)
                .await
                .expect("Field discovery against the live service failed")
        })
        .await
}
