//! Suite configuration.
//!
//! The service under test is fixed, so everything here is a compile-time
//! constant with a [`SuiteConfig`] wrapper for the few knobs the checker
//! needs (timeouts, sentinel value, payload sizes). There are no CLI flags
//! and no config files; verbosity is governed by `RUST_LOG`.

use std::time::Duration;

/// Host of the service under test.
pub const SERVICE_HOST: &str = "jsonplaceholder.typicode.com";

/// Placeholder value written into every field of request bodies.
pub const SENTINEL: &str = "foo bar";

/// The names of the six resource collections exposed by the service.
pub const RESOURCE_NAMES: [&str; 6] = ["posts", "comments", "albums", "photos", "todos", "users"];

/// Configuration for a conformance run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Host of the service under test.
    pub host: String,

    /// Per-request timeout applied to every check.
    pub request_timeout: Duration,

    /// Timeout for the oversized-payload POST, which is expected to fail
    /// within this bound.
    pub oversized_request_timeout: Duration,

    /// Number of keys in the oversized POST payload.
    pub oversized_payload_keys: usize,

    /// Added to the live collection length to produce an out-of-range id.
    pub out_of_range_offset: u64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            host: SERVICE_HOST.to_string(),
            request_timeout: Duration::from_secs(5),
            oversized_request_timeout: Duration::from_secs(10),
            oversized_payload_keys: 100_000,
            out_of_range_offset: 10,
        }
    }
}

impl SuiteConfig {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push("Host cannot be empty".to_string());
        }

        if self.request_timeout.is_zero() {
            errors.push("Request timeout cannot be zero".to_string());
        }

        if self.oversized_request_timeout.is_zero() {
            errors.push("Oversized request timeout cannot be zero".to_string());
        }

        if self.oversized_payload_keys == 0 {
            errors.push("Oversized payload key count cannot be zero".to_string());
        }

        if self.out_of_range_offset == 0 {
            errors.push("Out-of-range offset cannot be zero".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Creates a configuration with short timeouts, suitable for tests.
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(3),
            oversized_request_timeout: Duration::from_secs(10),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SuiteConfig::default();
        assert_eq!(config.host, SERVICE_HOST);
        assert_eq!(config.oversized_payload_keys, 100_000);
        assert_eq!(config.out_of_range_offset, 10);
    }

    #[test]
    fn test_validate_valid() {
        assert!(SuiteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_host() {
        let config = SuiteConfig {
            host: String::new(),
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().iter().any(|e| e.contains("Host")));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = SuiteConfig {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resource_names_cover_all_collections() {
        assert_eq!(RESOURCE_NAMES.len(), 6);
        assert!(RESOURCE_NAMES.contains(&"posts"));
        assert!(RESOURCE_NAMES.contains(&"users"));
    }
}
