//! Error types for the conformance suite.
//!
//! The suite distinguishes three failure categories:
//!
//! | Category | Type | Effect |
//! |----------|------|--------|
//! | Discovery failure | [`DiscoveryError`] | Fatal; aborts the whole run |
//! | Transport failure | [`CheckError::Transport`] | Fails the one check |
//! | Assertion mismatch | [`CheckError::Assertion`] | Fails the one check |
//!
//! A transport failure (timeout, connection error) is never folded into an
//! assertion mismatch; the two are reported as distinct categories.

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Fatal error raised while building the resource registry.
///
/// No checks can execute without field definitions, so any of these aborts
/// suite setup. There are no retries.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The discovery request errored at transport level.
    #[error("discovery request for `{resource}` failed: {source}")]
    Request {
        /// The resource being discovered.
        resource: &'static str,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The discovery response body was not a JSON object.
    #[error("discovery response for `{resource}` is not a JSON object (got {actual})")]
    NotAnObject {
        /// The resource being discovered.
        resource: &'static str,
        /// JSON type of the body actually returned.
        actual: &'static str,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The configured host does not form a valid base URL.
    #[error("invalid base URL: {0}")]
    BaseUrl(#[source] url::ParseError),
}

/// Non-fatal error scoped to a single conformance check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The request timed out or the connection failed.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// An asserted condition on the response was false.
    #[error("assertion failed: {0}")]
    Assertion(#[from] Assertion),
}

impl CheckError {
    /// Returns true for transport-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, CheckError::Transport(_))
    }
}

/// A single failed assertion, carrying expected vs. actual.
#[derive(Debug, Error)]
pub enum Assertion {
    /// Status code mismatch.
    #[error("expected status {expected}, got {actual}")]
    Status {
        /// Expected status code.
        expected: StatusCode,
        /// Status code actually returned.
        actual: StatusCode,
    },

    /// Content-Type header mismatch.
    #[error("expected content type `{expected}`, got `{actual}`")]
    ContentType {
        /// Expected media type.
        expected: String,
        /// Header value actually returned (or `<missing>`).
        actual: String,
    },

    /// The body had the wrong JSON shape (object vs. array vs. scalar).
    #[error("expected a JSON {expected}, got {actual}")]
    Shape {
        /// Expected JSON type.
        expected: &'static str,
        /// JSON type actually returned.
        actual: &'static str,
    },

    /// The array body had too few elements to inspect.
    #[error("expected an array with more than {index} elements, got {len}")]
    ArrayTooShort {
        /// Index that was about to be inspected.
        index: usize,
        /// Actual array length.
        len: usize,
    },

    /// A discovered field was absent from the response body.
    #[error("missing field `{field}` in {context}")]
    MissingField {
        /// The absent field name.
        field: String,
        /// Where the field was expected (e.g. "response object").
        context: &'static str,
    },

    /// A field did not carry the expected value.
    #[error("expected field `{field}` to equal {expected}, got {actual}")]
    FieldValue {
        /// The field name.
        field: String,
        /// Expected value.
        expected: Value,
        /// Value actually returned.
        actual: Value,
    },

    /// The service accepted a payload it was expected to reject.
    #[error("expected the oversized payload to be rejected, got status {status}")]
    OversizedPayloadAccepted {
        /// Success status actually returned.
        status: StatusCode,
    },
}

/// Returns the JSON type name of a value, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Result type alias for a single conformance check.
pub type CheckOutcome = Result<(), CheckError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_assertion_display() {
        let err = Assertion::Status {
            expected: StatusCode::OK,
            actual: StatusCode::NOT_FOUND,
        };
        assert_eq!(err.to_string(), "expected status 200 OK, got 404 Not Found");
    }

    #[test]
    fn test_content_type_assertion_display() {
        let err = Assertion::ContentType {
            expected: "application/json; charset=utf-8".to_string(),
            actual: "text/html".to_string(),
        };
        assert!(err.to_string().contains("text/html"));
        assert!(err.to_string().contains("application/json"));
    }

    #[test]
    fn test_missing_field_display() {
        let err = Assertion::MissingField {
            field: "userId".to_string(),
            context: "response object",
        };
        assert_eq!(
            err.to_string(),
            "missing field `userId` in response object"
        );
    }

    #[test]
    fn test_field_value_display() {
        let err = Assertion::FieldValue {
            field: "body".to_string(),
            expected: json!("foo bar"),
            actual: json!("quux"),
        };
        assert!(err.to_string().contains("\"foo bar\""));
        assert!(err.to_string().contains("\"quux\""));
    }

    #[test]
    fn test_check_error_categories() {
        let err = CheckError::from(Assertion::Shape {
            expected: "object",
            actual: "array",
        });
        assert!(!err.is_transport());
        assert!(err.to_string().starts_with("assertion failed:"));
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!({})), "object");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!(1)), "number");
        assert_eq!(json_type_name(&json!(null)), "null");
    }
}
