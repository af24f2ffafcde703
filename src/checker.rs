//! The conformance checker.
//!
//! One check per CRUD operation, each a single stateless request/response
//! cycle against a [`ResourceDefinition`]. Checks assert status code,
//! Content-Type, and field presence, and report failures as structured
//! [`CheckResult`]s rather than panicking, so one failed check never
//! affects another.
//!
//! The only checks with a prerequisite request are the two "missing"
//! lookups, which first fetch the current collection length to compute an
//! out-of-range id.

use std::fmt::{self, Display};

use http::header::HeaderMap;
use http::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::assertions::{
    assert_array_element_fields, assert_field_value, assert_json_content_type,
    assert_object_fields, assert_status,
};
use crate::client::{ApiClient, Scheme};
use crate::config::{SuiteConfig, SENTINEL};
use crate::error::{json_type_name, Assertion, CheckError, CheckOutcome};
use crate::registry::ResourceDefinition;

/// One conformance operation against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// GET the whole collection.
    GetCollection,
    /// GET a single record by id.
    GetById,
    /// GET an out-of-range id, expecting 404.
    GetByIdMissing,
    /// GET the collection filtered by parent id.
    GetFiltered,
    /// GET filtered by an out-of-range parent id, expecting 404.
    GetFilteredMissing,
    /// POST a new record built from the discovered field set.
    Post,
    /// PUT the full field map onto record 1.
    Put,
    /// PATCH record 1 with the full field map.
    PatchFull,
    /// PATCH record 1 with a single field, asserting the mutation.
    PatchField,
    /// DELETE record 1.
    Delete,
    /// POST an oversized payload, expecting rejection.
    PostOversized,
}

impl Operation {
    /// Read checks that run over both transport schemes.
    pub const ID_READS: [Operation; 2] = [Operation::GetById, Operation::GetByIdMissing];

    /// Read checks that run over https only.
    pub const COLLECTION_READS: [Operation; 3] = [
        Operation::GetCollection,
        Operation::GetFiltered,
        Operation::GetFilteredMissing,
    ];

    /// Write checks, all over https.
    pub const WRITES: [Operation; 6] = [
        Operation::Post,
        Operation::Put,
        Operation::PatchFull,
        Operation::PatchField,
        Operation::Delete,
        Operation::PostOversized,
    ];
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::GetCollection => "GET collection",
            Operation::GetById => "GET by id",
            Operation::GetByIdMissing => "GET by id (out of range)",
            Operation::GetFiltered => "GET filtered by parent id",
            Operation::GetFilteredMissing => "GET filtered (out of range)",
            Operation::Post => "POST",
            Operation::Put => "PUT",
            Operation::PatchFull => "PATCH (full fields)",
            Operation::PatchField => "PATCH (single field)",
            Operation::Delete => "DELETE",
            Operation::PostOversized => "POST (oversized payload)",
        };
        f.write_str(label)
    }
}

/// Outcome of one conformance check, consumed by the reporter.
#[derive(Debug)]
pub struct CheckResult {
    /// The resource the check ran against.
    pub resource: &'static str,

    /// The operation that was checked.
    pub operation: Operation,

    /// Transport scheme the check used.
    pub scheme: Scheme,

    /// Whether every asserted condition held.
    pub passed: bool,

    /// The failed assertion or transport error, when `passed` is false.
    pub details: Option<String>,
}

impl CheckResult {
    /// Wraps a check outcome, logging failures as they are recorded.
    pub fn from_outcome(
        resource: &'static str,
        operation: Operation,
        scheme: Scheme,
        outcome: CheckOutcome,
    ) -> Self {
        match outcome {
            Ok(()) => {
                debug!(resource, operation = %operation, %scheme, "check passed");
                Self {
                    resource,
                    operation,
                    scheme,
                    passed: true,
                    details: None,
                }
            }
            Err(error) => {
                warn!(resource, operation = %operation, %scheme, %error, "check failed");
                Self {
                    resource,
                    operation,
                    scheme,
                    passed: false,
                    details: Some(error.to_string()),
                }
            }
        }
    }
}

/// Validates an out-of-range lookup response: 404 with the JSON media
/// type, like every other response from the service.
fn assert_not_found_response(status: StatusCode, headers: &HeaderMap) -> Result<(), Assertion> {
    assert_status(status, StatusCode::NOT_FOUND)?;
    assert_json_content_type(headers)?;
    Ok(())
}

/// Builds the request body `{field: "foo bar"}` for every expected field.
pub fn full_field_payload(definition: &ResourceDefinition) -> Value {
    let map: Map<String, Value> = definition
        .expected_fields
        .iter()
        .map(|field| (field.clone(), Value::String(SENTINEL.to_string())))
        .collect();
    Value::Object(map)
}

/// Builds a payload with `keys` distinct keys, for the oversized POST.
pub fn oversized_payload(keys: usize) -> Value {
    let map: Map<String, Value> = (0..keys)
        .map(|i| (i.to_string(), Value::String(SENTINEL.to_string())))
        .collect();
    Value::Object(map)
}

/// Runs the conformance battery against resource definitions.
#[derive(Debug)]
pub struct ConformanceChecker {
    client: ApiClient,
    config: SuiteConfig,
}

impl ConformanceChecker {
    /// Creates a checker over an existing client.
    pub fn new(client: ApiClient, config: SuiteConfig) -> Self {
        Self { client, config }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetches the current length of the collection, for out-of-range ids.
    async fn collection_length(&self, definition: &ResourceDefinition) -> Result<u64, CheckError> {
        let response = self.client.get(Scheme::Https, definition.name).await?;
        let body: Value = response.json().await?;
        let array = body.as_array().ok_or(Assertion::Shape {
            expected: "array",
            actual: json_type_name(&body),
        })?;
        Ok(array.len() as u64)
    }

    fn out_of_range(&self, length: u64) -> u64 {
        length + self.config.out_of_range_offset
    }

    /// GET /{name}/{id}: 200, JSON content type, object with all fields.
    pub async fn get_by_id(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
        id: u64,
    ) -> CheckOutcome {
        let path = format!("{}/{}", definition.name, id);
        let response = self.client.get(scheme, &path).await?;

        assert_status(response.status(), StatusCode::OK)?;
        assert_json_content_type(response.headers())?;

        let body: Value = response.json().await?;
        assert_object_fields(&body, &definition.expected_fields)?;
        Ok(())
    }

    /// GET /{name}/{length+offset}: 404 with the JSON content type.
    pub async fn get_by_id_missing(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
    ) -> CheckOutcome {
        let length = self.collection_length(definition).await?;
        let path = format!("{}/{}", definition.name, self.out_of_range(length));
        let response = self.client.get(scheme, &path).await?;

        assert_not_found_response(response.status(), response.headers())?;
        Ok(())
    }

    /// GET /{name}: 200, JSON content type, array whose first element has
    /// all fields.
    pub async fn get_collection(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
    ) -> CheckOutcome {
        let response = self.client.get(scheme, definition.name).await?;

        assert_status(response.status(), StatusCode::OK)?;
        assert_json_content_type(response.headers())?;

        let body: Value = response.json().await?;
        assert_array_element_fields(&body, 0, &definition.expected_fields)?;
        Ok(())
    }

    /// GET /{name}?{filterKey}=1: 200, JSON content type, array whose
    /// second element has all fields. Passes trivially for resources
    /// without a parent.
    pub async fn get_filtered(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
    ) -> CheckOutcome {
        let Some(key) = definition.filter_key else {
            debug!(resource = definition.name, "no parent filter key; nothing to check");
            return Ok(());
        };

        let response = self
            .client
            .get_with_query(scheme, definition.name, key, "1".to_string())
            .await?;

        assert_status(response.status(), StatusCode::OK)?;
        assert_json_content_type(response.headers())?;

        let body: Value = response.json().await?;
        assert_array_element_fields(&body, 1, &definition.expected_fields)?;
        Ok(())
    }

    /// GET /{name}?{filterKey}={length+offset}: 404 with the JSON content
    /// type.
    pub async fn get_filtered_missing(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
    ) -> CheckOutcome {
        let Some(key) = definition.filter_key else {
            debug!(resource = definition.name, "no parent filter key; nothing to check");
            return Ok(());
        };

        let length = self.collection_length(definition).await?;
        let response = self
            .client
            .get_with_query(
                scheme,
                definition.name,
                key,
                self.out_of_range(length).to_string(),
            )
            .await?;

        assert_not_found_response(response.status(), response.headers())?;
        Ok(())
    }

    /// POST /{name} with the full field map: 201, object echoing every
    /// submitted field.
    pub async fn post(&self, definition: &ResourceDefinition, scheme: Scheme) -> CheckOutcome {
        let payload = full_field_payload(definition);
        let response = self.client.post_json(scheme, definition.name, &payload).await?;

        assert_status(response.status(), StatusCode::CREATED)?;
        assert_json_content_type(response.headers())?;

        let body: Value = response.json().await?;
        assert_object_fields(&body, &definition.expected_fields)?;
        Ok(())
    }

    /// PUT /{name}/1 with the full field map: 200, object with all fields.
    pub async fn put(&self, definition: &ResourceDefinition, scheme: Scheme) -> CheckOutcome {
        let payload = full_field_payload(definition);
        let path = format!("{}/1", definition.name);
        let response = self.client.put_json(scheme, &path, &payload).await?;

        assert_status(response.status(), StatusCode::OK)?;
        assert_json_content_type(response.headers())?;

        let body: Value = response.json().await?;
        assert_object_fields(&body, &definition.expected_fields)?;
        Ok(())
    }

    /// PATCH /{name}/1 with the full field map: 200, object with all
    /// fields.
    pub async fn patch_full(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
    ) -> CheckOutcome {
        let payload = full_field_payload(definition);
        let path = format!("{}/1", definition.name);
        let response = self.client.patch_json(scheme, &path, &payload).await?;

        assert_status(response.status(), StatusCode::OK)?;
        assert_json_content_type(response.headers())?;

        let body: Value = response.json().await?;
        assert_object_fields(&body, &definition.expected_fields)?;
        Ok(())
    }

    /// PATCH /{name}/1 with a single field: 200, object with all fields,
    /// and the patched field carries the sentinel value.
    pub async fn patch_field(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
        field: &str,
    ) -> CheckOutcome {
        let payload = serde_json::json!({ field: SENTINEL });
        let path = format!("{}/1", definition.name);
        let response = self.client.patch_json(scheme, &path, &payload).await?;

        assert_status(response.status(), StatusCode::OK)?;
        assert_json_content_type(response.headers())?;

        let body: Value = response.json().await?;
        assert_object_fields(&body, &definition.expected_fields)?;
        assert_field_value(&body, field, &Value::String(SENTINEL.to_string()))?;
        Ok(())
    }

    /// DELETE /{name}/1: 200 and JSON content type only.
    pub async fn delete(&self, definition: &ResourceDefinition, scheme: Scheme) -> CheckOutcome {
        let path = format!("{}/1", definition.name);
        let response = self.client.delete(scheme, &path).await?;

        assert_status(response.status(), StatusCode::OK)?;
        assert_json_content_type(response.headers())?;
        Ok(())
    }

    /// POST /{name} with a payload of ~100 000 keys: the service must not
    /// accept it. Conformant when the request fails at transport level
    /// within the timeout bound, or when it is rejected with an HTTP error
    /// status.
    pub async fn post_oversized(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
    ) -> CheckOutcome {
        let payload = oversized_payload(self.config.oversized_payload_keys);
        let sent = self
            .client
            .post_json_oversized(scheme, definition.name, &payload)
            .await;

        match sent {
            Err(error) => {
                debug!(
                    resource = definition.name,
                    %error,
                    "oversized payload rejected at transport level"
                );
                Ok(())
            }
            Ok(response) => {
                let status = response.status();
                if status.is_client_error() || status.is_server_error() {
                    debug!(
                        resource = definition.name,
                        %status,
                        "oversized payload rejected with error status"
                    );
                    Ok(())
                } else {
                    Err(Assertion::OversizedPayloadAccepted { status }.into())
                }
            }
        }
    }

    /// Runs one operation and wraps the outcome in a [`CheckResult`].
    pub async fn check(
        &self,
        definition: &ResourceDefinition,
        scheme: Scheme,
        operation: Operation,
    ) -> CheckResult {
        let outcome = match operation {
            Operation::GetCollection => self.get_collection(definition, scheme).await,
            Operation::GetById => self.get_by_id(definition, scheme, 1).await,
            Operation::GetByIdMissing => self.get_by_id_missing(definition, scheme).await,
            Operation::GetFiltered => self.get_filtered(definition, scheme).await,
            Operation::GetFilteredMissing => self.get_filtered_missing(definition, scheme).await,
            Operation::Post => self.post(definition, scheme).await,
            Operation::Put => self.put(definition, scheme).await,
            Operation::PatchFull => self.patch_full(definition, scheme).await,
            Operation::PatchField => self.patch_field(definition, scheme, "body").await,
            Operation::Delete => self.delete(definition, scheme).await,
            Operation::PostOversized => self.post_oversized(definition, scheme).await,
        };

        CheckResult::from_outcome(definition.name, operation, scheme, outcome)
    }

    /// Runs the full battery for one resource, sequentially.
    ///
    /// Id-based reads run over both schemes; collection reads and writes
    /// run over https, matching how the service is normally consumed.
    /// Filter checks are skipped for resources without a parent, and the
    /// single-field PATCH is skipped when the resource has no `body` field.
    pub async fn run_battery(&self, definition: &ResourceDefinition) -> Vec<CheckResult> {
        let mut results = Vec::new();

        for scheme in Scheme::ALL {
            for operation in Operation::ID_READS {
                results.push(self.check(definition, scheme, operation).await);
            }
        }

        for operation in Operation::COLLECTION_READS {
            if matches!(
                operation,
                Operation::GetFiltered | Operation::GetFilteredMissing
            ) && definition.filter_key.is_none()
            {
                continue;
            }
            results.push(self.check(definition, Scheme::Https, operation).await);
        }

        for operation in Operation::WRITES {
            if operation == Operation::PatchField
                && !definition.expected_fields.contains("body")
            {
                continue;
            }
            results.push(self.check(definition, Scheme::Https, operation).await);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::registry::parent_filter_key;

    fn posts_definition() -> ResourceDefinition {
        ResourceDefinition {
            name: "posts",
            filter_key: parent_filter_key("posts"),
            expected_fields: ["userId", "id", "title", "body"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_full_field_payload() {
        let payload = full_field_payload(&posts_definition());
        let object = payload.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(object["title"], SENTINEL);
        assert_eq!(object["userId"], SENTINEL);
    }

    #[test]
    fn test_oversized_payload_key_count() {
        let payload = oversized_payload(1000);
        let object = payload.as_object().unwrap();
        assert_eq!(object.len(), 1000);
        assert_eq!(object["0"], SENTINEL);
        assert_eq!(object["999"], SENTINEL);
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::GetCollection.to_string(), "GET collection");
        assert_eq!(Operation::GetByIdMissing.to_string(), "GET by id (out of range)");
        assert_eq!(Operation::PatchField.to_string(), "PATCH (single field)");
        assert_eq!(Operation::PostOversized.to_string(), "POST (oversized payload)");
    }

    #[test]
    fn test_check_result_pass() {
        let result =
            CheckResult::from_outcome("posts", Operation::GetById, Scheme::Https, Ok(()));
        assert!(result.passed);
        assert!(result.details.is_none());
    }

    #[test]
    fn test_check_result_failure_keeps_details() {
        let outcome = Err(CheckError::from(Assertion::Status {
            expected: StatusCode::OK,
            actual: StatusCode::NOT_FOUND,
        }));
        let result =
            CheckResult::from_outcome("posts", Operation::GetById, Scheme::Http, outcome);
        assert!(!result.passed);
        let details = result.details.unwrap();
        assert!(details.contains("expected status 200 OK"));
        assert!(details.contains("404"));
    }

    #[test]
    fn test_not_found_response_with_json_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::header::HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(assert_not_found_response(StatusCode::NOT_FOUND, &headers).is_ok());
    }

    #[test]
    fn test_not_found_response_rejects_html_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::header::HeaderValue::from_static("text/html; charset=utf-8"),
        );
        let err = assert_not_found_response(StatusCode::NOT_FOUND, &headers).unwrap_err();
        assert!(matches!(err, Assertion::ContentType { .. }));
    }

    #[test]
    fn test_not_found_response_rejects_wrong_status() {
        let err = assert_not_found_response(StatusCode::OK, &HeaderMap::new()).unwrap_err();
        assert!(matches!(
            err,
            Assertion::Status { actual, .. } if actual == StatusCode::OK
        ));
    }

    #[test]
    fn test_operation_groups_cover_every_operation() {
        let total =
            Operation::ID_READS.len() + Operation::COLLECTION_READS.len() + Operation::WRITES.len();
        assert_eq!(total, 11);
    }
}
