//! Resource registry.
//!
//! Maps each resource collection to its [`ResourceDefinition`]: the
//! query-parameter name used for parent-id filtering (a fixed table; the
//! child→parent relationships are not discoverable from the API) and the
//! expected field set, discovered once at suite start by reading record 1
//! of each collection and recording the response's top-level keys.
//!
//! Discovery is fail-fast: one network call per resource, no retries, and
//! any error aborts the run, since no check can be evaluated without a
//! field definition.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::{debug, info};

use crate::client::{ApiClient, Scheme};
use crate::config::RESOURCE_NAMES;
use crate::error::{json_type_name, DiscoveryError};

/// Returns the query-parameter name used to filter `resource` by its
/// parent id, or `None` when the resource has no parent.
pub fn parent_filter_key(resource: &str) -> Option<&'static str> {
    match resource {
        "posts" | "albums" | "todos" => Some("userId"),
        "comments" => Some("postId"),
        "photos" => Some("albumId"),
        _ => None,
    }
}

/// Definition of one resource collection, immutable after discovery.
#[derive(Debug, Clone)]
pub struct ResourceDefinition {
    /// Collection name as it appears in the URL path.
    pub name: &'static str,

    /// Query-parameter name for parent-id filtering, if any.
    pub filter_key: Option<&'static str>,

    /// Field names required in every successful JSON object response.
    pub expected_fields: BTreeSet<String>,
}

impl ResourceDefinition {
    /// Builds a definition from the body of a discovery response.
    fn from_discovery(name: &'static str, body: &Value) -> Result<Self, DiscoveryError> {
        let object = body.as_object().ok_or(DiscoveryError::NotAnObject {
            resource: name,
            actual: json_type_name(body),
        })?;

        Ok(Self {
            name,
            filter_key: parent_filter_key(name),
            expected_fields: object.keys().cloned().collect(),
        })
    }
}

/// Read-only mapping from resource name to its definition.
///
/// Built once at suite start via live discovery calls and held for the
/// suite's lifetime.
#[derive(Debug)]
pub struct ResourceRegistry {
    definitions: BTreeMap<&'static str, ResourceDefinition>,
}

impl ResourceRegistry {
    /// Discovers the field set of every resource in [`RESOURCE_NAMES`].
    pub async fn discover(client: &ApiClient) -> Result<Self, DiscoveryError> {
        let mut definitions = BTreeMap::new();

        for name in RESOURCE_NAMES {
            let body: Value = client
                .get(Scheme::Https, &format!("{name}/1"))
                .await
                .map_err(|source| DiscoveryError::Request { resource: name, source })?
                .json()
                .await
                .map_err(|source| DiscoveryError::Request { resource: name, source })?;

            let definition = ResourceDefinition::from_discovery(name, &body)?;
            debug!(
                resource = name,
                fields = ?definition.expected_fields,
                "discovered resource fields"
            );
            definitions.insert(name, definition);
        }

        info!(resources = definitions.len(), "resource registry built");
        Ok(Self { definitions })
    }

    /// Looks up a definition by resource name.
    pub fn get(&self, name: &str) -> Option<&ResourceDefinition> {
        self.definitions.get(name)
    }

    /// Iterates over every definition, in name order.
    pub fn definitions(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.definitions.values()
    }

    /// Iterates over the definitions that carry a parent filter key.
    pub fn filtered_definitions(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.definitions().filter(|d| d.filter_key.is_some())
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true when the registry holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
