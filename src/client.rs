//! HTTP client for the service under test.
//!
//! [`ApiClient`] wraps a [`reqwest::Client`] with the suite's fixed
//! per-request timeout and builds request URLs from a transport scheme,
//! the configured host, and a resource path. All request bodies are JSON.

use std::fmt::{self, Display};
use std::time::Duration;

use reqwest::Response;
use serde_json::Value;
use url::Url;

use crate::config::SuiteConfig;
use crate::error::DiscoveryError;

/// Transport scheme for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// Both supported schemes, for parametrized checks.
    pub const ALL: [Scheme; 2] = [Scheme::Http, Scheme::Https];

    /// Returns the scheme as it appears in a URL.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP client bound to the service under test.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: [Url; 2],
    oversized_timeout: Duration,
}

impl ApiClient {
    /// Creates a client from the suite configuration.
    ///
    /// Fails if the HTTP client cannot be constructed or the configured
    /// host does not form a valid URL.
    pub fn new(config: &SuiteConfig) -> Result<Self, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(DiscoveryError::Client)?;

        let base = Scheme::ALL.map(|scheme| format!("{}://{}/", scheme, config.host));
        let base = [
            Url::parse(&base[0]).map_err(DiscoveryError::BaseUrl)?,
            Url::parse(&base[1]).map_err(DiscoveryError::BaseUrl)?,
        ];

        Ok(Self {
            client,
            base,
            oversized_timeout: config.oversized_request_timeout,
        })
    }

    /// Builds a request URL for the given scheme and path, with optional
    /// query parameters.
    pub fn url(&self, scheme: Scheme, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base[scheme as usize].clone();
        url.set_path(path);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Issues a GET request.
    pub async fn get(&self, scheme: Scheme, path: &str) -> reqwest::Result<Response> {
        self.client.get(self.url(scheme, path, &[])).send().await
    }

    /// Issues a GET request with a single query parameter.
    pub async fn get_with_query(
        &self,
        scheme: Scheme,
        path: &str,
        key: &str,
        value: String,
    ) -> reqwest::Result<Response> {
        self.client
            .get(self.url(scheme, path, &[(key, value)]))
            .send()
            .await
    }

    /// Issues a POST request with a JSON body.
    pub async fn post_json(
        &self,
        scheme: Scheme,
        path: &str,
        body: &Value,
    ) -> reqwest::Result<Response> {
        self.client
            .post(self.url(scheme, path, &[]))
            .json(body)
            .send()
            .await
    }

    /// Issues a POST request with a JSON body and the oversized-payload
    /// timeout instead of the default.
    pub async fn post_json_oversized(
        &self,
        scheme: Scheme,
        path: &str,
        body: &Value,
    ) -> reqwest::Result<Response> {
        self.client
            .post(self.url(scheme, path, &[]))
            .timeout(self.oversized_timeout)
            .json(body)
            .send()
            .await
    }

    /// Issues a PUT request with a JSON body.
    pub async fn put_json(
        &self,
        scheme: Scheme,
        path: &str,
        body: &Value,
    ) -> reqwest::Result<Response> {
        self.client
            .put(self.url(scheme, path, &[]))
            .json(body)
            .send()
            .await
    }

    /// Issues a PATCH request with a JSON body.
    pub async fn patch_json(
        &self,
        scheme: Scheme,
        path: &str,
        body: &Value,
    ) -> reqwest::Result<Response> {
        self.client
            .patch(self.url(scheme, path, &[]))
            .json(body)
            .send()
            .await
    }

    /// Issues a DELETE request.
    pub async fn delete(&self, scheme: Scheme, path: &str) -> reqwest::Result<Response> {
        self.client.delete(self.url(scheme, path, &[])).send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        ApiClient::new(&SuiteConfig::for_testing()).expect("client should build")
    }

    #[test]
    fn test_scheme_display() {
        assert_eq!(Scheme::Http.to_string(), "http");
        assert_eq!(Scheme::Https.to_string(), "https");
    }

    #[test]
    fn test_url_plain_path() {
        let client = test_client();
        let url = client.url(Scheme::Https, "posts", &[]);
        assert_eq!(url.as_str(), "https://jsonplaceholder.typicode.com/posts");
    }

    #[test]
    fn test_url_with_id() {
        let client = test_client();
        let url = client.url(Scheme::Http, "posts/1", &[]);
        assert_eq!(url.as_str(), "http://jsonplaceholder.typicode.com/posts/1");
    }

    #[test]
    fn test_url_with_query() {
        let client = test_client();
        let url = client.url(Scheme::Https, "comments", &[("postId", "1".to_string())]);
        assert_eq!(
            url.as_str(),
            "https://jsonplaceholder.typicode.com/comments?postId=1"
        );
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let config = SuiteConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(ApiClient::new(&config).is_err());
    }
}
