// crates/openapi-conformance-http/src/source.rs
// ============================================================================
// Module: HTTP Discovery Source
// Description: Discovery source backed by a live `/openapi/v3` endpoint.
// Purpose: Fetch the root listing and per-group-version documents over HTTP.
// Dependencies: reqwest, serde, url, openapi-conformance-core
// ============================================================================

//! ## Overview
//! [`HttpDiscoverySource`] reads the `/openapi/v3` root listing and resolves
//! each entry's `serverRelativeURL` against the configured endpoint. Every
//! call goes to the server; nothing is cached between calls, so a poll loop
//! observes publication and withdrawal as they happen.
//!
//! Security posture: server responses are untrusted. Bodies are read under a
//! byte limit, redirects are refused, and the bearer token never appears in
//! logs or debug output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use openapi_conformance_core::DiscoveryError;
use openapi_conformance_core::DiscoverySource;
use openapi_conformance_core::Document;
use openapi_conformance_core::GroupVersion;
use reqwest::Certificate;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path of the discovery root listing, relative to the endpoint.
pub const OPENAPI_V3_ROOT_PATH: &str = "/openapi/v3";

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default maximum response body size.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// HTTP discovery source configuration.
///
/// # Invariants
/// - `endpoint` uses `http` or `https` and carries no query or fragment.
/// - `max_response_bytes` is greater than zero.
#[derive(Clone)]
pub struct HttpSourceConfig {
    /// Base endpoint of the API server.
    pub endpoint: Url,
    /// Bearer token sent on every request.
    pub bearer_token: Option<String>,
    /// Extra PEM-encoded CA certificate trusted for TLS.
    pub ca_certificate_pem: Option<Vec<u8>>,
    /// Skip TLS certificate verification.
    pub insecure_skip_tls_verify: bool,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum response body size in bytes.
    pub max_response_bytes: usize,
}

impl HttpSourceConfig {
    /// Creates a configuration with default limits for the endpoint.
    #[must_use]
    pub const fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            bearer_token: None,
            ca_certificate_pem: None,
            insecure_skip_tls_verify: false,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl fmt::Debug for HttpSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSourceConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("ca_certificate_pem", &self.ca_certificate_pem.as_ref().map(Vec::len))
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .field("timeout", &self.timeout)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish()
    }
}

/// Errors raised while constructing an HTTP discovery source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpSourceError {
    /// Configuration is invalid.
    #[error("http source config error: {0}")]
    Config(String),
    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    Client(String),
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Root listing returned by `/openapi/v3`.
#[derive(Debug, Deserialize)]
struct RootListing {
    /// Published paths keyed by `api/<v>` or `apis/<g>/<v>`.
    #[serde(default)]
    paths: BTreeMap<String, PathEntry>,
}

/// One entry of the root listing.
#[derive(Debug, Deserialize)]
struct PathEntry {
    /// Server-relative location of the document, usually with a hash query.
    #[serde(rename = "serverRelativeURL")]
    server_relative_url: String,
}

// ============================================================================
// SECTION: Source
// ============================================================================

/// Discovery source that talks to a live `/openapi/v3` endpoint.
pub struct HttpDiscoverySource {
    /// HTTP client with redirects disabled.
    client: Client,
    /// Base endpoint.
    endpoint: Url,
    /// Precomputed authorization header.
    authorization: Option<HeaderValue>,
    /// Maximum response body size in bytes.
    max_response_bytes: usize,
}

impl fmt::Debug for HttpDiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDiscoverySource")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated", &self.authorization.is_some())
            .field("max_response_bytes", &self.max_response_bytes)
            .finish_non_exhaustive()
    }
}

impl HttpDiscoverySource {
    /// Builds a discovery source from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSourceError`] when the endpoint, token, or CA certificate
    /// is invalid or the client cannot be built.
    pub fn new(config: HttpSourceConfig) -> Result<Self, HttpSourceError> {
        match config.endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(HttpSourceError::Config(format!("unsupported endpoint scheme: {other}")));
            }
        }
        if config.endpoint.query().is_some() || config.endpoint.fragment().is_some() {
            return Err(HttpSourceError::Config(
                "endpoint must not carry a query or fragment".to_string(),
            ));
        }
        if config.max_response_bytes == 0 {
            return Err(HttpSourceError::Config(
                "max_response_bytes must be greater than zero".to_string(),
            ));
        }
        let authorization = config
            .bearer_token
            .as_deref()
            .map(|token| {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    HttpSourceError::Config("invalid bearer token header".to_string())
                })?;
                value.set_sensitive(true);
                Ok::<_, HttpSourceError>(value)
            })
            .transpose()?;

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify);
        if let Some(pem) = &config.ca_certificate_pem {
            let certificate = Certificate::from_pem(pem)
                .map_err(|err| HttpSourceError::Config(format!("invalid ca certificate: {err}")))?;
            builder = builder.add_root_certificate(certificate);
        }
        let client = builder.build().map_err(|err| HttpSourceError::Client(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            authorization,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches the root listing and maps it to document locations.
    async fn root_listing(&self) -> Result<BTreeMap<GroupVersion, String>, DiscoveryError> {
        let url = self.resolve(OPENAPI_V3_ROOT_PATH)?;
        let (status, body) = self.get(url).await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        let listing: RootListing = serde_json::from_slice(&body)
            .map_err(|err| DiscoveryError::Transport(format!("invalid root listing: {err}")))?;
        let mut locations = BTreeMap::new();
        for (path, entry) in listing.paths {
            match group_version_from_path(&path) {
                Some(group_version) => {
                    locations.insert(group_version, entry.server_relative_url);
                }
                None => debug!(path = %path, "skipping non group-version path"),
            }
        }
        Ok(locations)
    }

    /// Resolves a server-relative reference against the endpoint, keeping any
    /// path prefix the endpoint carries.
    fn resolve(&self, server_relative: &str) -> Result<Url, DiscoveryError> {
        if !server_relative.starts_with('/') {
            return Err(DiscoveryError::Transport(format!(
                "invalid serverRelativeURL {server_relative:?}"
            )));
        }
        let (path, query) = server_relative
            .split_once('?')
            .map_or((server_relative, None), |(path, query)| (path, Some(query)));
        let mut url = self.endpoint.clone();
        let joined = format!("{}{path}", self.endpoint.path().trim_end_matches('/'));
        url.set_path(&joined);
        url.set_query(query);
        Ok(url)
    }

    /// Issues a GET and returns the status with the bounded body.
    async fn get(&self, url: Url) -> Result<(StatusCode, Vec<u8>), DiscoveryError> {
        let mut request =
            self.client.get(url.clone()).header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(authorization) = &self.authorization {
            request = request.header(AUTHORIZATION, authorization.clone());
        }
        let response =
            request.send().await.map_err(|err| DiscoveryError::Transport(err.to_string()))?;
        let status = response.status();
        debug!(path = %url.path(), status = status.as_u16(), "discovery request");
        let body = read_response_body_with_limit(response, self.max_response_bytes).await?;
        Ok((status, body))
    }
}

#[async_trait]
impl DiscoverySource for HttpDiscoverySource {
    async fn list_group_versions(&self) -> Result<BTreeSet<GroupVersion>, DiscoveryError> {
        Ok(self.root_listing().await?.into_keys().collect())
    }

    async fn fetch_document(
        &self,
        group_version: &GroupVersion,
    ) -> Result<Document, DiscoveryError> {
        let mut locations = self.root_listing().await?;
        let location = locations
            .remove(group_version)
            .ok_or_else(|| DiscoveryError::NotFound(group_version.clone()))?;
        let url = self.resolve(&location)?;
        let (status, body) = self.get(url).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(DiscoveryError::NotFound(group_version.clone()));
        }
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        let value: Value = serde_json::from_slice(&body).map_err(|err| {
            DiscoveryError::Transport(format!("invalid document for {group_version}: {err}"))
        })?;
        Ok(Document::new(value))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a root listing path to its group-version.
///
/// `api/<version>` is the core group and `apis/<group>/<version>` a named
/// group. Any other path yields `None`.
#[must_use]
pub fn group_version_from_path(path: &str) -> Option<GroupVersion> {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match segments.as_slice() {
        ["api", version] if !version.is_empty() => Some(GroupVersion::core(*version)),
        ["apis", group, version] if !group.is_empty() && !version.is_empty() => {
            Some(GroupVersion::new(*group, *version))
        }
        _ => None,
    }
}

/// Builds a transport error for a non-success status.
fn status_error(status: StatusCode, body: &[u8]) -> DiscoveryError {
    let preview = String::from_utf8_lossy(body);
    let preview: String = preview.trim().chars().take(256).collect();
    DiscoveryError::Transport(format!("http status {}: {preview}", status.as_u16()))
}

/// Reads a response body, failing once it exceeds `limit` bytes.
async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, DiscoveryError> {
    let too_large = |actual: usize| {
        DiscoveryError::Transport(format!("response exceeds size limit ({actual} > {limit})"))
    };
    let mut body = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) =
        response.chunk().await.map_err(|err| DiscoveryError::Transport(err.to_string()))?
    {
        let next_total = total.checked_add(chunk.len()).ok_or_else(|| too_large(usize::MAX))?;
        if next_total > limit {
            return Err(too_large(next_total));
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}
