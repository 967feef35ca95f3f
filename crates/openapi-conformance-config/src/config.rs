// crates/openapi-conformance-config/src/config.rs
// ============================================================================
// Module: Conformance Configuration
// Description: Configuration loading and validation for the verifier.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: openapi-conformance-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits,
//! then selected fields are overridden from the environment and the result is
//! validated as a whole. Unknown keys are rejected.
//!
//! Bearer tokens are never part of `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use openapi_conformance_core::GroupVersion;
use openapi_conformance_core::runtime::CodecKind;
use openapi_conformance_core::runtime::ComparisonMode;
use openapi_conformance_core::runtime::DEFAULT_MAX_DIFF_ENTRIES;
use openapi_conformance_core::runtime::GroupFilter;
use openapi_conformance_core::runtime::PollPolicy;
use openapi_conformance_core::runtime::RoundTripChecker;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "openapi-conformance.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "OPENAPI_CONFORMANCE_CONFIG";
/// Environment variable overriding `discovery.endpoint`.
pub const ENDPOINT_ENV_VAR: &str = "OPENAPI_CONFORMANCE_ENDPOINT";
/// Environment variable supplying the bearer token directly.
pub const BEARER_TOKEN_ENV_VAR: &str = "OPENAPI_CONFORMANCE_BEARER_TOKEN";
/// Environment variable overriding `polling.interval_ms`.
pub const POLL_INTERVAL_ENV_VAR: &str = "OPENAPI_CONFORMANCE_POLL_INTERVAL_MS";
/// Environment variable overriding `polling.deadline_ms`.
pub const DEADLINE_ENV_VAR: &str = "OPENAPI_CONFORMANCE_DEADLINE_MS";

/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum token file size in bytes.
pub(crate) const MAX_TOKEN_FILE_SIZE: usize = 16 * 1024;
/// Maximum bearer token length.
pub(crate) const MAX_BEARER_TOKEN_LENGTH: usize = 8 * 1024;
/// Maximum request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 300_000;
/// Maximum response body size in bytes.
pub(crate) const MAX_RESPONSE_BYTES: usize = 256 * 1024 * 1024;
/// Maximum poll deadline in milliseconds.
pub(crate) const MAX_DEADLINE_MS: u64 = 3_600_000;
/// Maximum number of built-in allow-set entries.
pub(crate) const MAX_GROUP_RULES: usize = 256;
/// Maximum group name length.
pub(crate) const MAX_GROUP_NAME_LENGTH: usize = 253;
/// Maximum recorded diff entries per verdict.
pub(crate) const MAX_DIFF_ENTRIES: usize = 10_000;
/// Maximum registered scenarios.
pub(crate) const MAX_REGISTERED_SCENARIOS: usize = 64;
/// Maximum scenario name length.
pub(crate) const MAX_SCENARIO_NAME_LENGTH: usize = 128;
/// Maximum argv entries per command.
pub(crate) const MAX_COMMAND_ARGS: usize = 64;
/// Maximum length of one argv entry.
pub(crate) const MAX_COMMAND_ARG_LENGTH: usize = 4096;
/// Maximum command timeout in milliseconds.
pub(crate) const MAX_COMMAND_TIMEOUT_MS: u64 = 1_800_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Verifier configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConformanceConfig {
    /// Discovery endpoint configuration.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Publication polling configuration.
    #[serde(default)]
    pub polling: PollingConfig,
    /// Built-in scenario configuration.
    #[serde(default)]
    pub builtin: BuiltinConfig,
    /// Round-trip checker configuration.
    #[serde(default)]
    pub roundtrip: RoundTripConfig,
    /// Registered-type scenarios.
    #[serde(default)]
    pub registered: Vec<RegisteredTypeConfig>,
}

impl ConformanceConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// The path is taken from `path`, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`]. Only the default file may be absent, in which
    /// case built-in defaults are used. Environment overrides are applied
    /// before validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overriding, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        let mut config = if !explicit && !resolved.exists() {
            Self::default()
        } else {
            Self::from_file(&resolved)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration file without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a variable is empty, not UTF-8, or
    /// not parseable.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| env::var_os(key))
    }

    /// Applies overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a variable is empty, not UTF-8, or
    /// not parseable.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(endpoint) = read_override(&lookup, ENDPOINT_ENV_VAR)? {
            self.discovery.endpoint = endpoint;
        }
        if let Some(token) = read_override(&lookup, BEARER_TOKEN_ENV_VAR)? {
            self.discovery.bearer_token = Some(token);
        }
        if let Some(interval) = read_override(&lookup, POLL_INTERVAL_ENV_VAR)? {
            self.polling.interval_ms = parse_millis(POLL_INTERVAL_ENV_VAR, &interval)?;
        }
        if let Some(deadline) = read_override(&lookup, DEADLINE_ENV_VAR)? {
            self.polling.deadline_ms = parse_millis(DEADLINE_ENV_VAR, &deadline)?;
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.discovery.validate()?;
        self.polling.validate()?;
        self.builtin.validate()?;
        self.roundtrip.validate()?;
        if self.registered.len() > MAX_REGISTERED_SCENARIOS {
            return Err(ConfigError::Invalid(format!(
                "too many registered scenarios (max {MAX_REGISTERED_SCENARIOS})"
            )));
        }
        let mut names = BTreeSet::new();
        for registered in &self.registered {
            registered.validate()?;
            if !names.insert(registered.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate registered scenario name: {}",
                    registered.name
                )));
            }
        }
        if self.builtin.enabled && names.contains(BUILTIN_SCENARIO_NAME) {
            return Err(ConfigError::Invalid(format!(
                "registered scenario name collides with built-in scenario: {BUILTIN_SCENARIO_NAME}"
            )));
        }
        Ok(())
    }
}

/// Name reported for the built-in scenario.
pub const BUILTIN_SCENARIO_NAME: &str = "builtin";

/// Discovery endpoint configuration.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Base URL of the API server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// File holding the bearer token.
    #[serde(default)]
    pub bearer_token_file: Option<PathBuf>,
    /// Environment variable holding the bearer token.
    #[serde(default)]
    pub bearer_token_env: Option<String>,
    /// PEM bundle of additional trusted CA certificates.
    #[serde(default)]
    pub ca_file: Option<PathBuf>,
    /// Disables TLS certificate verification.
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Bearer token supplied through [`BEARER_TOKEN_ENV_VAR`].
    #[serde(skip)]
    pub bearer_token: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            bearer_token_file: None,
            bearer_token_env: None,
            ca_file: None,
            insecure_skip_tls_verify: false,
            request_timeout_ms: default_request_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            bearer_token: None,
        }
    }
}

impl fmt::Debug for DiscoveryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryConfig")
            .field("endpoint", &self.endpoint)
            .field("bearer_token_file", &self.bearer_token_file)
            .field("bearer_token_env", &self.bearer_token_env)
            .field("ca_file", &self.ca_file)
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl DiscoveryConfig {
    /// Validates discovery configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(self.endpoint.trim()).map_err(|err| {
            ConfigError::Invalid(format!("discovery.endpoint is not a valid url: {err}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(
                "discovery.endpoint must use http or https".to_string(),
            ));
        }
        if url.host().is_none() {
            return Err(ConfigError::Invalid("discovery.endpoint must include a host".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "discovery.endpoint must not include a query or fragment".to_string(),
            ));
        }
        if self.bearer_token_file.is_some() && self.bearer_token_env.is_some() {
            return Err(ConfigError::Invalid(
                "discovery.bearer_token_file and discovery.bearer_token_env are mutually exclusive"
                    .to_string(),
            ));
        }
        if let Some(path) = &self.bearer_token_file {
            validate_path_string("discovery.bearer_token_file", &path.to_string_lossy())?;
        }
        if let Some(name) = &self.bearer_token_env
            && name.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "discovery.bearer_token_env must be non-empty".to_string(),
            ));
        }
        if let Some(token) = &self.bearer_token {
            validate_token(token)?;
        }
        if let Some(path) = &self.ca_file {
            validate_path_string("discovery.ca_file", &path.to_string_lossy())?;
        }
        if self.request_timeout_ms == 0 || self.request_timeout_ms > MAX_REQUEST_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "discovery.request_timeout_ms must be between 1 and {MAX_REQUEST_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "discovery.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES}"
            )));
        }
        Ok(())
    }

    /// Resolves the bearer token from the override, file, or named variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the token source cannot be read or holds
    /// an invalid token.
    pub fn resolve_bearer_token(&self) -> Result<Option<String>, ConfigError> {
        if let Some(token) = &self.bearer_token {
            return Ok(Some(token.clone()));
        }
        if let Some(path) = &self.bearer_token_file {
            let bytes = fs::read(path).map_err(|err| {
                ConfigError::Io(format!("discovery.bearer_token_file {}: {err}", path.display()))
            })?;
            if bytes.len() > MAX_TOKEN_FILE_SIZE {
                return Err(ConfigError::Invalid(
                    "discovery.bearer_token_file exceeds size limit".to_string(),
                ));
            }
            let token = String::from_utf8(bytes).map_err(|_| {
                ConfigError::Invalid("discovery.bearer_token_file must be utf-8".to_string())
            })?;
            let token = token.trim().to_string();
            validate_token(&token)?;
            return Ok(Some(token));
        }
        if let Some(name) = &self.bearer_token_env {
            let token = read_override(&|key: &str| env::var_os(key), name)?
                .ok_or_else(|| ConfigError::Env(format!("{name} is not set")))?;
            validate_token(&token)?;
            return Ok(Some(token));
        }
        Ok(None)
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Publication polling configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Delay between publication checks in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Publication deadline in milliseconds.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            deadline_ms: default_deadline_ms(),
        }
    }
}

impl PollingConfig {
    /// Validates polling configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.deadline_ms > MAX_DEADLINE_MS {
            return Err(ConfigError::Invalid(format!(
                "polling.deadline_ms must be at most {MAX_DEADLINE_MS}"
            )));
        }
        self.policy().map(|_| ())
    }

    /// Builds the validated poll policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the interval or deadline is out
    /// of range.
    pub fn policy(&self) -> Result<PollPolicy, ConfigError> {
        PollPolicy::new(
            Duration::from_millis(self.interval_ms),
            Duration::from_millis(self.deadline_ms),
        )
        .map_err(|err| ConfigError::Invalid(format!("polling: {err}")))
    }
}

/// Built-in scenario configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuiltinConfig {
    /// Whether the built-in scenario runs.
    #[serde(default = "default_builtin_enabled")]
    pub enabled: bool,
    /// Exact group names to check; the empty string is the core group.
    #[serde(default = "default_allowed_groups")]
    pub allowed_groups: Vec<String>,
    /// Group name suffixes to check.
    #[serde(default = "default_group_suffixes")]
    pub group_suffixes: Vec<String>,
}

impl Default for BuiltinConfig {
    fn default() -> Self {
        Self {
            enabled: default_builtin_enabled(),
            allowed_groups: default_allowed_groups(),
            group_suffixes: default_group_suffixes(),
        }
    }
}

impl BuiltinConfig {
    /// Validates built-in scenario configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_groups.len().saturating_add(self.group_suffixes.len()) > MAX_GROUP_RULES {
            return Err(ConfigError::Invalid(format!(
                "builtin allow-set exceeds {MAX_GROUP_RULES} entries"
            )));
        }
        let mut seen = BTreeSet::new();
        for group in &self.allowed_groups {
            validate_group_name("builtin.allowed_groups", group, true)?;
            if !seen.insert(group.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "builtin.allowed_groups contains duplicate entry: {group:?}"
                )));
            }
        }
        let mut seen = BTreeSet::new();
        for suffix in &self.group_suffixes {
            validate_group_name("builtin.group_suffixes", suffix, false)?;
            if !seen.insert(suffix.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "builtin.group_suffixes contains duplicate entry: {suffix}"
                )));
            }
        }
        Ok(())
    }

    /// Builds the built-in group filter.
    #[must_use]
    pub fn filter(&self) -> GroupFilter {
        GroupFilter::new(self.allowed_groups.iter().cloned(), self.group_suffixes.iter().cloned())
    }
}

/// Round-trip checker configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoundTripConfig {
    /// Codec modelling the client decoder schema.
    #[serde(default)]
    pub codec: CodecKind,
    /// Comparison strictness.
    #[serde(default)]
    pub comparison: ComparisonMode,
    /// Maximum diff entries recorded per verdict.
    #[serde(default = "default_max_diff_entries")]
    pub max_diff_entries: usize,
}

impl Default for RoundTripConfig {
    fn default() -> Self {
        Self {
            codec: CodecKind::default(),
            comparison: ComparisonMode::default(),
            max_diff_entries: default_max_diff_entries(),
        }
    }
}

impl RoundTripConfig {
    /// Validates round-trip configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_diff_entries == 0 || self.max_diff_entries > MAX_DIFF_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "roundtrip.max_diff_entries must be between 1 and {MAX_DIFF_ENTRIES}"
            )));
        }
        Ok(())
    }

    /// Builds the configured checker.
    #[must_use]
    pub fn checker(&self) -> RoundTripChecker {
        RoundTripChecker::new(self.codec.build())
            .with_comparison(self.comparison)
            .with_max_diff_entries(self.max_diff_entries)
    }
}

/// How a registered type is served.
///
/// # Invariants
/// - Variants are stable for configuration parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisteredKind {
    /// Custom type served by the primary backend.
    Dynamic,
    /// Type served by an aggregated server.
    Aggregated,
}

/// One registered-type scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisteredTypeConfig {
    /// Scenario name.
    pub name: String,
    /// Dynamic or aggregated.
    pub kind: RegisteredKind,
    /// Group the registration publishes.
    pub group: String,
    /// Version the registration publishes.
    pub version: String,
    /// Command that registers the type.
    pub register_command: Vec<String>,
    /// Command that removes the type.
    pub unregister_command: Vec<String>,
    /// Timeout for each command in milliseconds.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
}

impl RegisteredTypeConfig {
    /// Validates one registered-type entry.
    fn validate(&self) -> Result<(), ConfigError> {
        let name = self.name.trim();
        if name.is_empty() || name.len() > MAX_SCENARIO_NAME_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "registered.name must be 1..={MAX_SCENARIO_NAME_LENGTH} characters"
            )));
        }
        let field = format!("registered[{name}]");
        validate_group_name(&format!("{field}.group"), &self.group, false)?;
        if self.version.trim().is_empty() || self.version.contains(['/', ' ']) {
            return Err(ConfigError::Invalid(format!(
                "{field}.version must be non-empty without '/' or spaces"
            )));
        }
        validate_command(&format!("{field}.register_command"), &self.register_command)?;
        validate_command(&format!("{field}.unregister_command"), &self.unregister_command)?;
        if self.command_timeout_ms == 0 || self.command_timeout_ms > MAX_COMMAND_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "{field}.command_timeout_ms must be between 1 and {MAX_COMMAND_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }

    /// Returns the group-version the registration publishes.
    #[must_use]
    pub fn group_version(&self) -> GroupVersion {
        GroupVersion::new(self.group.clone(), self.version.clone())
    }

    /// Returns the per-command timeout.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for CLI error mapping.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Invalid environment override.
    #[error("invalid environment: {0}")]
    Env(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether it was requested explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = env::var_os(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an API group name or suffix.
fn validate_group_name(field: &str, value: &str, allow_core: bool) -> Result<(), ConfigError> {
    if value.is_empty() {
        if allow_core {
            return Ok(());
        }
        return Err(ConfigError::Invalid(format!("{field} entries must be non-empty")));
    }
    if value.len() > MAX_GROUP_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} entry exceeds max length: {value}")));
    }
    if !value.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '.')
    {
        return Err(ConfigError::Invalid(format!(
            "{field} entry must be lowercase alphanumerics, '-' or '.': {value}"
        )));
    }
    Ok(())
}

/// Validates a command argv.
fn validate_command(field: &str, command: &[String]) -> Result<(), ConfigError> {
    if command.first().is_none_or(|program| program.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!("{field} must name a program")));
    }
    if command.len() > MAX_COMMAND_ARGS {
        return Err(ConfigError::Invalid(format!(
            "{field} exceeds {MAX_COMMAND_ARGS} arguments"
        )));
    }
    if command.iter().any(|arg| arg.len() > MAX_COMMAND_ARG_LENGTH || arg.contains('\0')) {
        return Err(ConfigError::Invalid(format!("{field} contains an invalid argument")));
    }
    Ok(())
}

/// Validates a bearer token value.
fn validate_token(token: &str) -> Result<(), ConfigError> {
    if token.is_empty() {
        return Err(ConfigError::Invalid("bearer token must be non-empty".to_string()));
    }
    if token.len() > MAX_BEARER_TOKEN_LENGTH {
        return Err(ConfigError::Invalid("bearer token exceeds max length".to_string()));
    }
    if token.chars().any(|ch| ch.is_ascii_control() || ch.is_whitespace()) {
        return Err(ConfigError::Invalid(
            "bearer token must not contain whitespace or control characters".to_string(),
        ));
    }
    Ok(())
}

/// Reads one override variable as strict UTF-8; empty values are rejected.
fn read_override<F>(lookup: &F, key: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<OsString>,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    let value = value.into_string().map_err(|_| ConfigError::Env(format!("{key} must be utf-8")))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Env(format!("{key} must be non-empty")));
    }
    Ok(Some(value))
}

/// Parses a millisecond override.
fn parse_millis(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::Env(format!("{key} must be a non-negative integer")))
}

/// Default API server endpoint.
fn default_endpoint() -> String {
    "https://127.0.0.1:6443".to_string()
}

/// Default per-request timeout.
const fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Default maximum response body size.
const fn default_max_response_bytes() -> usize {
    64 * 1024 * 1024
}

/// Default poll interval.
const fn default_interval_ms() -> u64 {
    1_000
}

/// Default publication deadline.
const fn default_deadline_ms() -> u64 {
    30_000
}

/// Built-in scenario runs unless disabled.
const fn default_builtin_enabled() -> bool {
    true
}

/// Default built-in groups; the core group is opt-in via `""`.
fn default_allowed_groups() -> Vec<String> {
    ["apps", "autoscaling", "batch", "policy"].into_iter().map(str::to_string).collect()
}

/// Default built-in group suffixes.
fn default_group_suffixes() -> Vec<String> {
    vec!["k8s.io".to_string()]
}

/// Default diff entry cap.
const fn default_max_diff_entries() -> usize {
    DEFAULT_MAX_DIFF_ENTRIES
}

/// Default per-command timeout.
const fn default_command_timeout_ms() -> u64 {
    60_000
}
