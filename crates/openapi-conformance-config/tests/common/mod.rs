// crates/openapi-conformance-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for the config crate.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(clippy::unwrap_used, reason = "Test-only helpers use unwrap for brevity.")]

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use openapi_conformance_config::ConformanceConfig;
use tempfile::TempDir;

/// Parses a TOML string into a `ConformanceConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<ConformanceConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Writes `content` to a config file inside a fresh temporary directory.
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi-conformance.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

/// Builds an environment lookup from fixed key/value pairs.
pub fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
    let pairs: Vec<(String, OsString)> =
        pairs.iter().map(|(key, value)| ((*key).to_string(), OsString::from(*value))).collect();
    move |key| pairs.iter().find(|(name, _)| name == key).map(|(_, value)| value.clone())
}

/// A registered-type entry that passes validation.
pub const REGISTERED_ENTRY: &str = r#"
[[registered]]
name = "custom-resource"
kind = "dynamic"
group = "stable.example.com"
version = "v1"
register_command = ["kubectl", "apply", "-f", "crd.yaml"]
unregister_command = ["kubectl", "delete", "-f", "crd.yaml"]
"#;
