// crates/openapi-conformance-cli/src/provisioner.rs
// ============================================================================
// Module: Command Provisioner
// Description: Registers and removes types by running configured commands.
// Purpose: Back registered-type scenarios with operator-supplied tooling.
// Dependencies: async-trait, tokio, openapi-conformance-core
// ============================================================================

//! ## Overview
//! [`CommandProvisioner`] runs an argv command to register a type (for
//! example `kubectl apply -f crd.yaml`) and another to remove it. Commands
//! run without a shell, with a timeout, and a non-zero exit is reported with
//! the tail of the command's stderr.
//!
//! Security posture: command arguments come from the operator's config and
//! are never logged; only the program name is.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::Stdio;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use openapi_conformance_config::RegisteredTypeConfig;
use openapi_conformance_core::GroupVersion;
use openapi_conformance_core::ProvisionError;
use openapi_conformance_core::Provisioner;
use tokio::process::Command;
use tracing::debug;
use tracing::info;


// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of stderr bytes carried into an error message.
const STDERR_TAIL_BYTES: usize = 2048;

// ============================================================================
// SECTION: Provisioner
// ============================================================================

/// Provisioner driven by external register and unregister commands.
///
/// # Invariants
/// - `unregister` only runs its command after `register` was attempted.
#[derive(Debug)]
pub struct CommandProvisioner {
    /// Group-version the register command publishes.
    group_version: GroupVersion,
    /// Register argv.
    register_command: Vec<String>,
    /// Unregister argv.
    unregister_command: Vec<String>,
    /// Per-command timeout.
    timeout: Duration,
    /// Set once the register command has been started.
    attempted: AtomicBool,
}

impl CommandProvisioner {
    /// Creates a provisioner from explicit commands.
    #[must_use]
    pub const fn new(
        group_version: GroupVersion,
        register_command: Vec<String>,
        unregister_command: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            group_version,
            register_command,
            unregister_command,
            timeout,
            attempted: AtomicBool::new(false),
        }
    }

    /// Creates a provisioner for a configured registered-type scenario.
    #[must_use]
    pub fn from_config(config: &RegisteredTypeConfig) -> Self {
        Self::new(
            config.group_version(),
            config.register_command.clone(),
            config.unregister_command.clone(),
            config.command_timeout(),
        )
    }
}

#[async_trait]
impl Provisioner for CommandProvisioner {
    async fn register(&self) -> Result<GroupVersion, ProvisionError> {
        self.attempted.store(true, Ordering::SeqCst);
        run_command(&self.register_command, self.timeout).await.map_err(ProvisionError::Register)?;
        info!(group_version = %self.group_version, "register command succeeded");
        Ok(self.group_version.clone())
    }

    async fn unregister(&self) -> Result<(), ProvisionError> {
        if !self.attempted.swap(false, Ordering::SeqCst) {
            debug!(group_version = %self.group_version, "nothing registered; skipping unregister");
            return Ok(());
        }
        run_command(&self.unregister_command, self.timeout)
            .await
            .map_err(ProvisionError::Unregister)?;
        info!(group_version = %self.group_version, "unregister command succeeded");
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs `argv` to completion within `timeout`.
///
/// The child is killed when the timeout elapses.
async fn run_command(argv: &[String], timeout: Duration) -> Result<(), String> {
    let (program, args) = argv.split_first().ok_or_else(|| "empty command".to_string())?;
    debug!(program = %program, "running provisioning command");
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|err| format!("failed to start {program}: {err}"))?;
    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| format!("{program} timed out after {} ms", timeout.as_millis()))?
        .map_err(|err| format!("failed to wait for {program}: {err}"))?;
    if output.status.success() {
        return Ok(());
    }
    let tail = stderr_tail(&output.stderr);
    if tail.is_empty() {
        Err(format!("{program} exited with {}", output.status))
    } else {
        Err(format!("{program} exited with {}: {tail}", output.status))
    }
}

/// Returns the trimmed last [`STDERR_TAIL_BYTES`] of `stderr`.
fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(stderr.get(start ..).unwrap_or_default()).trim().to_string()
}
