// crates/openapi-conformance-cli/src/main.rs
// ============================================================================
// Module: OpenAPI Conformance CLI Entry Point
// Description: Command dispatcher for discovery conformance runs.
// Purpose: Run scenarios against a live endpoint and emit reports.
// Dependencies: clap, openapi-conformance-core, openapi-conformance-config,
//               openapi-conformance-http, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `openapi-conformance` CLI loads the verifier config, connects to the
//! discovery endpoint, and runs the built-in and registered-type scenarios
//! concurrently. Reports go to stdout (canonical JSON or Markdown) and logs
//! go to stderr. Exit codes: 0 when every check passes, 1 when any check
//! fails, 2 on usage, config, provisioning, or runtime errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod provisioner;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use openapi_conformance_config::BUILTIN_SCENARIO_NAME;
use openapi_conformance_config::ConformanceConfig;
use openapi_conformance_config::DiscoveryConfig;
use openapi_conformance_config::RegisteredKind;
use openapi_conformance_core::DiscoverySource;
use openapi_conformance_core::GroupVersion;
use openapi_conformance_core::runtime::BuiltinScenario;
use openapi_conformance_core::runtime::CancelHandle;
use openapi_conformance_core::runtime::ConformanceReport;
use openapi_conformance_core::runtime::GroupVersionVerdict;
use openapi_conformance_core::runtime::PublicationWaiter;
use openapi_conformance_core::runtime::RegisteredTypeScenario;
use openapi_conformance_core::runtime::RoundTripChecker;
use openapi_conformance_core::runtime::RunStatus;
use openapi_conformance_core::runtime::ScenarioError;
use openapi_conformance_core::runtime::ScenarioReport;
use openapi_conformance_core::runtime::cancel_pair;
use openapi_conformance_core::runtime::collect_snapshot;
use openapi_conformance_http::HttpDiscoverySource;
use openapi_conformance_http::HttpSourceConfig;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::task::Id as TaskId;
use tokio::task::JoinSet;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::provisioner::CommandProvisioner;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code when every check passed.
const EXIT_PASS: u8 = 0;
/// Exit code when at least one check failed.
const EXIT_FAIL: u8 = 1;
/// Exit code for usage, config, provisioning, or runtime errors.
const EXIT_ERROR: u8 = 2;
/// Log filter used when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "info";
/// Maximum size of a CA certificate bundle.
const MAX_CA_FILE_BYTES: usize = 1024 * 1024;
/// File name of the JSON report written to `--report-dir`.
const REPORT_JSON_NAME: &str = "report.json";
/// File name of the Markdown report written to `--report-dir`.
const REPORT_MARKDOWN_NAME: &str = "report.md";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "openapi-conformance", version, disable_help_subcommand = true)]
struct Cli {
    /// Log filter directive (overrides `RUST_LOG`), e.g. `debug` or
    /// `openapi_conformance_core=trace`.
    #[arg(long, value_name = "FILTER", global = true)]
    log_level: Option<String>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run conformance scenarios and report verdicts.
    Run(RunCommand),
    /// List the group-versions currently published.
    List(ListCommand),
    /// Write the current documents to a directory as canonical JSON.
    Snapshot(SnapshotCommand),
    /// Wait for an externally registered group-version, then verify it.
    Await(AwaitCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Shared `--config` argument.
#[derive(Args, Debug, Clone, Default)]
struct ConfigArgs {
    /// Config file path (defaults to openapi-conformance.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Which scenarios to run.
    #[arg(long, value_enum, default_value_t = ScenarioSelection::All)]
    scenario: ScenarioSelection,
    /// Directory that receives `report.json` and `report.md`.
    #[arg(long, value_name = "DIR")]
    report_dir: Option<PathBuf>,
    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
}

/// Arguments for the `list` command.
#[derive(Args, Debug)]
struct ListCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Only list group-versions selected by the built-in allow-set.
    #[arg(long)]
    builtin_only: bool,
}

/// Arguments for the `snapshot` command.
#[derive(Args, Debug)]
struct SnapshotCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Directory that receives one JSON file per group-version.
    #[arg(long, value_name = "DIR")]
    output_dir: PathBuf,
    /// Include every listed group-version, not only the built-in allow-set.
    #[arg(long)]
    all: bool,
}

/// Arguments for the `await` command.
#[derive(Args, Debug)]
struct AwaitCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// API group to await; empty for the core group.
    #[arg(long, default_value = "")]
    group: String,
    /// API version to await.
    #[arg(long)]
    version: String,
    /// Verdict format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a verifier configuration file.
    Validate(ConfigArgs),
}

/// Scenario selection for `run`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ScenarioSelection {
    /// Only the built-in scenario.
    Builtin,
    /// Only the configured registered-type scenarios.
    Registered,
    /// Every configured scenario.
    All,
}

impl ScenarioSelection {
    /// Returns true when the built-in scenario is selected.
    const fn includes_builtin(self) -> bool {
        matches!(self, Self::Builtin | Self::All)
    }

    /// Returns true when registered-type scenarios are selected.
    const fn includes_registered(self) -> bool {
        matches!(self, Self::Registered | Self::All)
    }
}

/// Output formats for reports.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Canonical JSON.
    Json,
    /// Markdown summary.
    Markdown,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Run(command) => command_run(command).await,
        Commands::List(command) => command_list(command).await,
        Commands::Snapshot(command) => command_snapshot(command).await,
        Commands::Await(command) => command_await(command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Installs the stderr log subscriber.
fn init_logging(log_level: Option<&str>) -> CliResult<()> {
    let filter = log_filter(log_level)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|err| CliError::new(format!("failed to initialize logging: {err}")))
}

/// Resolves the log filter from the flag, `RUST_LOG`, or the default.
fn log_filter(log_level: Option<&str>) -> CliResult<EnvFilter> {
    match log_level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|err| CliError::new(format!("invalid --log-level {directive:?}: {err}"))),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// A scenario ready to run.
enum PlannedScenario {
    /// The built-in allow-set scenario.
    Builtin(BuiltinScenario),
    /// A registered-type scenario driven by commands.
    Registered(RegisteredTypeScenario<CommandProvisioner>),
}

impl PlannedScenario {
    /// Returns the scenario name.
    fn name(&self) -> &str {
        match self {
            Self::Builtin(scenario) => scenario.name(),
            Self::Registered(scenario) => scenario.name(),
        }
    }

    /// Runs the scenario to completion.
    async fn run(
        self,
        source: &HttpDiscoverySource,
        waiter: &PublicationWaiter,
        checker: &RoundTripChecker,
    ) -> Result<ScenarioReport, ScenarioError> {
        match self {
            Self::Builtin(scenario) => scenario.run(source, checker).await,
            Self::Registered(scenario) => scenario.run(source, waiter, checker).await,
        }
    }
}

/// Builds the scenarios selected by `selection` from config.
fn plan_scenarios(config: &ConformanceConfig, selection: ScenarioSelection) -> Vec<PlannedScenario> {
    let mut planned = Vec::new();
    if selection.includes_builtin() && config.builtin.enabled {
        planned.push(PlannedScenario::Builtin(BuiltinScenario::new(
            BUILTIN_SCENARIO_NAME,
            config.builtin.filter(),
        )));
    }
    if selection.includes_registered() {
        for entry in &config.registered {
            let provisioner = CommandProvisioner::from_config(entry);
            let scenario = match entry.kind {
                RegisteredKind::Dynamic => {
                    RegisteredTypeScenario::dynamic_type(entry.name.clone(), provisioner)
                }
                RegisteredKind::Aggregated => {
                    RegisteredTypeScenario::aggregated_type(entry.name.clone(), provisioner)
                }
            };
            planned.push(PlannedScenario::Registered(scenario));
        }
    }
    planned
}

/// Executes the `run` command.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.config.as_deref())?;
    let planned = plan_scenarios(&config, command.scenario);
    if planned.is_empty() {
        return Err(CliError::new(
            "no scenarios selected; enable [builtin] or configure [[registered]] entries"
                .to_string(),
        ));
    }
    let source = Arc::new(build_source(&config.discovery)?);
    let checker = Arc::new(config.roundtrip.checker());
    let policy =
        config.polling.policy().map_err(|err| CliError::new(format!("config invalid: {err}")))?;
    let (cancel, signal) = cancel_pair();
    let waiter = Arc::new(PublicationWaiter::new(policy).with_cancel(signal));
    let interrupt = cancel_on_interrupt(cancel);

    let mut tasks = JoinSet::new();
    let mut names = HashMap::new();
    for scenario in planned {
        info!(scenario = scenario.name(), "starting scenario");
        let name = scenario.name().to_string();
        let source = Arc::clone(&source);
        let waiter = Arc::clone(&waiter);
        let checker = Arc::clone(&checker);
        let handle = tasks.spawn(async move { scenario.run(&source, &waiter, &checker).await });
        names.insert(handle.id(), name);
    }
    let outcomes = collect_outcomes(tasks, &names).await;
    interrupt.abort();

    let report = ConformanceReport::from_outcomes(checker.codec_name(), outcomes);
    let json = report
        .to_canonical_json()
        .map_err(|err| CliError::new(format!("failed to serialize report: {err}")))?;
    let markdown = report.to_markdown();
    if let Some(dir) = &command.report_dir {
        write_report_dir(dir, &json, &markdown)?;
    }
    match command.format {
        OutputFormat::Json => write_stdout_bytes_with_newline(&json)?,
        OutputFormat::Markdown => write_stdout_bytes(markdown.as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
    }
    info!(
        status = report.status.as_str(),
        scenarios = report.summary.scenarios,
        checks_failed = report.summary.checks_failed,
        "conformance run finished"
    );
    Ok(ExitCode::from(exit_status_code(report.status)))
}

/// Waits for every scenario task, recording a task that panicked or was
/// aborted as an error for its scenario.
async fn collect_outcomes(
    mut tasks: JoinSet<Result<ScenarioReport, ScenarioError>>,
    names: &HashMap<TaskId, String>,
) -> Vec<Result<ScenarioReport, ScenarioError>> {
    let mut outcomes = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next_with_id().await {
        let outcome = match joined {
            Ok((_, outcome)) => outcome,
            Err(err) => {
                let scenario =
                    names.get(&err.id()).cloned().unwrap_or_else(|| format!("task {}", err.id()));
                warn!(scenario = %scenario, error = %err, "scenario task stopped");
                Err(ScenarioError::Aborted {
                    scenario,
                    message: err.to_string(),
                })
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

/// Maps a run status to its process exit code.
const fn exit_status_code(status: RunStatus) -> u8 {
    match status {
        RunStatus::Pass => EXIT_PASS,
        RunStatus::Fail => EXIT_FAIL,
        RunStatus::Error => EXIT_ERROR,
    }
}

/// Writes both report renderings into `dir`.
fn write_report_dir(dir: &Path, json: &[u8], markdown: &str) -> CliResult<()> {
    fs::create_dir_all(dir).map_err(|err| {
        CliError::new(format!("failed to create report dir {}: {err}", dir.display()))
    })?;
    write_file(&dir.join(REPORT_JSON_NAME), json)?;
    write_file(&dir.join(REPORT_MARKDOWN_NAME), markdown.as_bytes())
}

/// Cancels in-flight waits when the process receives Ctrl-C.
fn cancel_on_interrupt(cancel: CancelHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling publication waits");
            cancel.cancel();
        }
    })
}

// ============================================================================
// SECTION: Discovery Commands
// ============================================================================

/// Executes the `list` command.
async fn command_list(command: ListCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.config.as_deref())?;
    let source = build_source(&config.discovery)?;
    let listed = source
        .list_group_versions()
        .await
        .map_err(|err| CliError::new(format!("listing failed: {err}")))?;
    let listed =
        if command.builtin_only { config.builtin.filter().select(&listed) } else { listed };
    for group_version in &listed {
        write_stdout_line(&group_version.to_string())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `snapshot` command.
async fn command_snapshot(command: SnapshotCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.config.as_deref())?;
    let source = build_source(&config.discovery)?;
    let filter = (!command.all).then(|| config.builtin.filter());
    let snapshot = collect_snapshot(&source, filter.as_ref())
        .await
        .map_err(|err| CliError::new(format!("snapshot failed: {err}")))?;
    fs::create_dir_all(&command.output_dir).map_err(|err| {
        CliError::new(format!(
            "failed to create output dir {}: {err}",
            command.output_dir.display()
        ))
    })?;
    for (group_version, document) in &snapshot {
        let bytes = serde_jcs::to_vec(document).map_err(|err| {
            CliError::new(format!("failed to serialize {group_version}: {err}"))
        })?;
        write_file(&command.output_dir.join(snapshot_file_name(group_version)), &bytes)?;
    }
    write_stdout_line(&format!(
        "wrote {} documents to {}",
        snapshot.len(),
        command.output_dir.display()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Returns the file name a snapshot document is written to.
///
/// Mirrors the listing path (`api_<v>` or `apis_<g>_<v>`); characters outside
/// `[A-Za-z0-9._-]` become `_`.
fn snapshot_file_name(group_version: &GroupVersion) -> String {
    let stem = if group_version.is_core() {
        format!("api_{}", group_version.version())
    } else {
        format!("apis_{}_{}", group_version.group(), group_version.version())
    };
    let sanitized: String = stem
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') { ch } else { '_' })
        .collect();
    format!("{sanitized}.json")
}

/// Executes the `await` command.
async fn command_await(command: AwaitCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.config.as_deref())?;
    if command.version.trim().is_empty() {
        return Err(CliError::new("--version must be non-empty".to_string()));
    }
    let target = GroupVersion::new(command.group, command.version);
    let source = build_source(&config.discovery)?;
    let checker = config.roundtrip.checker();
    let policy =
        config.polling.policy().map_err(|err| CliError::new(format!("config invalid: {err}")))?;
    let (cancel, signal) = cancel_pair();
    let waiter = PublicationWaiter::new(policy).with_cancel(signal);
    let interrupt = cancel_on_interrupt(cancel);

    let waited = waiter.await_publication(&source, &target).await;
    interrupt.abort();
    let verdict = match waited {
        Ok(publication) => checker.verify(&publication.document),
        Err(err) => {
            let message = err.to_string();
            err.into_verdict().ok_or_else(|| CliError::new(message))?
        }
    };
    let passed = verdict.is_pass();
    let result = GroupVersionVerdict {
        group_version: target,
        verdict,
    };
    match command.format {
        OutputFormat::Json => {
            let bytes = serde_jcs::to_vec(&result)
                .map_err(|err| CliError::new(format!("failed to serialize verdict: {err}")))?;
            write_stdout_bytes_with_newline(&bytes)?;
        }
        OutputFormat::Markdown => {
            write_stdout_line(&format!(
                "- `{}`: {}\n  - {}",
                result.group_version,
                result.verdict.kind().as_str(),
                result.verdict
            ))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::from(if passed { EXIT_PASS } else { EXIT_FAIL }))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(args) => command_config_validate(&args),
    }
}

/// Executes the config validation command.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    config
        .discovery
        .resolve_bearer_token()
        .map_err(|err| CliError::new(format!("config invalid: {err}")))?;
    write_stdout_line(&format!(
        "config ok: {} registered scenario(s), built-in {}",
        config.registered.len(),
        if config.builtin.enabled { "enabled" } else { "disabled" }
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Setup Helpers
// ============================================================================

/// Loads, overrides, and validates the config.
fn load_config(path: Option<&Path>) -> CliResult<ConformanceConfig> {
    ConformanceConfig::load(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Builds the HTTP discovery source from the discovery config.
fn build_source(discovery: &DiscoveryConfig) -> CliResult<HttpDiscoverySource> {
    let endpoint = Url::parse(&discovery.endpoint)
        .map_err(|err| CliError::new(format!("invalid endpoint: {err}")))?;
    let bearer_token = discovery
        .resolve_bearer_token()
        .map_err(|err| CliError::new(format!("failed to resolve bearer token: {err}")))?;
    let ca_certificate_pem = discovery
        .ca_file
        .as_deref()
        .map(|path| {
            read_bytes_with_limit(path, MAX_CA_FILE_BYTES).map_err(|err| {
                CliError::new(format!("failed to read ca file {}: {err}", path.display()))
            })
        })
        .transpose()?;
    if discovery.insecure_skip_tls_verify {
        warn!("tls certificate verification is disabled");
    }
    let mut config = HttpSourceConfig::new(endpoint);
    config.bearer_token = bearer_token;
    config.ca_certificate_pem = ca_certificate_pem;
    config.insecure_skip_tls_verify = discovery.insecure_skip_tls_verify;
    config.timeout = discovery.request_timeout();
    config.max_response_bytes = discovery.max_response_bytes;
    HttpDiscoverySource::new(config).map_err(|err| CliError::new(err.to_string()))
}

/// Errors returned by bounded file reads.
#[derive(Debug, Error)]
enum ReadLimitError {
    /// File I/O failure.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// File size exceeds the configured limit.
    #[error("file exceeds size limit ({size} > {limit})")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes bytes to `path`.
fn write_file(path: &Path, bytes: &[u8]) -> CliResult<()> {
    fs::write(path, bytes)
        .map_err(|err| CliError::new(format!("failed to write {}: {err}", path.display())))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes raw bytes to stdout with a trailing newline.
fn write_stdout_bytes_with_newline(bytes: &[u8]) -> CliResult<()> {
    let mut buffer = bytes.to_vec();
    buffer.push(b'\n');
    write_stdout_bytes(&buffer).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns the error exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_ERROR)
}
