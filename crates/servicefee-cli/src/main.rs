// crates/servicefee-cli/src/main.rs
// ============================================================================
// Module: Service Fee CLI Entry Point
// Description: Command dispatcher for fee quotes and settings administration.
// Purpose: Provide a safe CLI over the shared fee policy.
// Dependencies: clap, servicefee-core, servicefee-config, serde, thiserror
// ============================================================================

//! ## Overview
//! The `servicefee` CLI quotes orders and administers the fee settings record.
//! Every quote goes through [`FeeSettingsService::quote`], the same path a
//! checkout would use, so a previewed fee and a charged fee cannot diverge.
//! Form-style string inputs are parsed at the boundary before any arithmetic.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use servicefee_cli::runtime::ConfiguredStore;
use servicefee_cli::runtime::RuntimeError;
use servicefee_cli::runtime::build_service;
use servicefee_cli::t;
use servicefee_config::ServiceFeeConfig;
use servicefee_core::FeeSettings;
use servicefee_core::FeeSettingsService;
use servicefee_core::OrderInputs;
use servicefee_core::parse_amount;
use servicefee_core::parse_setting_value;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Default actor recorded for CLI settings updates.
const DEFAULT_ACTOR: &str = "cli";

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "servicefee", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Quote an order total including the service fee.
    Quote(QuoteCommand),
    /// Inspect or update the fee settings record.
    Settings {
        /// Selected settings subcommand.
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Shared `--config` argument.
#[derive(Args, Debug)]
struct ConfigArg {
    /// Optional config file path (defaults to servicefee.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for order quotes.
#[derive(Args, Debug)]
struct QuoteCommand {
    /// Order subtotal before shipping, fees, and discounts.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    subtotal: String,
    /// Shipping cost.
    #[arg(long, value_name = "AMOUNT", default_value = "0", allow_hyphen_values = true)]
    shipping: String,
    /// Discount applied to the order.
    #[arg(long, value_name = "AMOUNT", default_value = "0", allow_hyphen_values = true)]
    discount: String,
    /// Config selection.
    #[command(flatten)]
    config: ConfigArg,
}

/// Settings subcommands.
#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Print the active fee settings.
    Show(SettingsShowCommand),
    /// Validate and persist new fee settings.
    Update(SettingsUpdateCommand),
}

/// Arguments for `settings show`.
#[derive(Args, Debug)]
struct SettingsShowCommand {
    /// Config selection.
    #[command(flatten)]
    config: ConfigArg,
}

/// Arguments for `settings update`.
#[derive(Args, Debug)]
struct SettingsUpdateCommand {
    /// Subtotal below which no fee is charged.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    min_free_threshold: String,
    /// Fee charged per bracket.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    fee_amount: String,
    /// Bracket size; must be greater than zero.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    fee_multiplier: String,
    /// Administrator recorded in the audit log.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_ACTOR)]
    actor: String,
    /// Config selection.
    #[command(flatten)]
    config: ConfigArg,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a service fee configuration file.
    Validate(ConfigArg),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog-rendered error messages.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a rendered message.
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
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Quote(command) => command_quote(&command),
        Commands::Settings {
            command,
        } => command_settings(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Quote Command
// ============================================================================

/// Executes the `quote` command.
fn command_quote(command: &QuoteCommand) -> CliResult<ExitCode> {
    let inputs = parse_order_inputs(command)?;
    let service = open_service(command.config.config.as_deref())?;
    let quote =
        service.quote(&inputs).map_err(|err| CliError::new(t!("quote.failed", error = err)))?;
    write_json(&quote)?;
    Ok(ExitCode::SUCCESS)
}

/// Parses quote amounts from their raw string form.
fn parse_order_inputs(command: &QuoteCommand) -> CliResult<OrderInputs> {
    Ok(OrderInputs {
        subtotal: parse_amount("subtotal", &command.subtotal).map_err(invalid_input)?,
        shipping: parse_amount("shipping", &command.shipping).map_err(invalid_input)?,
        discount: parse_amount("discount", &command.discount).map_err(invalid_input)?,
    })
}

// ============================================================================
// SECTION: Settings Commands
// ============================================================================

/// Active settings rendered by `settings show`.
#[derive(Debug, Serialize)]
struct SettingsView {
    /// Active settings.
    settings: FeeSettings,
    /// Where the settings came from (`store` or `defaults`).
    source: &'static str,
    /// Stored version; absent when defaults are active.
    version: Option<u64>,
    /// Last update time in milliseconds since the unix epoch.
    updated_at_ms: Option<i64>,
}

/// Dispatches settings subcommands.
fn command_settings(command: &SettingsCommand) -> CliResult<ExitCode> {
    match command {
        SettingsCommand::Show(command) => command_settings_show(command),
        SettingsCommand::Update(command) => command_settings_update(command),
    }
}

/// Executes the `settings show` command.
fn command_settings_show(command: &SettingsShowCommand) -> CliResult<ExitCode> {
    let service = open_service(command.config.config.as_deref())?;
    let active = service
        .resolve()
        .map_err(|err| CliError::new(t!("settings.load_failed", error = err)))?;
    let record = active.record.as_ref();
    let view = SettingsView {
        settings: active.settings,
        source: if record.is_some() { "store" } else { "defaults" },
        version: record.map(|record| record.version),
        updated_at_ms: record.map(|record| record.updated_at_ms),
    };
    write_json(&view)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `settings update` command.
fn command_settings_update(command: &SettingsUpdateCommand) -> CliResult<ExitCode> {
    let settings = parse_settings(command)?;
    let service = open_service(command.config.config.as_deref())?;
    let record = service
        .update(settings, &command.actor)
        .map_err(|err| CliError::new(t!("settings.update.failed", error = err)))?;
    if service.store().is_ephemeral() {
        write_stderr_line(&t!("settings.update.memory_backend"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    write_stdout_line(&t!(
        "settings.update.ok",
        version = record.version,
        actor = command.actor
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Parses settings fields from their raw string form.
fn parse_settings(command: &SettingsUpdateCommand) -> CliResult<FeeSettings> {
    Ok(FeeSettings::new(
        parse_setting_value("min_free_threshold", &command.min_free_threshold)
            .map_err(invalid_input)?,
        parse_setting_value("fee_amount", &command.fee_amount).map_err(invalid_input)?,
        parse_setting_value("fee_multiplier", &command.fee_multiplier).map_err(invalid_input)?,
    ))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigArg) -> CliResult<ExitCode> {
    let _config = ServiceFeeConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Service Helpers
// ============================================================================

/// Loads configuration and builds the settings service.
fn open_service(path: Option<&Path>) -> CliResult<FeeSettingsService<ConfiguredStore>> {
    let config = ServiceFeeConfig::load_or_default(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    build_service(&config).map_err(|err| CliError::new(runtime_error_message(&err)))
}

/// Renders a service wiring failure.
fn runtime_error_message(error: &RuntimeError) -> String {
    match error {
        RuntimeError::Audit {
            path,
            error,
        } => t!("audit.open_failed", path = path, error = error),
        RuntimeError::Store(_) | RuntimeError::Settings(_) => {
            t!("store.open_failed", error = error)
        }
    }
}

/// Maps a boundary parsing error into a CLI error.
fn invalid_input(error: impl std::fmt::Display) -> CliError {
    CliError::new(t!("input.invalid", error = error))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes canonical JSON followed by a newline to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
