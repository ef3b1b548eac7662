#![forbid(unsafe_code)]

mod commands;
mod config;
mod helpers;
mod lifecycle_commands;
mod logging;

use backoffice_core::{resolve_backoffice_config_path, ConfigPathScope, ExitCode, MachineError};
use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Generator, Shell};
use serde_json::json;
use std::process::ExitCode as ProcessExitCode;
use tracing::{info, warn};

use crate::commands::{Grants, LifecycleCommand};

pub const CRATE_NAME: &str = "backoffice-cli";

const BACKOFFICE_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(version)]
#[command(about = "Back-office permission gates and lifecycle rules")]
#[command(help_template = BACKOFFICE_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  BACKOFFICE_CONFIG      Config file override\n  BACKOFFICE_LOG_LEVEL   Log filter override\n  BACKOFFICE_LOG_JSON    Emit logs as JSON"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,
    #[arg(long = "print-config-paths", default_value_t = false)]
    print_config_paths: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve capability flags from permission codes.
    Gates {
        #[arg(long)]
        domain: Option<String>,
        #[command(flatten)]
        grants: Grants,
    },
    /// Status, action and timeline rules of entity lifecycles.
    Lifecycle {
        #[command(subcommand)]
        command: LifecycleCommand,
    },
    /// Print a shell completion script.
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the CLI version.
    Version,
}

#[derive(Clone, Copy)]
pub(crate) struct LogFlags {
    pub(crate) quiet: bool,
    pub(crate) verbose: u8,
    pub(crate) trace: bool,
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub(crate) json: bool,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError::usage("invalid command line arguments")
                    .with_detail("error", &err.to_string()));
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    if cli.print_config_paths {
        return emit_config_paths(output_mode);
    }

    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;
    let log_flags = LogFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
        trace: cli.trace,
    };

    let command = match command {
        Commands::Completion { shell } => {
            print_completion(shell);
            return Ok(());
        }
        Commands::Version => return print_version(log_flags.verbose > 0, output_mode),
        other => other,
    };

    let (config, config_path) =
        config::load_cli_config().map_err(|e| CliError::validation(&e.to_string()))?;
    logging::init_tracing(log_flags, &config.logging);
    match &config_path {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => info!("no config file found; using defaults"),
    }
    if config.roles.values().any(Vec::is_empty) {
        warn!("config declares roles without permission codes");
    }

    match command {
        Commands::Gates { domain, grants } => {
            let permissions = config
                .permission_set(&grants.permissions, &grants.roles)
                .map_err(|e| CliError::validation(&e.to_string()))?;
            lifecycle_commands::run_gates(domain, &permissions, output_mode)
        }
        Commands::Lifecycle { command } => {
            lifecycle_commands::run_lifecycle_command(command, &config, output_mode)
        }
        Commands::Completion { .. } | Commands::Version => Ok(()),
    }
}

fn print_completion<G: Generator>(generator: G) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(generator, &mut command, name, &mut std::io::stdout());
}

fn print_version(verbose: bool, output_mode: OutputMode) -> Result<(), CliError> {
    let payload = if verbose {
        json!({
            "name": "backoffice",
            "version": env!("CARGO_PKG_VERSION"),
            "crates": [
                backoffice_core::CRATE_NAME,
                backoffice_model::CRATE_NAME,
                backoffice_policies::CRATE_NAME,
                CRATE_NAME,
            ],
        })
    } else {
        json!({"name": "backoffice", "version": env!("CARGO_PKG_VERSION")})
    };
    helpers::emit_ok(output_mode, payload).map_err(CliError::internal)
}

fn emit_config_paths(output_mode: OutputMode) -> Result<(), CliError> {
    let payload = json!({
        "workspace_config": resolve_backoffice_config_path(ConfigPathScope::Workspace),
        "user_config": resolve_backoffice_config_path(ConfigPathScope::User),
        "search_order": config::config_candidates(),
    });
    helpers::emit_ok(output_mode, payload).map_err(CliError::internal)
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }

    pub(crate) fn validation(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("validation_error", message),
        }
    }

    pub(crate) fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    pub(crate) fn dependency(message: String) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", &message),
        }
    }

    pub(crate) fn with_code(mut self, code: &str) -> Self {
        self.machine.code = code.to_string();
        self
    }

    fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.machine = self.machine.with_detail(key, value);
        self
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
        if let Some(detail) = error.machine.details.get("error") {
            eprintln!("{detail}");
        }
    }
}
