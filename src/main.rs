//! `hyadm` command-line entry point.
//!
//! Loads the tool configuration, applies environment and flag overrides,
//! then runs one user-management command against the Hysteria server
//! document.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use hyadm::admin::{AdminCommand, Console, UserAdmin, cli};
use hyadm::config::{CliOverrides, apply_overrides, load_tool_config, validate_config};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Manage Hysteria proxy users.
#[derive(Parser)]
#[command(name = "hyadm", version, about, propagate_version = true)]
struct Cli {
    /// Tool config file (default: $HYADM_CONFIG_PATH, then /etc/hyadm/config.yaml,
    /// then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: CliOverrides,

    #[command(subcommand)]
    command: AdminCommand,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let loaded = match load_tool_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if loaded.created {
        eprintln!("Config created: {}", loaded.path.display());
    }

    let mut config = loaded.config;
    apply_overrides(&mut config, &args.overrides);
    if let Err(e) = validate_config(&config) {
        eprintln!("Error: {}", e);
        return ExitCode::from(2);
    }

    init_tracing(&config.logging.level);
    debug!(
        version = hyadm::core::VERSION,
        config = %loaded.path.display(),
        hysteria = %config.hysteria.config_path.display(),
        "hyadm starting"
    );

    let admin = match UserAdmin::from_config(&config) {
        Ok(admin) => admin,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            return;
        }
        on_signal.cancel();
    });

    let mut console = Console::stdio();
    let result = tokio::select! {
        result = cli::run(
            args.command,
            &admin,
            &config.hysteria.config_path,
            &mut console,
            &cancel,
        ) => result,
        _ = cancel.cancelled() => Err(cli::CliError::Canceled),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
