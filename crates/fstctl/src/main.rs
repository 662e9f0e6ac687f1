mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fstctl_core::FstCtrl;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a daemon connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fstctl", &mut std::io::stdout());
            Ok(())
        }

        // All other commands require a control channel
        cmd => {
            let cfg = config::load_config()?;
            let mut ctrl_config = config::resolve_ctrl_config(&cli.global, &cfg)?;
            if let Command::Monitor(args) = &cmd {
                if let Some(secs) = args.ping_interval {
                    ctrl_config = ctrl_config.with_ping_interval_secs(secs);
                }
            } else {
                ctrl_config.ping_interval = None;
            }

            let ctrl = FstCtrl::connect(ctrl_config).await?;
            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &ctrl, &cli.global).await;
            ctrl.disconnect().await;
            result
        }
    }
}
