//! Config subcommand handlers. None of these touch the daemon.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(config::render_config(&cfg)?.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { name, ctrl_iface } => {
            let path = config::config_path();
            let mut cfg = config::load_config()?;
            config::upsert_profile(&mut cfg, &name, ctrl_iface);
            config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Profile '{name}' saved to {}", path.display());
            }
            Ok(())
        }
    }
}
