// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OmniConvo - save AI conversations over MCP and share them by permalink.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod bootstrap;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// OmniConvo - save AI conversations over MCP and share them by permalink.
#[derive(Parser, Debug)]
#[command(name = "omniconvo", version, about, long_about = None)]
struct Cli {
    /// Load this configuration file (plus environment overrides) instead of
    /// the standard search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the MCP gateway.
    Serve {
        /// Open storage on the first tool call instead of at startup.
        #[arg(long)]
        lazy_init: bool,
    },
    /// Validate and print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => omniconvo_config::load_and_validate_path(path),
        None => omniconvo_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            omniconvo_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve { lazy_init }) => {
            if let Err(e) = serve::run_serve(config, lazy_init).await {
                eprintln!("error: {}", e.cause_chain());
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("omniconvo: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn serve_accepts_lazy_init() {
        let cli = Cli::try_parse_from(["omniconvo", "serve", "--lazy-init"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Serve { lazy_init: true })
        ));
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["omniconvo", "config", "--config", "/tmp/omni.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/omni.toml")));
    }

    #[test]
    fn default_config_renders_as_toml() {
        let config = omniconvo_config::load_and_validate_str("").unwrap();
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("base_url = \"http://localhost:3000\""));
        assert!(rendered.contains("[server]"));
        let reparsed = omniconvo_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(reparsed.server.port, config.server.port);
    }
}
