//! CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use travollo_core::{ErrorContext, ErrorCoordinator, RawFailure, classify, translate};

use crate::config;

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a failure payload the way the portal does
    Classify {
        /// JSON payload, or `-` to read it from stdin
        input: String,

        /// Skip message translation
        #[arg(long)]
        untranslated: bool,
    },

    /// Translate a backend message
    Translate {
        /// Message as sent by the backend
        message: String,
    },

    /// Handler settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective settings as TOML
    Show,

    /// Generate a settings file with default values
    Init {
        /// Output file path
        #[arg(default_value = "travollo.toml")]
        output: PathBuf,
    },
}

impl Commands {
    pub fn execute(self, config_file: Option<&Path>) -> Result<()> {
        match self {
            Self::Classify {
                input,
                untranslated,
            } => {
                let settings = config::load_settings(config_file)?;
                let raw = RawFailure::from_json_str(&read_input(&input)?);
                let error = if untranslated {
                    classify(&raw)
                } else {
                    ErrorCoordinator::from_settings(&settings)
                        .handle(&raw, Some(&ErrorContext::operation("cli_classify")))
                };
                println!("{}", serde_json::to_string_pretty(&error)?);
                Ok(())
            }
            Self::Translate { message } => {
                println!("{}", translate(&message));
                Ok(())
            }
            Self::Config { command } => command.execute(config_file),
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, config_file: Option<&Path>) -> Result<()> {
        match self {
            Self::Show => {
                let settings = config::load_settings(config_file)?;
                print!("{}", settings.to_toml_string()?);
                Ok(())
            }
            Self::Init { output } => {
                // Create parent directory if it doesn't exist
                if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }

                config::generate_default_settings(&output)?;
                info!("Generated settings at: {}", output.display());
                println!("Generated settings at: {}", output.display());
                Ok(())
            }
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read payload from stdin")?;
        Ok(buffer)
    } else {
        Ok(input.to_string())
    }
}
