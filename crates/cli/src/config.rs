//! CLI configuration utilities

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use travollo_core::HandlerSettings;

/// Load handler settings from a file, or from the environment when no file
/// is given
pub fn load_settings(path: Option<&Path>) -> Result<HandlerSettings> {
    match path {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            HandlerSettings::from_file(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))
        }
        None => {
            info!("Using default settings with environment overrides");
            Ok(HandlerSettings::from_env()?)
        }
    }
}

/// Write the default settings as TOML
pub fn generate_default_settings<P: AsRef<Path>>(path: P) -> Result<()> {
    let content = HandlerSettings::default().to_toml_string()?;
    std::fs::write(path, content)?;
    Ok(())
}
