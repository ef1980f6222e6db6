pub mod context;
pub mod models;

pub use context::{default_config_dir, load_config_file, Context};
pub use models::ConfigFile;

use crate::constants;
use crate::error::Error;
use std::path::PathBuf;

/// Builds the invocation context from the process environment and
/// `<config dir>/config.toml`.
///
/// # Errors
/// Returns an error if the config directory cannot be determined or the
/// config file is unreadable or invalid.
pub fn load_context() -> Result<Context, Error> {
    let config_dir = match std::env::var(constants::ENV_CONFIG_DIR) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => default_config_dir()?,
    };
    let file = load_config_file(&config_dir)?;
    tracing::debug!(config_dir = %config_dir.display(), "loaded configuration");
    Context::from_sources(file, |name| std::env::var(name).ok(), config_dir)
}
