use std::path::Path;

use anyhow::Context;
use glossa_config::Config;

/// Config file if given, otherwise defaults with environment overrides
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => {
            tracing::debug!("No config file given, using environment defaults");
            Ok(Config::new())
        }
    }
}
