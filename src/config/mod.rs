mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<ScraperConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: ScraperConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config.scrapers_path = expand_tilde(&config.scrapers_path);
    if let Some(interpreter) = config.interpreter_path.take() {
        config.interpreter_path = Some(expand_tilde(&interpreter));
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<ScraperConfig> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./metaforge.toml",
        "~/.config/metaforge/config.toml",
        "/etc/metaforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(ScraperConfig::default())
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Validate configuration
fn validate_config(config: &ScraperConfig) -> Result<()> {
    if !config.scrapers_path.exists() {
        tracing::warn!("Scrapers path does not exist: {:?}", config.scrapers_path);
    }

    if let Some(proxy) = &config.proxy {
        reqwest::Url::parse(proxy)
            .with_context(|| format!("Invalid proxy URL: {}", proxy))?;
    }

    if let Some(interpreter) = &config.interpreter_path {
        if !interpreter.exists() {
            tracing::warn!("Interpreter path does not exist: {:?}", interpreter);
        }
    }

    Ok(())
}
