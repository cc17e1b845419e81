//! Config command handlers.

use anyhow::{Context, Result};
use convoy_core::config::{Config, paths};

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

/// Prints the effective configuration as TOML, with the base URL resolved
/// (env override applied).
pub fn show(config: &Config) -> Result<()> {
    let resolved = Config {
        base_url: config.resolve_base_url()?,
        ..config.clone()
    };
    let rendered = toml::to_string(&resolved).context("render config")?;
    print!("{rendered}");
    Ok(())
}
