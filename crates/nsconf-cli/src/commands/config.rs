use std::path::Path;

use anyhow::Context;
use tracing::debug;

use nsconf_core::AppConfig;

const DEFAULT_CONFIG: &str = "nsconf.toml";

/// Load the config file (explicit path, else ./nsconf.toml if present, else
/// defaults) and apply `NSCONF_*` environment overrides.
pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => AppConfig::from_file(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("failed to load config {DEFAULT_CONFIG}"))?,
        None => {
            debug!("no config file, using defaults");
            AppConfig::default()
        }
    };
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

pub fn init(path: &Path, data_file: Option<&str>, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let config = match data_file {
        Some(data_file) => AppConfig::scaffold(data_file),
        None => AppConfig::default(),
    };
    std::fs::write(path, config.to_toml_string()?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("✓ Generated {}", path.display());
    Ok(())
}
