//! Handler functions for `almanac config` subcommands.

use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::{Error, Result};

/// Config subcommands.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print the effective configuration with the secret masked
    Show,
    /// Write a configuration template
    Init {
        /// Destination file (defaults to the platform config path)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Dispatch a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let (path, exists) = cmd_config_path(config_path)?;
            println!("{}", path.display());
            if !exists {
                eprintln!("(file does not exist; run `almanac config init` to create it)");
            }
            Ok(())
        }
        ConfigAction::Show => {
            print!("{}", cmd_config_show(config_path)?);
            Ok(())
        }
        ConfigAction::Init { file, force } => {
            let path = cmd_config_init(file.as_deref().or(config_path), force)?;
            println!("Config file created at {}", path.display());
            Ok(())
        }
    }
}

/// Resolve the config file path and whether it exists.
pub fn cmd_config_path(config_path: Option<&str>) -> Result<(PathBuf, bool)> {
    let path = SiteConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory for this platform"))?;
    let exists = path.exists();
    Ok((path, exists))
}

/// Render the effective configuration as TOML with the secret masked.
pub fn cmd_config_show(config_path: Option<&str>) -> Result<String> {
    SiteConfig::load(config_path)?.redacted().to_toml_string()
}

/// Write a default configuration file and return its path.
pub fn cmd_config_init(file: Option<&str>, force: bool) -> Result<PathBuf> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => SiteConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent.display()))?;
    }

    let toml_str = SiteConfig::default().to_toml_string()?;
    std::fs::write(&path, toml_str).map_err(|e| Error::io_with_path(e, path.display()))?;
    Ok(path)
}
