//! # Config Commands
//!
//! These run before any [`AppContext`](platter_client::AppContext) exists,
//! so a broken config can still be inspected and rewritten.

use std::path::PathBuf;

use clap::Subcommand;
use platter_client::ClientConfig;
use serde_json::json;

use super::Report;
use crate::error::{CliError, CliResult, ErrorCode};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + environment)
    Show,

    /// Print where the config file is read from
    Path,

    /// Write a config file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn execute(command: ConfigCommand, path: Option<PathBuf>) -> CliResult<Report> {
    match command {
        ConfigCommand::Show => {
            let config = ClientConfig::load(path)?;
            let text = toml::to_string_pretty(&config)
                .map_err(|e| CliError::internal(format!("Could not render config: {e}")))?;
            Report::new(text.trim_end(), &config)
        }
        ConfigCommand::Path => {
            let path = resolve(path)?;
            Report::new(path.display().to_string(), &json!({ "path": path }))
        }
        ConfigCommand::Init { force } => {
            let path = resolve(path)?;
            if path.exists() && !force {
                return Err(CliError::new(
                    ErrorCode::ConfigError,
                    format!("{} already exists (use --force to replace it)", path.display()),
                ));
            }
            ClientConfig::default().save(Some(path.clone()))?;
            Report::new(
                format!("Wrote {}", path.display()),
                &json!({ "path": path }),
            )
        }
    }
}

fn resolve(path: Option<PathBuf>) -> CliResult<PathBuf> {
    path.or_else(ClientConfig::default_config_path).ok_or_else(|| {
        CliError::new(ErrorCode::ConfigError, "No config directory on this platform")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> PathBuf {
        std::env::temp_dir()
            .join(format!("platter-cli-{}", std::process::id()))
            .join(format!("{:?}.toml", std::thread::current().id()).replace(['(', ')'], ""))
    }

    #[test]
    fn test_init_then_refuse_overwrite() {
        let path = scratch();
        let _ = std::fs::remove_file(&path);

        let report = execute(ConfigCommand::Init { force: false }, Some(path.clone())).unwrap();
        assert!(report.text.starts_with("Wrote "));
        assert!(path.exists());

        let err = execute(ConfigCommand::Init { force: false }, Some(path.clone())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);

        execute(ConfigCommand::Init { force: true }, Some(path.clone())).unwrap();

        let report = execute(ConfigCommand::Path, Some(path.clone())).unwrap();
        assert_eq!(report.text, path.display().to_string());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_show_reads_file() {
        let path = scratch().with_extension("show.toml");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "[display]\ncurrency_symbol = \"Rs \"\n").unwrap();

        let report = execute(ConfigCommand::Show, Some(path.clone())).unwrap();
        assert_eq!(report.data["display"]["currency_symbol"], "Rs ");
        assert!(report.text.contains("[api]"));

        let _ = std::fs::remove_file(&path);
    }
}
