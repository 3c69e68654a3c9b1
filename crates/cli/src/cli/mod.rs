pub mod config;
pub mod session;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

/// SessionKeeper — persisted pairing session for wallet/dApp clients.
#[derive(Debug, Parser)]
#[command(name = "sessionkeeper", version, about)]
pub struct Cli {
    /// Print session records as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current session (default when no subcommand is given).
    Show,
    /// Discard the stored session and create a new one.
    Reset,
    /// Rotate the session id, invalidating anyone holding the old one.
    Clear,
    /// Change the session lifetime, keeping the current session id.
    SetDuration {
        /// New lifetime in seconds.
        secs: u64,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `SK_CONFIG` (or
/// `config.toml` by default).  Returns the parsed config and the path that
/// was used.
pub fn load_config() -> anyhow::Result<(sk_domain::config::Config, String)> {
    let config_path = std::env::var("SK_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(Path::new(&config_path))?;
    Ok((config, config_path))
}

/// Parse `path`, falling back to defaults when the file does not exist.
pub fn load_config_from(path: &Path) -> anyhow::Result<sk_domain::config::Config> {
    if !path.exists() {
        return Ok(sk_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.session.duration_secs, 604_800);
    }

    #[test]
    fn parses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nduration_secs = 120\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.session.duration_secs, 120);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn cli_parses_set_duration() {
        let cli = Cli::parse_from(["sessionkeeper", "--json", "set-duration", "3600"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Command::SetDuration { secs: 3600 })));
    }
}
