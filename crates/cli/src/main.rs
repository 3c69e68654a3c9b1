use clap::Parser;
use tracing_subscriber::EnvFilter;

use sk_cli::cli::{self, Cli, Command, ConfigCommand};
use sk_domain::config::ObservabilityConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default to show when no subcommand is given.
        None | Some(Command::Show) => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let view = cli::session::show(&config).await?;
            println!("{}", view.render(cli.json)?);
            Ok(())
        }
        Some(Command::Reset) => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let view = cli::session::reset(&config).await?;
            println!("{}", view.render(cli.json)?);
            Ok(())
        }
        Some(Command::Clear) => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let session_id = cli::session::clear(&config).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "session_id": session_id }));
            } else {
                println!("session {session_id}");
            }
            Ok(())
        }
        Some(Command::SetDuration { secs }) => {
            let (config, _) = cli::load_config()?;
            init_tracing(&config.observability);
            let view = cli::session::set_duration(&config, secs).await?;
            println!("{}", view.render(cli.json)?);
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Validate)) => {
            let (config, config_path) = cli::load_config()?;
            if !cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show)) => {
            let (config, _) = cli::load_config()?;
            cli::config::show(&config)
        }
        Some(Command::Version) => {
            println!("sessionkeeper {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize stderr tracing so diagnostics never pollute stdout.
///
/// `RUST_LOG` wins over the configured default filter.
fn init_tracing(obs: &ObservabilityConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&obs.default_filter));

    if obs.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
