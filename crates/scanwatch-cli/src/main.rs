//! Scanwatch CLI - tail the build stream and spot newly unstable tests.

use clap::Parser;
use scanwatch_cli::commands::{self, Connection};
use scanwatch_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> scanwatch_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Profile(args) => {
            commands::execute_profile(args, &mut config, &formatter)?;
        }
        Command::Builds(args) => {
            let connection = Connection::resolve(&config, cli.server_url, cli.access_key_file)?;
            commands::execute_builds(args, &connection, &config.walker, &formatter).await?;
        }
        Command::Tests(args) => {
            let connection = Connection::resolve(&config, cli.server_url, cli.access_key_file)?;
            commands::execute_tests(args, &connection, &config.detector, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
