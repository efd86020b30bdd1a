//! Vanguard CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vanguard::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init => vanguard::cli::commands::init::execute(config, cli.json).await,
        Commands::Mission(args) => {
            vanguard::cli::commands::mission::execute(args, config, cli.json).await
        }
        Commands::Step(args) => vanguard::cli::commands::step::execute(args, config, cli.json).await,
        Commands::Work(args) => vanguard::cli::commands::work::execute(args, config, cli.json).await,
    };

    if let Err(err) = result {
        vanguard::cli::handle_error(err, cli.json);
    }
}
