use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

mod models;
mod server;
mod session;
mod settings;
mod ui;

use settings::{resolve_generation_settings, CliOverrides, EnvOverrides};

#[derive(Debug, Parser)]
#[command(name = "hr_assistant")]
#[command(about = "HR assistant chat service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Start {
        #[arg(long, default_value = "127.0.0.1:5000")]
        listen: String,
        /// Model name sent to the provider.
        #[arg(long)]
        model: Option<String>,
        /// Maximum turns kept per session before the oldest are dropped
        /// (floored at 2, one user/assistant pair).
        #[arg(long)]
        max_turns: Option<usize>,
        /// Generation call timeout in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Start {
            listen,
            model,
            max_turns,
            timeout_secs,
        } => {
            let addr: SocketAddr = listen.parse()?;
            let overrides = CliOverrides {
                model,
                max_turns,
                timeout_secs,
            };
            let settings = resolve_generation_settings(&overrides, &EnvOverrides::from_env());
            tracing::info!(model = %settings.model, max_turns = settings.max_turns, "starting");

            let generator = models::OpenAICompatible::from_env(
                settings.model.clone(),
                settings.params.clone(),
                settings.timeout(),
            )?;
            let state = server::AppState::new(
                session::SessionStore::new(settings.max_turns),
                Arc::new(generator),
            );
            server::serve(addr, state).await?;
        }
    }
    Ok(())
}
