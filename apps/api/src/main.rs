mod avatar;
mod config;
mod errors;
mod feed;
mod models;
mod onboarding;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::avatar::client::{AvatarClient, AvatarOutcome, AvatarOverrides, AvatarUpload};
use crate::avatar::photo::PhotoPayload;
use crate::avatar::provider::ReplicateClient;
use crate::config::Config;
use crate::feed::catalog::Catalog;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "agentme", version, about = "AgentMe onboarding and avatar API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve,
    /// Generate an avatar for a local photo through a running server.
    Avatar(AvatarArgs),
}

#[derive(Debug, clap::Args)]
struct AvatarArgs {
    /// Photo to upload.
    photo: PathBuf,
    #[arg(long, default_value = "http://localhost:3001")]
    server: String,
    #[arg(long)]
    prompt: Option<String>,
    #[arg(long)]
    style: Option<String>,
    /// Extra generations to request after the first, reusing the same photo.
    #[arg(long, default_value_t = 0)]
    regenerate: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), config::log_level()))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Avatar(args) => generate_avatar(args).await,
    }
}

async fn serve() -> Result<()> {
    let config = Config::from_env()?;
    info!("Starting AgentMe API v{}", env!("CARGO_PKG_VERSION"));

    if !config.has_replicate_token() {
        warn!(
            "REPLICATE_API_TOKEN is not set. Avatar generation will fail until you add it to .env"
        );
    }

    let generator = ReplicateClient::new(
        config.replicate_api_base.clone(),
        config.replicate_api_token.clone(),
        config.poll_timeout,
    )?;
    info!("Avatar generator initialized (model: {})", avatar::params::MODEL);

    let catalog = Catalog::seeded()?;

    let state = AppState {
        avatar_generator: Arc::new(generator),
        catalog,
        sessions: SessionStore::with_ttl(config.session_ttl),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");
    info!("POST requests to http://localhost:{}/api/generate-avatar", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn generate_avatar(args: AvatarArgs) -> Result<()> {
    let client = AvatarClient::new(&args.server)?;
    let photo = PhotoPayload::from_path(&args.photo).await?;
    let overrides = AvatarOverrides {
        prompt: args.prompt,
        style: args.style,
    };

    let mut upload = AvatarUpload::start(&client, photo, overrides).await;
    for _ in 0..args.regenerate {
        upload.regenerate(&client).await;
    }

    let outcome = upload.outcome();
    if let AvatarOutcome::Fallback { reason, .. } = outcome {
        warn!("Using original photo: {reason}");
    }
    if let Some(warning) = outcome.warning() {
        eprintln!("{warning}");
    }
    info!(
        "Avatar for {} finished after {} attempt(s), resolved: {}",
        upload.photo().filename,
        upload.attempts(),
        outcome.is_resolved()
    );
    println!("{}", outcome.display_url());

    Ok(())
}
