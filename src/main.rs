//! yourtime - access token tool and demo API
//!
//! Issue and verify access tokens, or run an API whose routes are guarded by
//! the bearer token gate.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, routing::get, Extension, Json, Router};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use yourtime_http_auth::{require_auth, TokenAuthState};
use yourtime_token::{build_maker, Payload, TokenBackend, TokenMaker};

/// yourtime - stateless access tokens
#[derive(Parser, Debug)]
#[command(name = "yourtime")]
#[command(about = "yourtime - issue and verify stateless access tokens")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    token: TokenArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Token maker configuration shared by every subcommand
#[derive(Args, Debug)]
struct TokenArgs {
    /// Token backend: "aead" (AES-256-GCM sealed) or "jwt" (HS256 signed)
    #[arg(long, global = true, env = "YOURTIME_TOKEN_BACKEND", default_value = "aead")]
    backend: TokenBackend,

    /// Symmetric key (exactly 32 bytes for aead, at least 32 for jwt)
    #[arg(
        long,
        global = true,
        env = "YOURTIME_TOKEN_SYMMETRIC_KEY",
        hide_env_values = true
    )]
    symmetric_key: Option<String>,
}

impl TokenArgs {
    /// Build the configured maker; a bad key is a startup failure
    fn build_maker(&self) -> Result<Arc<dyn TokenMaker>> {
        let key = self
            .symmetric_key
            .as_deref()
            .context("symmetric key not configured (set YOURTIME_TOKEN_SYMMETRIC_KEY)")?;

        build_maker(self.backend, key.as_bytes()).context("cannot create token maker")
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue an access token for a subject
    #[command(long_about = r#"
Issue an access token for a subject and print it to stdout.

EXAMPLES:
  # 15 minute token with the sealed backend
  yourtime --symmetric-key $KEY issue --subject ana@example.com

  # One hour JWT
  yourtime --backend jwt --symmetric-key $KEY issue -s ana@example.com -d 60

ENVIRONMENT VARIABLES:
  YOURTIME_TOKEN_BACKEND          Token backend (aead, jwt)
  YOURTIME_TOKEN_SYMMETRIC_KEY    Symmetric key
  YOURTIME_ACCESS_TOKEN_DURATION  Token lifetime in minutes
    "#)]
    Issue {
        /// Subject the token speaks for (e.g. an email address)
        #[arg(short, long)]
        subject: String,

        /// Token lifetime in minutes
        #[arg(
            short,
            long,
            env = "YOURTIME_ACCESS_TOKEN_DURATION",
            default_value = "15",
            allow_negative_numbers = true
        )]
        duration: i64,
    },

    /// Verify a token and print its payload as JSON
    Verify {
        /// Token to verify
        token: String,
    },

    /// Run an API with bearer-protected routes
    Serve {
        /// Address to listen on
        #[arg(long, env = "YOURTIME_SERVER_ADDRESS", default_value = "127.0.0.1:8080")]
        address: SocketAddr,
    },
}

/// Setup logging with the specified log level
fn setup_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Convert a lifetime in minutes, rejecting values chrono cannot represent
fn token_lifetime(minutes: i64) -> Result<chrono::Duration> {
    chrono::Duration::try_minutes(minutes)
        .with_context(|| format!("token duration of {} minutes is out of range", minutes))
}

/// Returns the payload of the authenticated caller
async fn me(Extension(payload): Extension<Payload>) -> Json<Payload> {
    Json(payload)
}

async fn health() -> &'static str {
    "ok"
}

/// Build the API router; everything under `/api` requires a bearer token
fn build_router(maker: Arc<dyn TokenMaker>) -> Router {
    let state = Arc::new(TokenAuthState::new(maker));

    Router::new()
        .route("/api/me", get(me))
        .layer(middleware::from_fn_with_state(state, require_auth))
        .route("/health", get(health))
}

async fn serve(maker: Arc<dyn TokenMaker>, address: SocketAddr) -> Result<()> {
    let backend = maker.backend();
    let app = build_router(maker);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("API listening on {} (token backend: {})", address, backend);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, shutting down...");
            }
        })
        .await
        .context("API server failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let maker = cli.token.build_maker()?;

    match cli.command {
        Commands::Issue { subject, duration } => {
            let token = maker
                .create_token(&subject, token_lifetime(duration)?)
                .context("Failed to create token")?;
            info!(
                "Issued {} token for {} ({} minutes)",
                maker.backend(),
                subject,
                duration
            );
            println!("{}", token);
        }
        Commands::Verify { token } => match maker.verify_token(&token) {
            Ok(payload) => {
                info!(
                    "Token {} valid for another {} seconds",
                    payload.id,
                    payload.remaining().num_seconds()
                );
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            Err(e) => {
                error!("Token rejected: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Serve { address } => serve(maker, address).await?,
    }

    Ok(())
}
