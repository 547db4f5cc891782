use anyhow::Context;
use clap::{Parser, Subcommand};
use kovi_ussd::{config, routes, store, UssdRequest};
use std::net::SocketAddr;
use tracing::info;

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kovi-ussd", about = "KoviApp USSD self-screening server", version)]
struct Cli {
    /// Path to TOML config file
    #[arg(short, long, default_value = "kovi.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP callback server
    Serve,
    /// Push one request through the dialog and print the reply and session
    Dial {
        /// Gateway session id
        #[arg(long)]
        session: String,
        /// Caller phone number
        #[arg(long, default_value = "")]
        phone: String,
        /// Accumulated selection path, e.g. "1*1*2"
        #[arg(long, default_value = "")]
        text: String,
    },
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging from RUST_LOG (default: info)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kovi_ussd=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;

    match cli.command {
        Commands::Serve => serve(cfg).await,
        Commands::Dial {
            session,
            phone,
            text,
        } => dial(cfg, session, phone, text).await,
    }
}

// ── Serve ──────────────────────────────────────────────────────────────────

async fn serve(cfg: config::AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .context("invalid bind address")?;

    let state = kovi_ussd::build_state(cfg)
        .await
        .context("failed to open session store")?;
    let app = routes::app(state);

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped.");
    Ok(())
}

// ── Dial ───────────────────────────────────────────────────────────────────

async fn dial(
    cfg: config::AppConfig,
    session: String,
    phone: String,
    text: String,
) -> anyhow::Result<()> {
    let session_store = store::create_store(&cfg.store).await?;
    let engine = kovi_ussd::build_engine(&cfg, session_store);

    let request = UssdRequest {
        session_id: session,
        phone_number: phone,
        text,
        ..UssdRequest::default()
    };
    let reply = engine
        .respond(&request)
        .await
        .context("dialog step failed")?;
    println!("{reply}");

    let record = engine
        .session(&request.session_id)
        .await
        .context("failed to read session")?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

// ── Graceful shutdown ──────────────────────────────────────────────────────

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C handler");
    info!("Shutdown signal received, stopping server...");
}
