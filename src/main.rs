use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use voice_bridge::{create_router, AppState, Config};

#[derive(Debug, Parser)]
#[command(name = "voice-bridge", about = "Telephony to speech-engine duplex relay")]
struct Args {
    /// Path to the configuration file (extension optional)
    #[arg(long, default_value = "config/voice-bridge")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Engine: {} ({})", cfg.engine.url, cfg.engine.model);
    info!("Codec: {}", cfg.audio.codec);

    if cfg.engine.api_key.is_empty() {
        warn!("Engine API key is empty; set VOICE_BRIDGE__ENGINE__API_KEY");
    }

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let state = AppState::new(Arc::new(cfg));
    let router = create_router(state);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;

    Ok(())
}
