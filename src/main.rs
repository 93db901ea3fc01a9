use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use voice_scribe::{
    create_router, AppState, Config, NatsRecognizer, SessionConfig, SessionRegistry, SpeakerNames,
};

#[derive(Debug, Parser)]
#[command(name = "voice-scribe", about = "Live multi-speaker transcript service")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/voice-scribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);
    info!(
        "Audio: {}Hz {}ch, segments up to {}s",
        cfg.audio.sample_rate, cfg.audio.channels, cfg.audio.max_segment_secs
    );

    let names = Arc::new(SpeakerNames::load(&cfg.transcript.speaker_names)?);

    let nats = async_nats::connect(&cfg.nats.url)
        .await
        .with_context(|| format!("Failed to connect to NATS at {}", cfg.nats.url))?;
    info!("Connected to NATS at {}", cfg.nats.url);

    let recognizer = Arc::new(NatsRecognizer::new(nats.clone(), cfg.audio.sample_rate));
    let template = SessionConfig::for_key("", &cfg);
    let registry = Arc::new(SessionRegistry::new(template, names, recognizer));

    let state = AppState {
        registry,
        nats,
    };
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
