//! Document Q&A server binary
//!
//! Run with: cargo run -p docqa --bin docqa-server

use docqa::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RagConfig::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("docqa={},tower_http=info", config.server.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chat model: {}", config.llm.model);
    tracing::info!("  - Vision model: {}", config.vision.model);
    tracing::info!("  - Embedding model: {} ({} dims)", config.embeddings.model, config.embeddings.dimensions);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Max upload: {} bytes", config.upload.max_file_size);

    let server = RagServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}/api/v1", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/v1/upload              - Upload a document");
    println!("  POST   /api/v1/query               - Ask a question");
    println!("  POST   /api/v1/tts                 - Text to speech");
    println!("  GET    /api/v1/status/:session_id  - Session status");
    println!("  DELETE /api/v1/session/:session_id - Delete a session");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
