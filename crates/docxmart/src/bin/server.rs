//! docXmart server binary
//!
//! Run with: cargo run -p docxmart --bin docxmart-server

use docxmart::{config::AppConfig, server::DocxmartServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docxmart=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         docXmart                          ║
║        Multilingual Document Tasks, Chunk by Chunk        ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = AppConfig::load(None)?;
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Backend: {:?} at {}", config.llm.backend, config.llm.base_url);
    tracing::info!("  - Model: {}", config.llm.model);
    tracing::info!("  - Max chunk size: {} chars", config.chunking.max_chunk_chars);
    tracing::info!("  - Pacing: {}ms", config.assembly.pacing_ms);

    let server = DocxmartServer::new(config)?;

    match server.state().generator().health_check().await {
        Ok(true) => tracing::info!("Text generator is reachable"),
        _ => tracing::warn!(
            "Text generator not reachable; submissions will report per-chunk errors until it is"
        ),
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/sessions                   - Create a session");
    println!("  POST /api/sessions/:id/document      - Upload a document");
    println!("  POST /api/sessions/:id/submit        - Run a task");
    println!("  POST /api/sessions/:id/submit/stream - Run a task (SSE)");
    println!("  GET  /api/tasks                      - Task menu");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
