//! IBD RNA-Seq Web Server
//!
//! Run with: cargo run -p ibdseq-web --bin ibdseq-web

use tracing::info;

use ibdseq_web::config::Config;
use ibdseq_web::router::build_router;
use ibdseq_web::setup::{dataset_source, init_tracing, load_catalog};
use ibdseq_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("Starting IBD RNA-Seq server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    let source = dataset_source(&config, &catalog);
    info!("Loading dataset from {}", source.describe());

    let state = AppState::from_source(catalog, source.as_ref(), config.scoring.clone())?;
    info!(
        "Dataset ready: {} models, {} target candidates",
        state.dataset.models.len(),
        state.dataset.target_evidence.len()
    );

    let app = build_router(state, &config.data.static_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
