use std::net::SocketAddr;
use std::path::PathBuf;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod error;
mod handlers;
mod pdf;

use crate::handlers::submit_handler;

/// Largest accepted export body; a full-size PNG data URL fits well below it.
const BODY_LIMIT: usize = 10 * 1024 * 1024;
const DEFAULT_PORT: u16 = 3000;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding index.html, the wasm bundle and the body diagram.
    #[arg(long)]
    public_dir: Option<PathBuf>,
    /// Listen port; falls back to $PORT, then 3000.
    #[arg(long)]
    port: Option<u16>,
}

fn app(public_dir: PathBuf) -> Router {
    Router::new()
        .route("/submit", post(submit_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("paindraw_server=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));
    if !public_dir.join("index.html").is_file() {
        tracing::warn!(dir = %public_dir.display(), "index.html not found in public dir");
    }

    let port = args
        .port
        .or_else(|| {
            std::env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
        })
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("pain drawing server running at http://localhost:{port}");
    axum::serve(listener, app(public_dir)).await
}
