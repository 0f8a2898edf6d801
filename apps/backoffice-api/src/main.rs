//! Back-office API server - brokerage document pipeline backend
//!
//! Provides REST endpoints for:
//! - Template and document CRUD
//! - Document rendering (preview and final)
//! - Signature composition and signature records
//! - Lead scoring and the reporting dashboard

use anyhow::Result;
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;
mod leads;
mod models;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("backoffice_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Initialize application state
    info!("Initializing back-office API...");
    let state = AppState::new().await?;
    let state = Arc::new(state);

    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Templates
        .route(
            "/api/templates",
            post(handlers::create_template).get(handlers::list_templates),
        )
        .route("/api/templates/:id", get(handlers::get_template))
        // Documents
        .route("/api/documents", post(handlers::create_document))
        .route("/api/documents/:id", get(handlers::get_document))
        .route(
            "/api/documents/:id/status",
            patch(handlers::update_document_status),
        )
        .route("/api/documents/:id/render", post(handlers::render_document))
        .route("/api/documents/:id/sign", post(handlers::sign_document))
        // Signature records
        .route("/api/signatures", post(handlers::record_signature))
        // Leads and dashboard
        .route("/api/leads/score", post(handlers::score_lead_handler))
        .route("/api/dashboard/stats", get(handlers::dashboard_stats))
        .route("/api/activity", get(handlers::list_activity))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Parse bind address
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3002);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting back-office API on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
