mod handlers;
mod state;
mod static_files;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::graph::GraphClient;

pub fn build_router(client: GraphClient) -> Router {
    let state = Arc::new(AppState { client });

    Router::new()
        .route("/", get(handlers::index))
        .route("/style.css", get(handlers::style))
        .route("/app.js", get(handlers::script))
        .route("/api/graph", post(handlers::graph_proxy))
        .route("/api/branches", get(handlers::list_branches))
        .route("/api/search", get(handlers::search))
        .route("/api/countries", get(handlers::countries))
        .route("/api/countries/{code}/branches", get(handlers::country_branches))
        .route("/api/nearest", get(handlers::nearest))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, client: GraphClient) {
    let app = build_router(client);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Cannot bind to {}: {}", addr, e);
            std::process::exit(1);
        });

    eprintln!("  Branch Beacon server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        });
}
