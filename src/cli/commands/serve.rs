//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for processing videos and querying the corpus.

use crate::cli::Output;
use crate::error::BriefError;
use crate::orchestrator::{Orchestrator, ProcessOutcome};
use crate::config::Settings;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(settings)?;

    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/process", post(process))
        .route("/query", post(query))
        .route("/files", get(list_files))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Brawlbrief API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Process", "POST /process");
    Output::kv("Query", "POST /query");
    Output::kv("List Files", "GET  /files");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ProcessRequest {
    /// YouTube URL or bare video ID
    url: String,
}

#[derive(Deserialize)]
struct QueryRequest {
    question: String,
}

#[derive(Serialize)]
struct QueryResponse {
    answer: String,
}

#[derive(Serialize)]
struct FilesResponse {
    files: Vec<FileInfo>,
    total: usize,
}

#[derive(Serialize)]
struct FileInfo {
    name: String,
    display_name: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(e: BriefError) -> axum::response::Response {
    let status = match e {
        BriefError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn process(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessRequest>,
) -> impl IntoResponse {
    match state.orchestrator.process(&req.url).await {
        Ok(outcome) => Json::<ProcessOutcome>(outcome).into_response(),
        Err(e) => error_response(e),
    }
}

async fn query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> impl IntoResponse {
    match state.orchestrator.query(&req.question).await {
        Ok(answer) => Json(QueryResponse { answer }).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list_files(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.orchestrator.list_files().await {
        Ok(files) => Json(FilesResponse {
            total: files.len(),
            files: files
                .into_iter()
                .map(|f| FileInfo {
                    name: f.name,
                    display_name: f.display_name,
                })
                .collect(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
