// Statement Matcher - HTTP harness
// POST a statement as JSON, get the match list back.

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use statement_matcher::{
    summarize, validate_all, Match, MatchSummary, MatcherConfig, RawTransaction, SingleFileMatcher,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    matcher: Arc<SingleFileMatcher>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Serialize)]
struct MatchesResponse {
    matches: Vec<Match>,
    summary: MatchSummary,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/matches - Analyze one statement
async fn find_matches(
    State(state): State<AppState>,
    Json(records): Json<Vec<RawTransaction>>,
) -> impl IntoResponse {
    let transactions = match validate_all(records) {
        Ok(transactions) => transactions,
        Err(e) => {
            tracing::warn!("rejected statement: {:#}", e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<MatchesResponse>::err(format!("{:#}", e))),
            )
                .into_response();
        }
    };

    let matches = state.matcher.find_matches(&transactions);
    let summary = summarize(&matches);

    (StatusCode::OK, Json(ApiResponse::ok(MatchesResponse { matches, summary }))).into_response()
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut matcher = SingleFileMatcher::new();
    if let Ok(path) = std::env::var("MATCHER_CONFIG") {
        matcher = matcher.with_config(MatcherConfig::from_file(&path)?)?;
        tracing::info!(path = %path, "loaded matcher config");
    }

    let state = AppState {
        matcher: Arc::new(matcher),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/matches", post(find_matches))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let addr = std::env::var("MATCHER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("match server listening on {}", addr);

    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
