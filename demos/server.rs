//! REST API server example for the FXQL parser.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - `POST /parse` - Parse, validate and store an FXQL submission
//! - `GET /health` - Liveness check
//!
//! ## Configuration
//!
//! - `--addr` / `FXQL_ADDR`: listen address (default `127.0.0.1:3000`)
//! - `RUST_LOG`: log filter, e.g. `info,tower_http=debug`
//!
//! ## Example Usage
//!
//! ```bash
//! # Accepted submission
//! curl -X POST http://localhost:3000/parse \
//!   -H "Content-Type: application/json" \
//!   -d '{"FXQL": "USD-GBP {\n BUY 100\n SELL 200\n CAP 93800\n}"}'
//!
//! # Rejected submission (lowercase pair)
//! curl -X POST http://localhost:3000/parse \
//!   -H "Content-Type: application/json" \
//!   -d '{"FXQL": "usd-gbp { BUY 100 SELL 200 CAP 93800 }"}'
//! ```

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use fxql_parser::{FxqlRequest, FxqlResponse, FxqlService};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// === Configuration ===

/// FXQL API server.
#[derive(Parser, Debug)]
#[command(name = "fxql-server")]
struct Config {
    /// Address to listen on
    #[arg(long, env = "FXQL_ADDR", default_value = "127.0.0.1:3000")]
    addr: String,
}

// === Application State ===

/// Shared application state containing the FXQL service.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FxqlService>,
}

// === Handlers ===

/// Wrapper turning an [`FxqlResponse`] into an HTTP response with its status.
pub struct ApiResponse(FxqlResponse);

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

/// POST /parse - Parse an FXQL submission.
async fn parse_statements(
    State(state): State<AppState>,
    Json(request): Json<FxqlRequest>,
) -> ApiResponse {
    ApiResponse(FxqlResponse::from(state.service.process(&request.fxql)))
}

/// GET /health - Liveness check.
async fn health() -> StatusCode {
    StatusCode::OK
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/parse", post(parse_statements))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::parse();
    let state = AppState {
        service: Arc::new(FxqlService::new()),
    };

    let app = create_router(state);

    let listener = match TcpListener::bind(&config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {}: {e}", config.addr);
            std::process::exit(1);
        }
    };
    info!("FXQL API server running on http://{}", config.addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        std::process::exit(1);
    }
}
