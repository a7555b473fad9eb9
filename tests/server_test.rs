// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Integration tests for the REST API server with concurrent requests.
//!
//! These tests verify that the server answers every submission with the
//! right envelope and status while many requests share one service.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use fxql_parser::{FxqlRequest, FxqlResponse, FxqlService};
use reqwest::Client;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

// === Router (duplicated from the demo server for test isolation) ===

#[derive(Clone)]
struct AppState {
    service: Arc<FxqlService>,
}

struct ApiResponse(FxqlResponse);

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

async fn parse_statements(
    State(state): State<AppState>,
    Json(request): Json<FxqlRequest>,
) -> ApiResponse {
    ApiResponse(FxqlResponse::from(state.service.process(&request.fxql)))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/parse", post(parse_statements))
        .route("/health", get(health))
        .with_state(state)
}

/// Test server that binds to an ephemeral port.
struct TestServer {
    base_url: String,
    service: Arc<FxqlService>,
}

impl TestServer {
    async fn new() -> Self {
        let service = Arc::new(FxqlService::new());
        let state = AppState {
            service: service.clone(),
        };

        let app = create_router(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready by polling with retries
        let client = Client::new();
        let health_url = format!("{}/health", base_url);
        for _ in 0..50 {
            match client.get(&health_url).send().await {
                Ok(_) => break,
                Err(_) => tokio::time::sleep(tokio::time::Duration::from_millis(50)).await,
            }
        }

        TestServer { base_url, service }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn submit(client: &Client, url: &str, fxql: &str) -> (StatusCode, Value) {
    let response = client
        .post(url)
        .json(&json!({ "FXQL": fxql }))
        .send()
        .await
        .unwrap();
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    (status, response.json().await.unwrap())
}

// === Tests ===
// These tests are ignored in CI due to connection issues on some platforms.
// Run manually with: cargo test --test server_test -- --ignored

#[tokio::test]
#[ignore = "requires running server, may fail in CI"]
async fn health_check_responds() {
    let server = TestServer::new().await;
    let response = Client::new().get(server.url("/health")).send().await.unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore = "requires running server, may fail in CI"]
async fn accepted_submission_returns_records() {
    let server = TestServer::new().await;
    let client = Client::new();

    let (status, body) = submit(
        &client,
        &server.url("/parse"),
        "USD-GBP {\\n BUY 100\\n SELL 200\\n CAP 93800\\n}",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "FXQL-200");
    assert_eq!(body["message"], "FXQL Statement Parsed Successfully.");
    assert_eq!(body["data"][0]["SourceCurrency"], "USD");
    assert_eq!(body["data"][0]["CapAmount"], 93_800);
    assert_eq!(server.service.store().len(), 1);
}

#[tokio::test]
#[ignore = "requires running server, may fail in CI"]
async fn rejected_submission_returns_diagnostics() {
    let server = TestServer::new().await;
    let client = Client::new();

    let (status, body) = submit(
        &client,
        &server.url("/parse"),
        "usd-eur { BUY 100 SELL 90 CAP 5000 }",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FXQL-400");
    assert_eq!(
        body["message"],
        json!(["Currency Pair -usd-eur is not Valid at Line 1 Character Position - 0-7"])
    );
    assert!(server.service.store().is_empty());
}

#[tokio::test]
#[ignore = "requires running server, may fail in CI"]
async fn body_without_fxql_field_is_refused() {
    let server = TestServer::new().await;
    let response = Client::new()
        .post(server.url("/parse"))
        .json(&json!({ "query": "USD-GBP { BUY 1 SELL 2 CAP 3 }" }))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(server.service.store().is_empty());
}

/// Concurrent submissions, one in four invalid.
/// Every valid statement is stored exactly once with a unique id.
#[tokio::test]
#[ignore = "requires running server, may fail in CI"]
async fn concurrent_mixed_submissions() {
    let server = TestServer::new().await;
    let client = Client::new();

    const NUM_REQUESTS: usize = 1000;
    const BATCH_SIZE: usize = 100; // Limit concurrent connections

    let start = Instant::now();
    let mut accepted = 0usize;
    let mut rejected = 0usize;
    let mut ids = HashSet::new();

    let requests: Vec<usize> = (0..NUM_REQUESTS).collect();
    for batch in requests.chunks(BATCH_SIZE) {
        let mut handles = Vec::with_capacity(batch.len());

        for &n in batch {
            let client = client.clone();
            let url = server.url("/parse");

            let handle = tokio::spawn(async move {
                let fxql = if n % 4 == 0 {
                    format!("USD-GBP {{ BUY {n} SELL 0 CAP 10 }}")
                } else {
                    format!("USD-GBP {{ BUY {} SELL 2 CAP 10 }}\nEUR-USD {{ BUY 1 SELL 2 CAP {} }}", n, n + 1)
                };
                submit(&client, &url, &fxql).await
            });

            handles.push(handle);
        }

        for result in futures::future::join_all(handles).await {
            let (status, body) = result.unwrap();
            match status {
                StatusCode::OK => {
                    accepted += 1;
                    for entry in body["data"].as_array().unwrap() {
                        ids.insert(entry["EntryId"].as_str().unwrap().to_string());
                    }
                }
                StatusCode::BAD_REQUEST => rejected += 1,
                other => panic!("unexpected status {other}"),
            }
        }
    }

    let elapsed = start.elapsed();

    println!(
        "Processed {} requests in {:?} ({:.0} req/s)",
        NUM_REQUESTS,
        elapsed,
        NUM_REQUESTS as f64 / elapsed.as_secs_f64()
    );

    assert_eq!(rejected, NUM_REQUESTS / 4);
    assert_eq!(accepted, NUM_REQUESTS - NUM_REQUESTS / 4);
    assert_eq!(ids.len(), accepted * 2);
    assert_eq!(server.service.store().len(), accepted * 2);
}
