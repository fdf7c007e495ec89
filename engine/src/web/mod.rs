//! Web adapter
//!
//! A small axum server in front of one shared agent. Every request locks the
//! agent for the whole of its `process` call, so commands are handled one at a
//! time exactly as in the terminal.

use anyhow::{Context, Result};
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::HelpdeskAgent;
use sdk::errors::EngineError;

mod page;

/// Agent shared between request handlers
pub type SharedAgent = Arc<Mutex<HelpdeskAgent>>;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub tickets: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketsResponse {
    pub tickets: String,
}

/// Build the application router
pub fn router(agent: SharedAgent) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/clear", post(clear))
        .route("/api/tickets", get(tickets))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(agent)
}

/// Serve the web UI until the process is stopped
pub async fn serve(agent: HelpdeskAgent, host: &str, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| EngineError::Network(format!("Failed to bind {}:{}: {}", host, port, e)))?;
    let addr = listener.local_addr()?;

    info!("Web helpdesk listening on http://{}", addr);
    println!("IT Helpdesk web UI running on http://{}", addr);

    axum::serve(listener, router(Arc::new(Mutex::new(agent))))
        .await
        .context("Web server failed")?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

async fn chat(
    State(agent): State<SharedAgent>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let mut agent = agent.lock().await;
    let response = agent.process(&request.message).await;

    Json(ChatResponse {
        response,
        tickets: agent.ticket_summary(),
    })
}

async fn clear(State(agent): State<SharedAgent>) -> Json<ChatResponse> {
    let mut agent = agent.lock().await;
    agent.process("clear").await;

    Json(ChatResponse {
        response: "Conversation cleared.".to_string(),
        tickets: agent.ticket_summary(),
    })
}

async fn tickets(State(agent): State<SharedAgent>) -> Json<TicketsResponse> {
    let agent = agent.lock().await;
    Json(TicketsResponse {
        tickets: agent.ticket_summary(),
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
