//! Presentation boundary: a small axum server that runs headless matches
//! and streams the recorded frames over a WebSocket. Strictly a consumer of
//! engine snapshots; nothing here can mutate simulation state.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use aeroduel_shared::{MatchConfig, MatchResult, WorldSnapshot, DEFAULT_MAX_TICKS};
use aeroduel_sim::agents;
use aeroduel_sim::run_match;

// ---------------------------------------------------------------------------
// Serde types for WebSocket messages
// ---------------------------------------------------------------------------

/// Configuration message sent by the client when connecting to /api/match.
#[derive(Debug, Deserialize)]
struct MatchRequest {
    jet: String,
    prop: Option<String>,
    max_ticks: Option<u64>,
}

/// A single frame streamed to the client.
#[derive(Debug, Serialize)]
struct FrameMessage<'a> {
    #[serde(rename = "type")]
    msg_type: &'static str,
    frame: &'a WorldSnapshot,
}

/// Final result message sent after all frames.
#[derive(Debug, Serialize)]
struct ResultMessage<'a> {
    #[serde(rename = "type")]
    msg_type: &'static str,
    result: &'a MatchResult,
}

/// Error message sent to the client.
#[derive(Debug, Serialize)]
struct ErrorMessage {
    #[serde(rename = "type")]
    msg_type: &'static str,
    error: String,
}

// ---------------------------------------------------------------------------
// HTTP / WebSocket handlers
// ---------------------------------------------------------------------------

/// GET /api/agents -- the scripted agent names the GUI may offer.
async fn get_agents() -> Json<Vec<&'static str>> {
    Json(agents::AGENT_NAMES.to_vec())
}

/// GET /api/match -- WebSocket upgrade endpoint.
async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

/// Handle an individual WebSocket connection.
async fn handle_socket(mut socket: WebSocket) {
    // 1. Wait for the client's config message.
    let config_msg = match socket.recv().await {
        Some(Ok(Message::Text(text))) => text,
        Some(Ok(Message::Close(_))) | None => return,
        Some(Ok(_)) => {
            let _ = send_error(&mut socket, "expected a JSON text message").await;
            return;
        }
        Some(Err(_)) => return,
    };

    let req: MatchRequest = match serde_json::from_str(&config_msg) {
        Ok(r) => r,
        Err(e) => {
            let _ = send_error(&mut socket, &format!("invalid config JSON: {e}")).await;
            return;
        }
    };

    // 2. Validate agent names before running (to report errors over WS).
    if agents::resolve(&req.jet).is_none() {
        let _ = send_error(&mut socket, &format!("unknown jet agent: {}", req.jet)).await;
        return;
    }
    if let Some(name) = &req.prop {
        if agents::resolve(name).is_none() {
            let _ = send_error(&mut socket, &format!("unknown prop agent: {name}")).await;
            return;
        }
    }

    let config = MatchConfig {
        jet_agent: req.jet,
        prop_agent: req.prop,
        max_ticks: req.max_ticks.unwrap_or(DEFAULT_MAX_TICKS),
        ..Default::default()
    };

    // 3. Run the match on a blocking thread; the sim loop is synchronous.
    let replay = tokio::task::spawn_blocking(move || {
        let mut jet = agents::resolve(&config.jet_agent).expect("agent already validated");
        let mut prop = config
            .prop_agent
            .as_deref()
            .map(|name| agents::resolve(name).expect("agent already validated"));
        run_match(&config, jet.as_mut(), prop.as_deref_mut())
    })
    .await
    .expect("match task panicked");

    // 4. Stream each frame.
    for frame in &replay.frames {
        let msg = FrameMessage {
            msg_type: "frame",
            frame,
        };
        let json = match serde_json::to_string(&msg) {
            Ok(j) => j,
            Err(_) => continue,
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            return; // client disconnected
        }
    }

    // 5. Send the result message.
    let result_msg = ResultMessage {
        msg_type: "result",
        result: &replay.result,
    };
    if let Ok(json) = serde_json::to_string(&result_msg) {
        let _ = socket.send(Message::Text(json.into())).await;
    }
}

/// Send a JSON error message over the WebSocket.
async fn send_error(socket: &mut WebSocket, error: &str) -> Result<(), axum::Error> {
    let msg = ErrorMessage {
        msg_type: "error",
        error: error.to_string(),
    };
    let json = serde_json::to_string(&msg).unwrap_or_default();
    socket.send(Message::Text(json.into())).await
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Build the axum `Router`.
pub fn app() -> Router {
    Router::new()
        .route("/api/agents", get(get_agents))
        .route("/api/match", get(ws_handler))
        .layer(CorsLayer::permissive())
}

/// Start the server on the given port.
pub async fn run_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = app();
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!(port, "aeroduel server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
