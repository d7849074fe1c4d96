//! WebSocket control channel at `/api/ws`.
//!
//! The browser sends `{"type", "data"}` envelopes for low-latency input
//! (pointer moves, clicks, keys). Queries are answered with an envelope of
//! the same type; failures with an `"error"` envelope. The session lasts
//! until the socket closes.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;

use mediator_core::protocol::{ClientMessage, Envelope, MousePos, ScreenSize};
use mediator_core::{InputDevice, MediatorError};

use crate::api::AppState;

/// Upgrade handler.
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, state))
}

/// Drive a single WebSocket connection to completion.
async fn run_session(mut socket: WebSocket, state: AppState) {
    tracing::info!("websocket session started");

    while let Some(result) = socket.recv().await {
        let text = match result {
            Ok(Message::Text(text)) => text.as_str().to_owned(),
            Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(Message::Close(_)) => break,
            // Ping/pong frames are handled by axum.
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(error = %e, "websocket recv error");
                break;
            }
        };

        let reply = match ClientMessage::parse(&text) {
            Ok(msg) => handle(&*state.input, msg),
            Err(e) => Err(e),
        };

        let reply = match reply {
            Ok(Some(env)) => env,
            Ok(None) => continue,
            Err(e) => {
                tracing::debug!(error = %e, "websocket message failed");
                Envelope::error(&e)
            }
        };

        let json = match serde_json::to_string(&reply) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode websocket reply");
                continue;
            }
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }

    tracing::info!("websocket session ended");
}

/// Apply one message to the input device. Returns a reply for queries.
pub fn handle(input: &dyn InputDevice, msg: ClientMessage) -> Result<Option<Envelope>, MediatorError> {
    let kind = msg.kind();
    match msg {
        ClientMessage::MouseMove(pos) => input.move_mouse(pos.x, pos.y)?,
        ClientMessage::MouseClick(click) => input.click(click.button, click.double_click)?,
        ClientMessage::Scroll(s) => input.scroll(s.x, s.y)?,
        ClientMessage::KeyboardType(t) => input.type_text(&t.text)?,
        ClientMessage::KeyboardKey(k) => input.key_tap(k.key, &k.modifiers)?,
        ClientMessage::MousePos => {
            let (x, y) = input.mouse_pos()?;
            return Envelope::new(kind, &MousePos { x, y }).map(Some);
        }
        ClientMessage::ScreenSize => {
            let (width, height) = input.screen_size()?;
            return Envelope::new(kind, &ScreenSize { width, height }).map(Some);
        }
    }
    Ok(None)
}

// ── Tests ────────────────────────────────────────────────────────
