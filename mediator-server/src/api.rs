//! HTTP routes for the browser client.
//!
//! | Route                        | Methods   |
//! |------------------------------|-----------|
//! | `/api/remote/screen-size`    | GET       |
//! | `/api/remote/mouse-pos`      | GET, PUT  |
//! | `/api/remote/mouse-click`    | POST      |
//! | `/api/remote/scroll`         | POST      |
//! | `/api/remote/keyboard-type`  | POST      |
//! | `/api/remote/keyboard-key`   | POST      |
//! | `/api/remote/screencast`     | GET       |
//! | `/api/dir/{*path}`           | GET       |
//! | `/api/ws`                    | GET (upgrade) |
//! | `/api/health`                | GET       |
//!
//! Any failure, including an unsupported method, answers 400 with
//! `{"error": "..."}`. Anything outside `/api` is served from the web root.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use mediator_core::protocol::{
    Empty, ErrorBody, Health, KeyboardKey, KeyboardType, ListDir, MouseClick, MousePos, Scroll,
    ScreenSize,
};
use mediator_core::{FrameHub, InputDevice, MediatorError};

use crate::stream;
use crate::ws;

// ── AppState ─────────────────────────────────────────────────────

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<FrameHub>,
    pub input: Arc<dyn InputDevice>,
    /// Root for directory listings.
    pub base_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(hub: Arc<FrameHub>, input: Arc<dyn InputDevice>, base_path: PathBuf) -> Self {
        Self {
            hub,
            input,
            base_path: Arc::new(base_path),
        }
    }
}

// ── ApiError ─────────────────────────────────────────────────────

/// Handler error rendered as `400 {"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub MediatorError);

impl<E: Into<MediatorError>> From<E> for ApiError {
    fn from(e: E) -> Self {
        ApiError(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self.0, "request failed");
        (StatusCode::BAD_REQUEST, Json(ErrorBody::from(&self.0))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Decode a JSON body regardless of its declared content type.
fn parse<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

async fn invalid_method(method: Method) -> ApiError {
    ApiError(MediatorError::Other(format!("Invalid method: {method}")))
}

/// Attach the "Invalid method" fallback to a method router.
fn methods(router: MethodRouter<AppState>) -> MethodRouter<AppState> {
    router.fallback(invalid_method)
}

// ── Router ───────────────────────────────────────────────────────

/// Build the full application router.
pub fn router(state: AppState, web_root: impl Into<PathBuf>) -> Router {
    Router::new()
        .route("/api/remote/screen-size", methods(get(screen_size)))
        .route(
            "/api/remote/mouse-pos",
            methods(get(mouse_pos).put(move_mouse)),
        )
        .route("/api/remote/mouse-click", methods(post(mouse_click)))
        .route("/api/remote/scroll", methods(post(scroll)))
        .route("/api/remote/keyboard-type", methods(post(keyboard_type)))
        .route("/api/remote/keyboard-key", methods(post(keyboard_key)))
        .route("/api/remote/screencast", methods(get(screencast)))
        .route("/api/dir/", methods(get(list_root)))
        .route("/api/dir/{*path}", methods(get(list_dir)))
        .route("/api/ws", methods(get(ws::upgrade)))
        .route("/api/health", methods(get(health)))
        .fallback_service(ServeDir::new(web_root.into()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────

async fn screen_size(State(state): State<AppState>) -> ApiResult<ScreenSize> {
    let (width, height) = state.input.screen_size()?;
    Ok(Json(ScreenSize { width, height }))
}

async fn mouse_pos(State(state): State<AppState>) -> ApiResult<MousePos> {
    let (x, y) = state.input.mouse_pos()?;
    Ok(Json(MousePos { x, y }))
}

async fn move_mouse(State(state): State<AppState>, body: Bytes) -> ApiResult<Empty> {
    let pos: MousePos = parse(&body)?;
    state.input.move_mouse(pos.x, pos.y)?;
    Ok(Json(Empty {}))
}

async fn mouse_click(State(state): State<AppState>, body: Bytes) -> ApiResult<Empty> {
    let click: MouseClick = parse(&body)?;
    state.input.click(click.button, click.double_click)?;
    Ok(Json(Empty {}))
}

async fn scroll(State(state): State<AppState>, body: Bytes) -> ApiResult<Empty> {
    let scroll: Scroll = parse(&body)?;
    state.input.scroll(scroll.x, scroll.y)?;
    Ok(Json(Empty {}))
}

async fn keyboard_type(State(state): State<AppState>, body: Bytes) -> ApiResult<Empty> {
    let text: KeyboardType = parse(&body)?;
    state.input.type_text(&text.text)?;
    Ok(Json(Empty {}))
}

async fn keyboard_key(State(state): State<AppState>, body: Bytes) -> ApiResult<Empty> {
    let key: KeyboardKey = parse(&body)?;
    tracing::info!(key = %key.key, modifiers = ?key.modifiers, "key tap");
    state.input.key_tap(key.key, &key.modifiers)?;
    Ok(Json(Empty {}))
}

async fn screencast(State(state): State<AppState>) -> Response {
    tracing::info!("screencast client connected");
    (
        [(header::CONTENT_TYPE, stream::CONTENT_TYPE)],
        Body::from_stream(stream::multipart(Arc::clone(&state.hub))),
    )
        .into_response()
}

async fn list_root(State(state): State<AppState>) -> ApiResult<ListDir> {
    Ok(Json(mediator_core::fs::list_dir(&state.base_path, "").await?))
}

async fn list_dir(State(state): State<AppState>, Path(path): Path<String>) -> ApiResult<ListDir> {
    Ok(Json(mediator_core::fs::list_dir(&state.base_path, &path).await?))
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".into(),
        frames: state.hub.published(),
        subscribers: state.hub.pending(),
    })
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::testing::RecordingInput;

    fn app(input: Arc<RecordingInput>, base: PathBuf) -> Router {
        let state = AppState::new(Arc::new(FrameHub::new(4)), input, base);
        router(state, "./web")
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn screen_size_returns_dimensions() {
        let input = Arc::new(RecordingInput::default());
        let resp = app(input, ".".into())
            .oneshot(request("GET", "/api/remote/screen-size", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"width": 1920, "height": 1080})
        );
    }

    #[tokio::test]
    async fn put_mouse_pos_moves_pointer() {
        let input = Arc::new(RecordingInput::default());
        let resp = app(Arc::clone(&input), ".".into())
            .oneshot(request("PUT", "/api/remote/mouse-pos", r#"{"x":10,"y":20}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({}));
        assert_eq!(input.calls(), vec!["move 10,20"]);
    }

    #[tokio::test]
    async fn click_and_key_are_forwarded() {
        let input = Arc::new(RecordingInput::default());
        let app = app(Arc::clone(&input), ".".into());

        let resp = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/remote/mouse-click",
                r#"{"button":"right","doubleClick":true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(request(
                "POST",
                "/api/remote/keyboard-key",
                r#"{"key":"a","modifiers":["ctrl"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(input.calls(), vec!["click right double", "key a [Control]"]);
    }

    #[tokio::test]
    async fn wrong_method_is_400_with_message() {
        let input = Arc::new(RecordingInput::default());
        let resp = app(input, ".".into())
            .oneshot(request("DELETE", "/api/remote/scroll", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"error": "Invalid method: DELETE"})
        );
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let input = Arc::new(RecordingInput::default());
        let resp = app(Arc::clone(&input), ".".into())
            .oneshot(request("POST", "/api/remote/keyboard-type", "not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
        assert!(input.calls().is_empty());
    }

    #[tokio::test]
    async fn device_error_is_reported() {
        let input = Arc::new(RecordingInput::failing());
        let resp = app(input, ".".into())
            .oneshot(request("POST", "/api/remote/scroll", r#"{"x":0,"y":3}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"error": "unsupported: test device"})
        );
    }

    #[tokio::test]
    async fn lists_directories() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("music/albums")).unwrap();
        std::fs::write(tmp.path().join("music/song.mp3"), b"").unwrap();

        let input = Arc::new(RecordingInput::default());
        let app = app(input, tmp.path().to_path_buf());

        let resp = app
            .clone()
            .oneshot(request("GET", "/api/dir/music", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"entries": [
                {"name": "albums", "type": "d"},
                {"name": "song.mp3", "type": "f"},
            ]})
        );

        let resp = app
            .oneshot(request("GET", "/api/dir/", ""))
            .await
            .unwrap();
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"entries": [{"name": "music", "type": "d"}]})
        );
    }

    #[tokio::test]
    async fn directory_escape_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let input = Arc::new(RecordingInput::default());
        let resp = app(input, tmp.path().to_path_buf())
            .oneshot(request("GET", "/api/dir/a/../../etc", ""))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_hub_state() {
        let input = Arc::new(RecordingInput::default());
        let resp = app(input, ".".into())
            .oneshot(request("GET", "/api/health", ""))
            .await
            .unwrap();
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({"status": "ok", "frames": 0, "subscribers": 0})
        );
    }
}
