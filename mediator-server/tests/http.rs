//! End-to-end tests of the HTTP surface through the public service API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use futures::StreamExt;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use mediator_core::{FrameBuffer, FrameHub, InputDevice, Key, MediatorError, Modifier, MouseButton};
use mediator_server::config::ServerConfig;
use mediator_server::service::MediatorService;

// ── Test device ──────────────────────────────────────────────────

#[derive(Default)]
struct Pointer {
    pos: Mutex<(i32, i32)>,
    clicks: Mutex<Vec<(MouseButton, bool)>>,
}

impl InputDevice for Pointer {
    fn screen_size(&self) -> Result<(u32, u32), MediatorError> {
        Ok((800, 600))
    }
    fn mouse_pos(&self) -> Result<(i32, i32), MediatorError> {
        Ok(*self.pos.lock().unwrap())
    }
    fn move_mouse(&self, x: i32, y: i32) -> Result<(), MediatorError> {
        *self.pos.lock().unwrap() = (x, y);
        Ok(())
    }
    fn click(&self, button: MouseButton, double: bool) -> Result<(), MediatorError> {
        self.clicks.lock().unwrap().push((button, double));
        Ok(())
    }
    fn scroll(&self, _dx: i32, _dy: i32) -> Result<(), MediatorError> {
        Ok(())
    }
    fn type_text(&self, _text: &str) -> Result<(), MediatorError> {
        Ok(())
    }
    fn key_tap(&self, _key: Key, _modifiers: &[Modifier]) -> Result<(), MediatorError> {
        Err(MediatorError::Unsupported("keyboard"))
    }
}

fn service_with(base: &std::path::Path) -> MediatorService {
    let mut config = ServerConfig::default();
    config.files.base_path = base.to_path_buf();
    MediatorService::new(config)
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ── Tests ────────────────────────────────────────────────────────

#[tokio::test]
async fn move_then_read_pointer() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service_with(dir.path());
    let device = Arc::new(Pointer::default());
    let app = svc.router(Arc::new(FrameHub::default()), device.clone());

    let resp = app
        .clone()
        .oneshot(request(Method::PUT, "/api/remote/mouse-pos", json!({"x": 40, "y": 30})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({}));

    let resp = app
        .oneshot(request(Method::GET, "/api/remote/mouse-pos", Value::Null))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await, json!({"x": 40, "y": 30}));
}

#[tokio::test]
async fn click_defaults_to_single_left() {
    let dir = tempfile::tempdir().unwrap();
    let device = Arc::new(Pointer::default());
    let app = service_with(dir.path()).router(Arc::new(FrameHub::default()), device.clone());

    let resp = app
        .oneshot(request(Method::POST, "/api/remote/mouse-click", json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(*device.clicks.lock().unwrap(), vec![(MouseButton::Left, false)]);
}

#[tokio::test]
async fn device_failure_maps_to_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = service_with(dir.path())
        .router(Arc::new(FrameHub::default()), Arc::new(Pointer::default()));

    let resp = app
        .oneshot(request(
            Method::POST,
            "/api/remote/keyboard-key",
            json!({"key": "enter", "modifiers": ["control"]}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("keyboard"));
}

#[tokio::test]
async fn directory_listing_is_sandboxed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/readme.txt"), b"hi").unwrap();
    let app = service_with(dir.path())
        .router(Arc::new(FrameHub::default()), Arc::new(Pointer::default()));

    let resp = app
        .clone()
        .oneshot(request(Method::GET, "/api/dir/docs", Value::Null))
        .await
        .unwrap();
    assert_eq!(
        json_body(resp).await,
        json!({"entries": [{"name": "readme.txt", "type": "f"}]})
    );

    let resp = app
        .oneshot(request(Method::GET, "/api/dir/docs/../..", Value::Null))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn two_viewers_receive_the_same_frame() {
    let dir = tempfile::tempdir().unwrap();
    let hub = Arc::new(FrameHub::default());
    let app = service_with(dir.path()).router(Arc::clone(&hub), Arc::new(Pointer::default()));

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(request(Method::GET, "/api/remote/screencast", Value::Null))
            .await
            .unwrap();
        bodies.push(resp.into_body().into_data_stream());
    }

    // Poll each body once so both register with the hub.
    for body in &mut bodies {
        let mut next = tokio_test::task::spawn(body.next());
        assert!(next.poll().is_pending());
    }
    assert_eq!(hub.pending(), 2);

    let mut buf = FrameBuffer::new();
    buf.write_bytes(b"shared-jpeg");
    let (_, delivered) = hub.publish(buf);
    assert_eq!(delivered, 2);

    for body in &mut bodies {
        let head = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(std::str::from_utf8(&head).unwrap().contains("Content-Length: 11"));
        let jpeg = body.next().await.unwrap().unwrap();
        assert_eq!(&jpeg[..], b"shared-jpeg");
    }
}

#[tokio::test]
async fn bundled_web_client_is_served_at_root() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ServerConfig::default();
    config.files.base_path = dir.path().to_path_buf();
    // The default web root is relative to the workspace root.
    config.files.web_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(ServerConfig::default().files.web_root);
    let app = MediatorService::new(config)
        .router(Arc::new(FrameHub::default()), Arc::new(Pointer::default()));

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(std::str::from_utf8(&html).unwrap().contains("/api/remote/screencast"));

    for script in ["/api.js", "/ws.js", "/remote.js"] {
        let resp = app
            .clone()
            .oneshot(Request::builder().uri(script).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{script}");
    }
}
