//! Top-level service wiring.
//!
//! Starts the capture engine, builds the HTTP router around it and serves
//! until the shutdown future resolves. The capture loop itself has no stop
//! signal; it ends with the runtime.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use mediator_core::{CaptureEngine, FrameHub, InputDevice, JpegFrameEncoder};

use crate::api::{self, AppState};
use crate::capture::XcapScreen;
use crate::config::ServerConfig;
use crate::input::DesktopInput;

// ── MediatorService ──────────────────────────────────────────────

/// The mediator HTTP service.
pub struct MediatorService {
    config: ServerConfig,
}

impl MediatorService {
    /// Create a new service with the given config.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router on top of an existing hub and input device.
    pub fn router(&self, hub: Arc<FrameHub>, input: Arc<dyn InputDevice>) -> axum::Router {
        let state = AppState::new(hub, input, self.config.files.base_path.clone());
        api::router(state, self.config.files.web_root.clone())
    }

    /// Run until `shutdown` resolves.
    ///
    /// 1. Spawns the capture loop on the primary display.
    /// 2. Binds the configured address.
    /// 3. Serves the API and static files.
    pub async fn run<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (hub, capture_handle) = CaptureEngine::start(
            XcapScreen::new(),
            JpegFrameEncoder::new(),
            self.config.to_engine_config(),
        );
        let app = self.router(hub, Arc::new(DesktopInput::new()));

        let listener = TcpListener::bind(self.config.network.bind_addr).await?;
        info!("listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        capture_handle.abort();
        info!("mediator service stopped");
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
