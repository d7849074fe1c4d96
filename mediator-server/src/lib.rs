//! # mediator-server: remote desktop over HTTP
//!
//! Serves a browser client that watches the desktop as an MJPEG stream and
//! drives it with mouse and keyboard events.
//!
//! ## Modules
//!
//! | Module    | Purpose                                               |
//! |-----------|-------------------------------------------------------|
//! | `config`  | TOML configuration with defaults                      |
//! | `service` | Wires the capture engine, router and listener         |
//! | `api`     | REST routes and error mapping                         |
//! | `stream`  | `multipart/x-mixed-replace` screencast body           |
//! | `ws`      | WebSocket control channel                             |
//! | `capture` | `xcap` display capture backend                        |
//! | `input`   | Platform mouse / keyboard injection                   |

pub mod api;
pub mod capture;
pub mod config;
pub mod input;
pub mod service;
pub mod stream;
pub mod ws;

#[cfg(test)]
mod testing;
