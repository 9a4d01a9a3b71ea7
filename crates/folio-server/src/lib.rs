//! Development server with live reload for folio sites.
//!
//! Serves the rendered page, watches the content document and stylesheets,
//! and pushes updates to connected browsers over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
