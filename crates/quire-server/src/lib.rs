//! Development server with live reload for quire sites.
//!
//! Pages are rendered from source on every request, so edits show up on the
//! next load. A file watcher tells connected browsers to reload.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{router, DevServer, DevServerConfig, ServerError, ServerState, SharedState};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{hmr_client_script, hmr_url, HmrHub, HmrMessage};
