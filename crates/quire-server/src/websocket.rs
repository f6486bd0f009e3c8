//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to connected browsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload
    Reload,

    /// Connection established
    Connected,
}

/// Hub for broadcasting reload messages to all connected clients.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    /// Create a new hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: HmrMessage) {
        // Nobody listening is fine
        let _ = self.sender.send(msg);
    }

    /// Subscribe to messages.
    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Number of connected clients.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// WebSocket URL of the reload endpoint for a server bound to `host:port`.
pub fn hmr_url(host: &str, port: u16) -> String {
    format!("ws://{}:{}/__hmr", host, port)
}

/// Generate the client-side reload script.
pub fn hmr_client_script(ws_url: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  let attempts = 0;
  const maxAttempts = 10;

  function connect() {{
    const ws = new WebSocket('{}');

    ws.onopen = function() {{
      if (attempts > 0) {{
        location.reload();
        return;
      }}
      console.log('[quire] Live reload connected');
    }};

    ws.onmessage = function(event) {{
      const msg = JSON.parse(event.data);

      switch (msg.type) {{
        case 'reload':
          location.reload();
          break;

        case 'connected':
          attempts = 0;
          break;
      }}
    }};

    ws.onclose = function() {{
      if (attempts < maxAttempts) {{
        attempts++;
        setTimeout(connect, 1000 * attempts);
      }}
    }};
  }}

  connect();
}})();
"#,
        ws_url
    )
}
