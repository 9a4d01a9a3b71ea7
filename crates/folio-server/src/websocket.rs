//! WebSocket live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to connected browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload
    Reload,

    /// Replace the rendered page body
    UpdateContent {
        /// New HTML of the page layout
        html: String,
    },

    /// Re-fetch stylesheets without reloading
    UpdateStyles,

    /// The last refresh failed; the page keeps its previous content
    RenderFailed {
        /// Reason shown in the browser console
        message: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting messages to all connected clients.
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
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    /// Subscribe to messages.
    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side live reload script connecting to `ws_path` on the serving host.
pub fn hmr_client_script(ws_path: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
  const ws = new WebSocket(scheme + location.host + '{}');
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  function rerunRuntime() {{
    const old = document.querySelector('script[src$="assets/main.js"]');
    if (!old) return;
    const fresh = document.createElement('script');
    fresh.src = old.src.split('?')[0] + '?t=' + Date.now();
    old.replaceWith(fresh);
  }}

  ws.onopen = function() {{
    console.log('[folio] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);
    console.log('[folio]', msg.type);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'update_content': {{
        const layout = document.querySelector('.layout');
        if (layout) {{
          layout.outerHTML = msg.html;
          rerunRuntime();
        }} else {{
          location.reload();
        }}
        break;
      }}

      case 'update_styles':
        document.querySelectorAll('link[rel="stylesheet"]').forEach(function(link) {{
          link.href = link.href.split('?')[0] + '?t=' + Date.now();
        }});
        break;

      case 'render_failed':
        console.error('[folio] Render failed:', msg.message);
        break;

      case 'connected':
        console.log('[folio] Server acknowledged connection');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[folio] Disconnected');
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        console.log('[folio] Reconnecting...');
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};

  ws.onerror = function(e) {{
    console.error('[folio] WebSocket error:', e);
  }};
}})();
"#,
        ws_path
    )
}
