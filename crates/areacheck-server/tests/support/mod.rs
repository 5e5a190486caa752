//! In-process server utilities for AreaCheck integration tests.

use areacheck_server::{HttpServer, ServerConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A server bound to an ephemeral loopback port.
///
/// The server stops when the handle is dropped.
pub struct TestServer {
    addr: SocketAddr,
    url: String,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::with_config(ServerConfig::default()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = HttpServer::new(config);
        tokio::spawn(server.serve_until(listener, async {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            url: format!("http://{}", addr),
            _shutdown: shutdown_tx,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}

/// Check body with coordinates sent as strings.
pub fn check_body(x: &str, y: &str, r: &str) -> String {
    format!(r#"{{"x":"{}","y":"{}","r":"{}"}}"#, x, y, r)
}
