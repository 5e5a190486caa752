//! HTTP Server for AreaCheck
//!
//! This module provides the HTTP server in front of the [`RequestHandler`],
//! using hyper for HTTP/1.1 server functionality.
//!
//! # Architecture
//!
//! The HTTP server:
//! - Listens on a TCP socket for incoming HTTP connections
//! - Spawns a tokio task for each connection
//! - Lowers each hyper request into a [`DispatchRequest`] plus body bytes,
//!   reading at most `Content-Length` bytes and only for check requests
//! - Forwards it to the handler and writes the envelope back with status 200
//!
//! The handler is synchronous and only contends on the history lock, so it
//! runs directly on the connection task.
//!
//! # Example
//!
//! ```no_run
//! use areacheck_server::config::ServerConfig;
//! use areacheck_server::http_server::HttpServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = HttpServer::new(ServerConfig::default());
//!     server.run().await.unwrap();
//! }
//! ```

use areacheck_common::protocol::error::{AreaCheckError, Result};
use areacheck_common::transport::{HttpTransport, HyperRequest, HyperResponse};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::header::{HeaderName, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::HeaderMap;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::handler::{parse_content_length, DispatchRequest, RequestHandler, Route};
use crate::history::HistoryLedger;

/// Upper bound on the buffer reserved up front from a declared length.
const MAX_PREALLOCATED_BODY: usize = 64 * 1024;

/// HTTP server for AreaCheck.
pub struct HttpServer {
    /// Handler shared by every connection
    handler: Arc<RequestHandler>,
    /// Address used by [`run`](Self::run)
    bind: SocketAddr,
}

impl HttpServer {
    /// Creates a server with a fresh, empty history.
    pub fn new(config: ServerConfig) -> Self {
        let ledger = Arc::new(HistoryLedger::with_capacity(config.history_capacity));
        let handler = Arc::new(RequestHandler::new(ledger, config.timestamps));
        Self {
            handler,
            bind: config.bind,
        }
    }

    pub fn handler(&self) -> &Arc<RequestHandler> {
        &self.handler
    }

    /// Binds the configured address and serves until the process exits.
    pub async fn run(self) -> Result<()> {
        let listener = Self::bind(self.bind).await?;
        self.serve(listener).await
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let listener = Self::bind(self.bind).await?;
        self.serve_until(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.serve_until(listener, std::future::pending()).await
    }

    /// Serves connections until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve_until(self, listener: TcpListener, shutdown: impl Future<Output = ()>) -> Result<()> {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("HTTP server shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            tracing::trace!("Accepted connection from {}", peer);
                            self.spawn_connection(stream);
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }
    }

    async fn bind(addr: SocketAddr) -> Result<TcpListener> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AreaCheckError::Transport(format!("Failed to bind to {}: {}", addr, e)))?;

        tracing::info!(
            "HTTP server listening on {}",
            listener
                .local_addr()
                .map_err(|e| AreaCheckError::Transport(format!("Failed to get local address: {}", e)))?
        );

        Ok(listener)
    }

    fn spawn_connection(&self, stream: tokio::net::TcpStream) {
        let io = TokioIo::new(stream);
        let handler = self.handler.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let handler = handler.clone();
                async move { Self::handle_request(handler, req).await }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::error!("Error serving connection: {}", err);
            }
        });
    }

    /// Handles an HTTP request.
    ///
    /// Always produces a `200 OK` reply; failures live in the envelope.
    async fn handle_request(handler: Arc<RequestHandler>, req: HyperRequest) -> Result<HyperResponse> {
        let dispatch = Self::dispatch_request(req.method().as_str(), req.uri(), req.headers());

        // Only checks carry a body; other routes answer without touching it.
        let body = match Route::resolve(dispatch.route()) {
            Route::Check => read_body(req.into_body(), dispatch.content_length).await,
            Route::Clear | Route::Unknown(_) => Vec::new(),
        };

        let envelope = handler.handle(&dispatch, &body[..]);
        tracing::debug!(
            "Handled request: route={} method={} len={}",
            dispatch.route(),
            dispatch.method,
            dispatch.content_length
        );

        Ok(HttpTransport::to_http_response(&envelope))
    }

    /// Lowers HTTP request metadata into the handler's view.
    ///
    /// There is no script mount point, so the route comes from the URI path.
    fn dispatch_request(method: &str, uri: &hyper::Uri, headers: &HeaderMap) -> DispatchRequest {
        DispatchRequest {
            method: method.to_string(),
            content_type: header_str(headers, CONTENT_TYPE).unwrap_or_default().to_string(),
            script_name: String::new(),
            path_info: uri.path().to_string(),
            request_uri: uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_default(),
            content_length: parse_content_length(header_str(headers, CONTENT_LENGTH)),
        }
    }
}

/// Reads body frames until `limit` bytes have arrived or the body ends.
///
/// Anything past `limit` is left unread. A failed frame keeps what was read
/// before it.
async fn read_body(mut body: Incoming, limit: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(limit.min(MAX_PREALLOCATED_BODY));

    while buf.len() < limit {
        match body.frame().await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    let wanted = (limit - buf.len()).min(data.len());
                    buf.extend_from_slice(&data[..wanted]);
                }
            }
            Some(Err(e)) => {
                tracing::warn!("Failed to read request body after {} bytes: {}", buf.len(), e);
                break;
            }
            None => break,
        }
    }

    buf
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
