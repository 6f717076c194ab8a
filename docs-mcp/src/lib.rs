//! Google Docs MCP Server
//!
//! This crate provides MCP tools for:
//! - Listing, searching and managing Google Docs in Drive
//! - Reading documents as text, markdown or raw JSON, per tab
//! - Searching document text and editing it by index
//! - Formatting, lists, tables, images, headers and footers
//!
//! Text search and replacement go through [`docs_index`], which maps the
//! document's flattened text back to API indices.
//!
//! Can be used as:
//! - An embedded server (via `start_server`)
//! - A standalone binary (`docs-mcp`)

pub mod google_api;
mod markdown;
pub mod requests;
pub mod tools;
pub mod validation;
mod well_known;

pub use google_api::{FetchedDocument, GoogleDocsClient};
pub use tools::GoogleDocsServer;

use bridge_config::Settings;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_service::Service;
use tracing::info;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, Infallible>;

const WELL_KNOWN_PATH: &str = "/.well-known/oauth-authorization-server";

/// Handle the .well-known/oauth-authorization-server endpoint
fn handle_well_known() -> Result<Response<BoxBody>, Infallible> {
    let metadata = well_known::google_oauth_metadata();
    let json = serde_json::to_string(&metadata).unwrap_or_default();

    let mut response = Response::new(Full::new(Bytes::from(json)).boxed());
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        http::HeaderValue::from_static("*"),
    );
    Ok(response)
}

/// Handle to a running server that can be used to stop it
pub struct ServerHandle {
    shutdown_tx: oneshot::Sender<()>,
    addr: SocketAddr,
}

impl ServerHandle {
    /// Get the port the server is running on
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Get the URL for the MCP endpoint
    pub fn url(&self) -> String {
        format!("http://{}/mcp", self.addr)
    }

    /// Stop the server
    pub fn stop(self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Start the MCP server on a random local port with default settings
pub async fn start_server() -> anyhow::Result<ServerHandle> {
    start_server_on("127.0.0.1", 0, Settings::default()).await
}

/// Start the MCP server on the specified host and port
///
/// Use port 0 to get a random available port.
pub async fn start_server_on(host: &str, port: u16, settings: Settings) -> anyhow::Result<ServerHandle> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    info!("Starting Google Docs MCP server on {}", local_addr);

    let settings = Arc::new(settings);

    let config = StreamableHttpServerConfig::default();
    let session_manager = Arc::new(LocalSessionManager::default());

    let mcp_service = StreamableHttpService::new(
        move || Ok(GoogleDocsServer::new(settings.clone())),
        session_manager,
        config,
    );

    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    // Spawn the server task
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutting down Google Docs MCP server");
                    break;
                }
                result = listener.accept() => {
                    match result {
                        Ok((stream, _)) => {
                            let io = TokioIo::new(stream);
                            let service = mcp_service.clone();

                            tokio::spawn(async move {
                                if let Err(err) = http1::Builder::new()
                                    .serve_connection(
                                        io,
                                        hyper::service::service_fn(move |req: Request<hyper::body::Incoming>| {
                                            let mut svc = service.clone();
                                            async move {
                                                if req.uri().path() == WELL_KNOWN_PATH {
                                                    return handle_well_known();
                                                }
                                                svc.call(req).await
                                            }
                                        }),
                                    )
                                    .await
                                {
                                    tracing::error!("Error serving connection: {:?}", err);
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }
    });

    Ok(ServerHandle {
        shutdown_tx,
        addr: local_addr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_response() {
        let response = handle_well_known().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_server_binds_and_stops() {
        let handle = start_server().await.unwrap();
        assert_ne!(handle.port(), 0);
        assert_eq!(handle.url(), format!("http://127.0.0.1:{}/mcp", handle.port()));
        handle.stop();
    }
}
