//! Deployment adapter: calling-convention shims between a host runtime
//! and the neutral router. Status, headers, and body pass through
//! verbatim; only the invocation shape changes.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, Uri};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tracing::info;

use crate::error::CafeError;

/// The request shape a serverless host hands to one function invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEvent {
    pub method: String,
    /// Path plus optional query string, e.g. `/api/posts?tag=coffee`.
    pub path: String,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default)]
    pub body: Option<String>,
    /// Set when `body` carries base64-encoded binary.
    #[serde(default)]
    pub is_base64: bool,
}

/// The response shape handed back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostReply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub is_base64: bool,
}

/// Single entry point for invocation-per-request hosts: translate one
/// event into the router and the response back out.
pub async fn invoke(router: Router, event: HostEvent) -> Result<HostReply, CafeError> {
    let method = Method::from_bytes(event.method.as_bytes())
        .map_err(|e| CafeError::Adapter(format!("invalid method: {e}")))?;
    let uri: Uri = event
        .path
        .parse()
        .map_err(|e| CafeError::Adapter(format!("invalid path: {e}")))?;

    let body = match event.body {
        None => Body::empty(),
        Some(text) if event.is_base64 => Body::from(
            BASE64
                .decode(text.as_bytes())
                .map_err(|e| CafeError::Adapter(format!("invalid base64 body: {e}")))?,
        ),
        Some(text) => Body::from(text),
    };

    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in &event.headers {
        builder = builder.header(name, value);
    }
    let request = builder
        .body(body)
        .map_err(|e| CafeError::Adapter(format!("invalid request: {e}")))?;

    let response = router
        .oneshot(request)
        .await
        .map_err(|e| CafeError::Adapter(format!("router failed: {e}")))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| CafeError::Adapter(format!("failed to read response body: {e}")))?;

    let (body, is_base64) = match String::from_utf8(bytes.to_vec()) {
        Ok(text) => (text, false),
        Err(raw) => (BASE64.encode(raw.as_bytes()), true),
    };

    Ok(HostReply {
        status,
        headers,
        body,
        is_base64,
    })
}

/// Long-lived TCP host path: bind, serve, drain on ctrl-c.
pub async fn serve(router: Router, addr: &str) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
