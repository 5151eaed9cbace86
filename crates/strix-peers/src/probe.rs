//! Status probe client.
//!
//! A verification or maintenance probe is a short-timeout GET against a
//! peer's well-known status path. HTTP 200 with a parseable document
//! containing a hostname is success; every other outcome is failure,
//! reported as `None` and never as an error.

use std::time::Duration;

use tracing::debug;

use strix_core::StatusDoc;

use crate::BoxFuture;

/// Fetches peer status documents. The seam the directory probes
/// through, so tests can substitute canned responses.
pub trait StatusClient: Send + Sync {
    /// Fetch and parse the status document at `address`. Any failure
    /// (connect, timeout, non-200, bad JSON, missing hostname) is
    /// `None`.
    fn fetch_status<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Option<StatusDoc>>;
}

/// HTTP/1 status client used in production.
pub struct HttpStatusClient {
    port: u16,
    path: String,
    timeout: Duration,
}

impl HttpStatusClient {
    pub fn new(port: u16, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            port,
            path: path.into(),
            timeout,
        }
    }
}

impl StatusClient for HttpStatusClient {
    fn fetch_status<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Option<StatusDoc>> {
        Box::pin(async move {
            let authority = format!("{address}:{}", self.port);
            fetch_status_doc(&authority, &self.path, self.timeout).await
        })
    }
}

/// Perform one status fetch against `authority` (`host:port`).
pub async fn fetch_status_doc(
    authority: &str,
    path: &str,
    timeout: Duration,
) -> Option<StatusDoc> {
    let uri = format!("http://{authority}{path}");

    let result = tokio::time::timeout(timeout, async {
        let stream = match tokio::net::TcpStream::connect(authority).await {
            Ok(s) => s,
            Err(e) => {
                debug!(error = %e, %uri, "status probe connection failed");
                return None;
            }
        };

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = match hyper::client::conn::http1::handshake(io).await {
            Ok(pair) => pair,
            Err(e) => {
                debug!(error = %e, %uri, "status probe handshake failed");
                return None;
            }
        };

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let req = http::Request::builder()
            .method("GET")
            .uri(&uri)
            .header("host", authority)
            .header("user-agent", "strix-peers/0.1")
            .body(http_body_util::Empty::<bytes::Bytes>::new())
            .ok()?;

        let resp = match sender.send_request(req).await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(error = %e, %uri, "status probe request failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            debug!(status = %resp.status(), %uri, "status probe non-2xx");
            return None;
        }

        use http_body_util::BodyExt;
        let body = match resp.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                debug!(error = %e, %uri, "status probe body read failed");
                return None;
            }
        };

        match serde_json::from_slice::<StatusDoc>(&body) {
            Ok(doc) if !doc.hostname.is_empty() => Some(doc),
            Ok(_) => {
                debug!(%uri, "status document missing hostname");
                None
            }
            Err(e) => {
                debug!(error = %e, %uri, "status document unparseable");
                None
            }
        }
    })
    .await;

    match result {
        Ok(doc) => doc,
        Err(_) => {
            debug!(%uri, "status probe timed out");
            None
        }
    }
}
