//! The bounded-retry HTTP fetch policy.
//!
//! Three attempts, exponential backoff starting at 500ms, and retries only
//! on transport-level failures — a non-200 response or a non-HTML
//! content-type is a final outcome, not something to retry.

use reqwest::Client;
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Outcome of fetching one URL.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Every attempt failed at the transport level (DNS, connect, timeout).
    TransportFailure,
    /// The server responded but with a status other than 200 or a
    /// non-HTML content-type. Not retried.
    NonHtml { status: u16, content_type: Option<String> },
    /// Body exceeded the configured cap; read stopped at `cap + 1` bytes.
    Oversized { status: u16, content_type: Option<String> },
    Ok {
        status: u16,
        content_type: Option<String>,
        body: String,
    },
}

/// Fetches `url`, retrying transport failures up to [`MAX_ATTEMPTS`] times
/// with doubling backoff from [`INITIAL_BACKOFF`].
pub async fn fetch(client: &Client, url: &str, request_timeout: Duration, max_content_size_bytes: usize) -> FetchOutcome {
    let mut attempt = 0;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        match fetch_once(client, url, request_timeout, max_content_size_bytes).await {
            Some(outcome) => return outcome,
            None => {
                attempt += 1;
                if attempt >= MAX_ATTEMPTS {
                    return FetchOutcome::TransportFailure;
                }
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }
    }
}

/// One fetch attempt. Returns `None` on transport failure (retryable),
/// `Some(outcome)` on any response the server actually sent back.
async fn fetch_once(client: &Client, url: &str, request_timeout: Duration, max_content_size_bytes: usize) -> Option<FetchOutcome> {
    let response = client.get(url).timeout(request_timeout).send().await.ok()?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let is_html = content_type
        .as_deref()
        .map(|ct| ct.to_lowercase().contains("text/html"))
        .unwrap_or(true);

    if status != 200 || !is_html {
        return Some(FetchOutcome::NonHtml { status, content_type });
    }

    let body = match read_capped(response, max_content_size_bytes).await {
        Ok(body) => body,
        Err(ReadError::CapExceeded) => return Some(FetchOutcome::Oversized { status, content_type }),
        Err(ReadError::Transport) => return None,
    };

    Some(FetchOutcome::Ok {
        status,
        content_type,
        body,
    })
}

enum ReadError {
    /// The body exceeded `cap` bytes; a final outcome, not retried.
    CapExceeded,
    /// The connection broke mid-body (read error or timeout after headers
    /// arrived); retryable, same as a failure to connect at all.
    Transport,
}

/// Streams at most `cap + 1` bytes off the wire; oversize is flagged only
/// when the read strictly exceeds `cap`, matching the 1-byte-over probe in
/// the source implementation rather than bailing the instant the cap is
/// reached. Stops pulling chunks as soon as the cap is crossed, so an
/// oversized body never gets buffered in full. A transport error partway
/// through the body is reported separately from an oversized body so the
/// caller can retry it instead of treating it as a final outcome.
async fn read_capped(mut response: reqwest::Response, cap: usize) -> Result<String, ReadError> {
    let mut buf = Vec::with_capacity(cap.min(1 << 16) + 1);
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                buf.extend_from_slice(&chunk);
                if buf.len() > cap {
                    return Err(ReadError::CapExceeded);
                }
            }
            Ok(None) => break,
            Err(_) => return Err(ReadError::Transport),
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
