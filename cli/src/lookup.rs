//! # Balance Lookup
//!
//! Second stage of an audit: ask a block explorer what has happened to the
//! derived address. The lookup runs after derivation has finished and only
//! ever sees the address string. Whatever goes wrong here (timeout, HTTP
//! error, garbage body, Ctrl-C) is reported as a [`LookupError`] and leaves
//! the derivation result untouched.
//!
//! The explorer is reached through the [`BalanceLookup`] trait.
//! [`BlockCypherClient`] is the production implementation; tests substitute
//! their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use brainaudit_core::Network;

/// Upper bound on a single explorer request.
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 3_000;

/// BlockCypher address endpoint, Bitcoin mainnet.
pub const MAINNET_EXPLORER_URL: &str = "https://api.blockcypher.com/v1/btc/main/addrs";

/// BlockCypher address endpoint, Bitcoin testnet3.
pub const TESTNET_EXPLORER_URL: &str = "https://api.blockcypher.com/v1/btc/test3/addrs";

/// Longest error body kept in [`LookupError::Status`].
const MAX_ERROR_BODY_LEN: usize = 256;

pub fn default_explorer_url(network: Network) -> &'static str {
    match network {
        Network::Mainnet => MAINNET_EXPLORER_URL,
        Network::Testnet => TESTNET_EXPLORER_URL,
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the explorer knows about an address. Amounts are in satoshis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub address: String,
    pub total_received: u64,
    pub total_sent: u64,
    pub tx_count: u64,
    pub final_balance: u64,
}

/// Failures of the lookup stage. None of them say anything about whether the
/// derivation was correct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("balance lookup timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("explorer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed explorer response: {0}")]
    MalformedResponse(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("balance lookup cancelled")]
    Cancelled,
}

/// A source of address balance summaries.
#[async_trait]
pub trait BalanceLookup: Send + Sync {
    async fn fetch_balance_summary(&self, address: &str) -> Result<BalanceSummary, LookupError>;
}

// ---------------------------------------------------------------------------
// BlockCypher
// ---------------------------------------------------------------------------

/// The subset of BlockCypher's address endpoint we read. Everything else in
/// the body is ignored.
#[derive(Debug, Deserialize)]
struct AddressResponse {
    #[serde(default)]
    address: Option<String>,
    total_received: u64,
    total_sent: u64,
    n_tx: u64,
    final_balance: u64,
}

/// Parse a BlockCypher `/addrs/{address}` body.
///
/// `requested` fills in the address if the body omits it.
pub fn parse_balance_summary(requested: &str, body: &str) -> Result<BalanceSummary, LookupError> {
    let response: AddressResponse =
        serde_json::from_str(body).map_err(|e| LookupError::MalformedResponse(e.to_string()))?;

    Ok(BalanceSummary {
        address: response.address.unwrap_or_else(|| requested.to_string()),
        total_received: response.total_received,
        total_sent: response.total_sent,
        tx_count: response.n_tx,
        final_balance: response.final_balance,
    })
}

/// HTTP client for the BlockCypher address API.
#[derive(Debug, Clone)]
pub struct BlockCypherClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl BlockCypherClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("brainaudit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn address_url(&self, address: &str) -> String {
        format!("{}/{}", self.base_url, address)
    }

    fn classify(&self, err: reqwest::Error) -> LookupError {
        if err.is_timeout() {
            LookupError::Timeout {
                timeout_ms: duration_ms(self.timeout),
            }
        } else {
            LookupError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl BalanceLookup for BlockCypherClient {
    async fn fetch_balance_summary(&self, address: &str) -> Result<BalanceSummary, LookupError> {
        let url = self.address_url(address);
        debug!(url = %url, "querying explorer");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "explorer returned an error status");
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_LEN),
            });
        }

        let summary = parse_balance_summary(address, &body)?;
        debug!(
            address = %summary.address,
            tx_count = summary.tx_count,
            final_balance = summary.final_balance,
            "explorer lookup complete"
        );
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Deadlines & Cancellation
// ---------------------------------------------------------------------------

/// Run a lookup under an overall deadline, whatever the implementation's own
/// timeout handling.
pub async fn fetch_with_deadline(
    lookup: &dyn BalanceLookup,
    address: &str,
    timeout: Duration,
) -> Result<BalanceSummary, LookupError> {
    match tokio::time::timeout(timeout, lookup.fetch_balance_summary(address)).await {
        Ok(result) => result,
        Err(_) => Err(LookupError::Timeout {
            timeout_ms: duration_ms(timeout),
        }),
    }
}

/// [`fetch_with_deadline`], abandoned with [`LookupError::Cancelled`] as
/// soon as `cancel` completes.
pub async fn fetch_cancellable<F>(
    lookup: &dyn BalanceLookup,
    address: &str,
    timeout: Duration,
    cancel: F,
) -> Result<BalanceSummary, LookupError>
where
    F: Future<Output = ()>,
{
    tokio::select! {
        result = fetch_with_deadline(lookup, address, timeout) => result,
        _ = cancel => {
            debug!("balance lookup cancelled");
            Err(LookupError::Cancelled)
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    const ADDRESS: &str = "1JwSSubhmg6iPtRjtyqhUYYH7bZg3Lfy1T";

    const BLOCKCYPHER_BODY: &str = r#"{
        "address": "1JwSSubhmg6iPtRjtyqhUYYH7bZg3Lfy1T",
        "total_received": 2517000,
        "total_sent": 2517000,
        "balance": 0,
        "unconfirmed_balance": 0,
        "final_balance": 0,
        "n_tx": 42,
        "unconfirmed_n_tx": 0,
        "final_n_tx": 42,
        "txrefs": [{"tx_hash": "ab", "value": 1000}]
    }"#;

    fn http_response(status_line: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serve one canned response on a local port. Returns the base URL and
    /// the request line the client sent.
    async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let request = String::from_utf8_lossy(&request);
            let _ = tx.send(request.lines().next().unwrap_or_default().to_string());

            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (format!("http://{addr}/v1/btc/main/addrs"), rx)
    }

    /// Accept a connection and never answer.
    async fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        format!("http://{addr}/v1/btc/main/addrs")
    }

    struct FixedLookup(BalanceSummary);

    #[async_trait]
    impl BalanceLookup for FixedLookup {
        async fn fetch_balance_summary(&self, _: &str) -> Result<BalanceSummary, LookupError> {
            Ok(self.0.clone())
        }
    }

    struct HangingLookup;

    #[async_trait]
    impl BalanceLookup for HangingLookup {
        async fn fetch_balance_summary(&self, _: &str) -> Result<BalanceSummary, LookupError> {
            std::future::pending().await
        }
    }

    fn sample_summary() -> BalanceSummary {
        BalanceSummary {
            address: ADDRESS.to_string(),
            total_received: 1,
            total_sent: 0,
            tx_count: 1,
            final_balance: 1,
        }
    }

    #[test]
    fn test_default_explorer_urls() {
        assert_eq!(default_explorer_url(Network::Mainnet), MAINNET_EXPLORER_URL);
        assert!(default_explorer_url(Network::Testnet).ends_with("/btc/test3/addrs"));
    }

    #[test]
    fn test_parse_blockcypher_body() {
        let summary = parse_balance_summary(ADDRESS, BLOCKCYPHER_BODY).unwrap();
        assert_eq!(
            summary,
            BalanceSummary {
                address: ADDRESS.to_string(),
                total_received: 2_517_000,
                total_sent: 2_517_000,
                tx_count: 42,
                final_balance: 0,
            }
        );
    }

    #[test]
    fn test_parse_fills_missing_address() {
        let body = r#"{"total_received":0,"total_sent":0,"n_tx":0,"final_balance":0}"#;
        let summary = parse_balance_summary(ADDRESS, body).unwrap();
        assert_eq!(summary.address, ADDRESS);
        assert_eq!(summary.tx_count, 0);
    }

    #[test]
    fn test_parse_rejects_bad_bodies() {
        for body in ["<html>rate limited</html>", "{}", r#"{"n_tx": -1}"#, ""] {
            assert!(
                matches!(
                    parse_balance_summary(ADDRESS, body),
                    Err(LookupError::MalformedResponse(_))
                ),
                "{body}"
            );
        }
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let client =
            BlockCypherClient::new("https://example.test/addrs/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.address_url("1abc"), "https://example.test/addrs/1abc");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let (url, request_line) =
            serve_once(http_response("200 OK", "application/json", BLOCKCYPHER_BODY)).await;
        let client = BlockCypherClient::new(url, Duration::from_secs(5)).unwrap();

        let summary = client.fetch_balance_summary(ADDRESS).await.unwrap();
        assert_eq!(summary.tx_count, 42);
        assert_eq!(summary.final_balance, 0);

        let request_line = request_line.await.unwrap();
        assert_eq!(
            request_line,
            format!("GET /v1/btc/main/addrs/{ADDRESS} HTTP/1.1")
        );
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_status_error() {
        let body = r#"{"error": "Address not found"}"#;
        let (url, _) = serve_once(http_response("404 Not Found", "application/json", body)).await;
        let client = BlockCypherClient::new(url, Duration::from_secs(5)).unwrap();

        match client.fetch_balance_summary(ADDRESS).await {
            Err(LookupError::Status { status, body }) => {
                assert_eq!(status, 404);
                assert!(body.contains("Address not found"));
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_json_is_malformed() {
        let (url, _) = serve_once(http_response("200 OK", "text/html", "<html>hi</html>")).await;
        let client = BlockCypherClient::new(url, Duration::from_secs(5)).unwrap();

        assert!(matches!(
            client.fetch_balance_summary(ADDRESS).await,
            Err(LookupError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_silent_server_times_out() {
        let url = serve_silence().await;
        let client = BlockCypherClient::new(url, Duration::from_millis(200)).unwrap();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.fetch_balance_summary(ADDRESS),
        )
        .await
        .expect("client timeout must fire before the test deadline");

        assert_eq!(result, Err(LookupError::Timeout { timeout_ms: 200 }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            BlockCypherClient::new(format!("http://{addr}/addrs"), Duration::from_secs(2)).unwrap();
        assert!(matches!(
            client.fetch_balance_summary(ADDRESS).await,
            Err(LookupError::Network(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_bounds_hanging_lookup() {
        let result = fetch_with_deadline(&HangingLookup, ADDRESS, Duration::from_millis(3_000)).await;
        assert_eq!(result, Err(LookupError::Timeout { timeout_ms: 3_000 }));
    }

    #[tokio::test]
    async fn test_deadline_passes_through_results() {
        let lookup = FixedLookup(sample_summary());
        let result = fetch_with_deadline(&lookup, ADDRESS, Duration::from_secs(1)).await;
        assert_eq!(result, Ok(sample_summary()));
    }

    #[tokio::test]
    async fn test_cancel_aborts_lookup() {
        let result = fetch_cancellable(
            &HangingLookup,
            ADDRESS,
            Duration::from_secs(60),
            std::future::ready(()),
        )
        .await;
        assert_eq!(result, Err(LookupError::Cancelled));
    }

    #[tokio::test]
    async fn test_pending_cancel_does_not_interfere() {
        let lookup = FixedLookup(sample_summary());
        let result = fetch_cancellable(
            &lookup,
            ADDRESS,
            Duration::from_secs(1),
            std::future::pending(),
        )
        .await;
        assert_eq!(result, Ok(sample_summary()));
    }
}
