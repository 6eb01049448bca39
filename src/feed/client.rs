// Remote quote feed client.
// One GET of a static JSON array; no auth, no pagination.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, header::ACCEPT};
use tracing::debug;

use crate::config::Config;
use crate::error::{FlipQuotesError, Result};
use crate::quotes::Quote;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("flipquotes/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce a fresh list of quotes.
pub trait QuoteSource: Send + Sync {
    fn fetch_quotes(&self) -> impl Future<Output = Result<Vec<Quote>>> + Send;
}

/// HTTP client for the static quote feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    /// Create a client for `url` with the default connect and read timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeouts(url, CONNECT_TIMEOUT, READ_TIMEOUT)
    }

    pub fn with_timeouts(
        url: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FlipQuotesError::Network)?;

        Ok(Self::with_client(client, url))
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeouts(
            config.feed_url.clone(),
            config.connect_timeout,
            config.read_timeout,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl QuoteSource for FeedClient {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlipQuotesError::HttpStatus(status));
        }

        let body = response.text().await?;
        let quotes = parse_feed(&body)?;

        debug!(url = %self.url, count = quotes.len(), "Fetched quote feed");
        Ok(quotes)
    }
}

/// Decode a feed payload. Blank bodies and empty arrays are rejected.
pub fn parse_feed(body: &str) -> Result<Vec<Quote>> {
    if body.trim().is_empty() {
        return Err(FlipQuotesError::EmptyFeed);
    }

    let quotes: Vec<Quote> = serde_json::from_str(body)?;
    if quotes.is_empty() {
        return Err(FlipQuotesError::EmptyFeed);
    }

    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and return the URL to request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/quotes.json", addr)
    }

    fn local_client(url: String) -> FeedClient {
        let client = Client::builder().no_proxy().build().unwrap();
        FeedClient::with_client(client, url)
    }

    #[test]
    fn test_parse_feed() {
        let quotes = parse_feed(r#"[{"quote":"A","author":"X","theme":"life"}]"#).unwrap();
        assert_eq!(quotes, vec![Quote::new("A", "X", "life")]);
    }

    #[test]
    fn test_parse_feed_rejects_empty() {
        assert!(matches!(parse_feed(""), Err(FlipQuotesError::EmptyFeed)));
        assert!(matches!(parse_feed("  \n"), Err(FlipQuotesError::EmptyFeed)));
        assert!(matches!(parse_feed("[]"), Err(FlipQuotesError::EmptyFeed)));
    }

    #[test]
    fn test_parse_feed_rejects_malformed() {
        let err = parse_feed(r#"{"quote":"A"}"#).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let url = serve_once(
            "200 OK",
            r#"[{"quote":"A","author":"X","theme":"life","flippedQuote":"not A"}]"#,
        )
        .await;

        let quotes = local_client(url).fetch_quotes().await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].flipped_quote.as_deref(), Some("not A"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let url = serve_once("503 Service Unavailable", "[]").await;

        let err = local_client(url).fetch_quotes().await.unwrap_err();
        assert!(matches!(
            err,
            FlipQuotesError::HttpStatus(status) if status.as_u16() == 503
        ));
        assert_eq!(err.kind(), FailureKind::Network);
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let url = serve_once("200 OK", "<html>not json</html>").await;

        let err = local_client(url).fetch_quotes().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = local_client(format!("http://{}/", addr))
            .fetch_quotes()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Network);
    }
}
