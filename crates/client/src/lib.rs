//! # Client
//!
//! Authenticated HTTP transport for the bot API. Wraps every call outcome
//! into the classified [`TransportError`] taxonomy so the poll loop's retry
//! policy never has to inspect raw HTTP failures, and implements
//! [`UpdateSource`] for the updater.

mod wire;

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use thiserror::Error;
use tracing::{debug, trace};

use contracts::{FileInfo, Message, TransportError, Update, UpdateId, UpdateSource};

/// Production service endpoint
pub const DEFAULT_BASE_URL: &str = "https://vsp210.ru";

/// Timeout for plain (non-long-poll) API calls
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for media downloads
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Client construction errors
#[derive(Debug, Error)]
pub enum ClientSetupError {
    /// Empty token
    #[error("bot token must not be empty")]
    EmptyToken,

    /// Token not representable as a header value
    #[error("bot token cannot be sent as an http header")]
    InvalidToken(#[source] reqwest::header::InvalidHeaderValue),

    /// Underlying HTTP client failed to build
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Bot API client
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BotClient {
    http: reqwest::Client,
    /// `<base>/api/v2/bot`
    api_base: String,
    /// Media files are served from the bare base URL, not the API prefix
    download_base: String,
}

impl BotClient {
    /// Create a client against the production service
    pub fn new(token: &str) -> Result<Self, ClientSetupError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom service endpoint
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, ClientSetupError> {
        if token.is_empty() {
            return Err(ClientSetupError::EmptyToken);
        }

        let mut auth = HeaderValue::from_str(&format!("Bot {token}"))
            .map_err(ClientSetupError::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base = base_url.trim_end_matches('/');
        Ok(Self {
            http,
            api_base: format!("{base}/api/v2/bot"),
            download_base: base.to_string(),
        })
    }

    /// Long-poll for updates newer than `cursor`
    ///
    /// A request timeout and a `204 No Content` both mean "nothing new" and
    /// return an empty batch. Everything else is classified: non-2xx →
    /// [`TransportError::Api`], connectivity → [`TransportError::Network`],
    /// unparseable body → [`TransportError::Decode`].
    pub async fn get_updates(
        &self,
        cursor: UpdateId,
        timeout: Duration,
    ) -> Result<Vec<Update>, TransportError> {
        let url = format!("{}/updates/", self.api_base);
        let result = self
            .http
            .get(&url)
            .query(&[("last_message_id", cursor)])
            .timeout(timeout)
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            // Long-poll expiry is the idle outcome, not a failure
            Err(e) if e.is_timeout() => {
                trace!(cursor, "long poll expired with no updates");
                return Ok(Vec::new());
            }
            Err(e) => return Err(Self::network(e)),
        };

        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let body = Self::read_success_body(resp).await?;
        let updates = wire::decode_updates(&body)?;
        debug!(cursor, count = updates.len(), "fetched update batch");
        Ok(updates)
    }

    /// Send a text message to a chat, returning the created message record
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
    ) -> Result<Message, TransportError> {
        let url = format!("{}/send-message/", self.api_base);
        let resp = self
            .http
            .post(&url)
            .timeout(CALL_TIMEOUT)
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(Self::network)?;

        let body = Self::read_success_body(resp).await?;
        wire::decode_message(&body)
    }

    /// Resolve a file reference into a downloadable path
    pub async fn get_file(&self, file_id: &str) -> Result<FileInfo, TransportError> {
        let url = format!("{}/get-file/{}/", self.api_base, file_id);
        let resp = self
            .http
            .get(&url)
            .timeout(CALL_TIMEOUT)
            .send()
            .await
            .map_err(Self::network)?;

        let body = Self::read_success_body(resp).await?;
        wire::decode_file_info(&body)
    }

    /// Download a media file by the path returned from [`Self::get_file`]
    pub async fn download_file(&self, file_path: &str) -> Result<Bytes, TransportError> {
        let url = format!("{}{}", self.download_base, file_path);
        let resp = self
            .http
            .get(&url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(Self::network)?;

        Self::read_success_body(resp).await
    }

    fn network(e: reqwest::Error) -> TransportError {
        TransportError::network_with_source(e.to_string(), e)
    }

    /// Check the status line and pull the body, classifying rejections
    async fn read_success_body(resp: Response) -> Result<Bytes, TransportError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::api(status.as_u16(), body));
        }
        resp.bytes().await.map_err(Self::network)
    }
}

impl UpdateSource for BotClient {
    async fn fetch_updates(
        &self,
        cursor: i64,
        timeout: Duration,
    ) -> Result<Vec<Update>, TransportError> {
        self.get_updates(cursor, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral local port
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            stream.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_rejects_empty_token() {
        assert!(matches!(
            BotClient::new(""),
            Err(ClientSetupError::EmptyToken)
        ));
    }

    #[test]
    fn test_rejects_token_with_control_chars() {
        assert!(matches!(
            BotClient::new("abc\ndef"),
            Err(ClientSetupError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_base_url_normalization() {
        let client = BotClient::with_base_url("token", "http://localhost:8000/").unwrap();
        assert_eq!(client.api_base, "http://localhost:8000/api/v2/bot");
        assert_eq!(client.download_base, "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_no_content_maps_to_empty_batch() {
        let base = serve_once("HTTP/1.1 204 No Content\r\ncontent-length: 0\r\n\r\n").await;
        let client = BotClient::with_base_url("token", &base).unwrap();

        let updates = client.get_updates(0, Duration::from_secs(5)).await.unwrap();
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_request_timeout_maps_to_empty_batch() {
        // Accept the connection but never answer, so the request timeout
        // fires the way an expired long poll does
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });

        let client = BotClient::with_base_url("token", &format!("http://{addr}")).unwrap();
        let updates = client
            .get_updates(0, Duration::from_millis(200))
            .await
            .unwrap();
        assert!(updates.is_empty());
    }

    #[tokio::test]
    async fn test_rejection_surfaces_status_and_body() {
        let base =
            serve_once("HTTP/1.1 401 Unauthorized\r\ncontent-length: 9\r\n\r\nbad token").await;
        let client = BotClient::with_base_url("token", &base).unwrap();

        let err = client
            .get_updates(0, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Api { status: 401, ref body } if body == "bad token"
        ));
    }
}
