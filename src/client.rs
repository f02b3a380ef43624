use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::CardConfig;
use crate::error::{CardError, FetchError};

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound GET requests. Implemented over `reqwest` for real runs.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Only transport failures (including timeouts) are errors here; a
    /// non-success status is returned as a normal response.
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse, FetchError>;
}

/// Production fetcher backed by a single shared `reqwest::Client`.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(config: &CardConfig) -> Result<Self, CardError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

/// Creates a preconfigured HTTP client with required headers.
fn build_client(config: &CardConfig) -> Result<Client, CardError> {
    let mut headers = HeaderMap::new();
    let agent = HeaderValue::from_str(&config.user_agent)
        .map_err(|e| CardError::Client(format!("invalid user agent: {e}")))?;
    headers.insert(USER_AGENT, agent);

    Client::builder()
        .default_headers(headers)
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| CardError::Client(e.to_string()))
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse, FetchError> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(url, e))?
            .to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Fetches `url` and decodes a JSON body, failing on any non-success status.
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn HttpFetch,
    url: &str,
    accept: Option<&str>,
) -> Result<T, FetchError> {
    let response = fetcher.get(url, accept).await?;

    if !response.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }

    serde_json::from_slice(&response.body).map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })
}

/// [`HttpFetch`] answering from a fixed URL table, for dry runs and tests.
///
/// Unknown URLs fail as transport errors. Every request is recorded.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    routes: HashMap<String, Result<HttpResponse, String>>,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl MemoryFetcher {
    pub fn json(self, url: &str, body: serde_json::Value) -> Self {
        self.raw(
            url,
            200,
            Some("application/json; charset=utf-8"),
            body.to_string().as_bytes(),
        )
    }

    pub fn raw(mut self, url: &str, status: u16, content_type: Option<&str>, body: &[u8]) -> Self {
        self.routes.insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                content_type: content_type.map(str::to_string),
                body: body.to_vec(),
            }),
        );
        self
    }

    /// Makes `url` fail with a transport error carrying `message`.
    pub fn fail(mut self, url: &str, message: &str) -> Self {
        self.routes.insert(url.to_string(), Err(message.to_string()));
        self
    }

    pub fn without(mut self, url: &str) -> Self {
        self.routes.remove(url);
        self
    }

    /// Requested URLs with the `Accept` value sent, in order.
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests().into_iter().map(|(url, _)| url).collect()
    }
}

#[async_trait]
impl HttpFetch for MemoryFetcher {
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((url.to_string(), accept.map(str::to_string)));
        match self.routes.get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(FetchError::transport(url, message)),
            None => Err(FetchError::transport(url, "no route")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GITHUB_ACCEPT;
    use crate::models::GitHubUser;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one connection with `response` and returns the raw request head.
    async fn serve_once(response: &'static [u8]) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_ascii_lowercase()
        });
        (base, handle)
    }

    #[tokio::test]
    async fn reqwest_fetcher_sends_headers_and_passes_through_error_status() {
        let (base, server) = serve_once(
            b"HTTP/1.1 404 Not Found\r\ncontent-type: image/png; x=1\r\ncontent-length: 3\r\nconnection: close\r\n\r\nabc",
        )
        .await;
        let fetcher = ReqwestFetcher::new(&CardConfig::default()).unwrap();

        let response = fetcher
            .get(&format!("{base}/users/alice"), Some(GITHUB_ACCEPT))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(response.content_type.as_deref(), Some("image/png; x=1"));
        assert_eq!(response.body, b"abc");

        let request = server.await.unwrap();
        assert!(request.starts_with("get /users/alice http/1.1"), "{request}");
        assert!(request.contains("accept: application/vnd.github.v3+json"), "{request}");
        assert!(request.contains("user-agent: github-card-generator"), "{request}");
    }

    #[tokio::test]
    async fn reqwest_fetcher_omits_accept_when_not_requested() {
        let (base, server) = serve_once(
            b"HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\n[]",
        )
        .await;
        let fetcher = ReqwestFetcher::new(&CardConfig::default()).unwrap();

        let response = fetcher.get(&format!("{base}/pinned"), None).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.content_type, None);
        let request = server.await.unwrap();
        assert!(!request.contains("vnd.github"), "{request}");
    }

    #[tokio::test]
    async fn reqwest_fetcher_times_out_as_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/slow", listener.local_addr().unwrap());
        let _server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(stream);
        });
        let config = CardConfig {
            request_timeout: Duration::from_millis(200),
            ..CardConfig::default()
        };
        let fetcher = ReqwestFetcher::new(&config).unwrap();

        let err = fetcher.get(&url, None).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { ref url, .. } if url.ends_with("/slow")));
    }

    #[tokio::test]
    async fn fetch_json_decodes_success_bodies() {
        let fetcher = MemoryFetcher::default().json("https://api/u", json!({"login": "bob"}));
        let user: GitHubUser = fetch_json(&fetcher, "https://api/u", None).await.unwrap();
        assert_eq!(user.login.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn fetch_json_rejects_non_success_status() {
        let fetcher = MemoryFetcher::default().raw("https://api/u", 404, None, b"{}");
        let err = fetch_json::<GitHubUser>(&fetcher, "https://api/u", None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn fetch_json_rejects_malformed_bodies() {
        let fetcher =
            MemoryFetcher::default().raw("https://api/u", 200, Some("text/html"), b"<html>");
        let err = fetch_json::<GitHubUser>(&fetcher, "https://api/u", None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Body { .. }));
    }

    #[tokio::test]
    async fn memory_fetcher_records_requests_and_fails_unknown_urls() {
        let fetcher = MemoryFetcher::default()
            .json("https://api/a", json!([]))
            .json("https://api/b", json!([]))
            .without("https://api/b");

        assert!(fetcher.get("https://api/a", Some(GITHUB_ACCEPT)).await.is_ok());
        let err = fetcher.get("https://api/b", None).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(
            fetcher.requests(),
            vec![
                ("https://api/a".to_string(), Some(GITHUB_ACCEPT.to_string())),
                ("https://api/b".to_string(), None),
            ]
        );
    }
}
