use super::types::Photo;
use super::{Error, PhotoSource, Result};
use crate::config::UnsplashConfig;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use std::future::Future;

#[derive(Serialize)]
struct ListPhotosParams<'a> {
    page: u32,
    per_page: u32,
    client_id: &'a str,
}

/// HTTP client for the Unsplash photo listing.
#[derive(Clone)]
pub struct UnsplashClient {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(base_url: &str, access_key: &str) -> Result<Self> {
        Self::with_builder(Self::builder(), base_url, access_key)
    }
    fn builder() -> reqwest::ClientBuilder {
        let mut headers = HeaderMap::new();
        headers.insert("Accept-Version", HeaderValue::from_static("v1"));
        reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
    }
    fn with_builder(
        builder: reqwest::ClientBuilder,
        base_url: &str,
        access_key: &str,
    ) -> Result<Self> {
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        })
    }
    /// Builds a client from the `[unsplash]` section. Returns `None` when no
    /// access key has been configured.
    pub fn from_config(config: &UnsplashConfig) -> Option<Result<Self>> {
        config
            .access_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| Self::new(&config.base_url, key))
    }
    pub async fn list_photos(&self, page: u32, per_page: u32) -> Result<Vec<Photo>> {
        let response = self
            .client
            .get(format!("{}/photos", self.base_url))
            .query(&ListPhotosParams {
                page,
                per_page,
                client_id: &self.access_key,
            })
            .send()
            .await?;
        let status = response.status();
        if let Some(remaining) = response
            .headers()
            .get("X-Ratelimit-Remaining")
            .and_then(|value| value.to_str().ok())
        {
            log::debug!("rate limit remaining: {remaining}");
        }
        let body = response.text().await?;
        if !status.is_success() {
            log::debug!("error response body: {body}");
            return Err(Error::Status(status));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl PhotoSource for UnsplashClient {
    fn photos(&self, page: u32, per_page: u32) -> impl Future<Output = Result<Vec<Photo>>> + Send {
        self.list_photos(page, per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn local_client(base_url: &str, access_key: &str) -> UnsplashClient {
        UnsplashClient::with_builder(UnsplashClient::builder().no_proxy(), base_url, access_key)
            .expect("failed to build client")
    }

    /// Serves a single canned response and yields the raw request it received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("no local addr");
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("failed to accept");
            let mut buf = vec![0; 8192];
            let n = stream.read(&mut buf).await.expect("failed to read");
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\nx-ratelimit-remaining: 49\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("failed to write");
            String::from_utf8_lossy(&buf[..n]).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn list_photos() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id":"a","urls":{"regular":"https://images.test/a"}},{"id":"b","urls":{"regular":"https://images.test/b"},"user":{"name":"B"}}]"#,
        )
        .await;
        let client = local_client(&base_url, "secret-key");
        let photos = client.list_photos(3, 10).await.expect("failed to list photos");
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].urls.regular, "https://images.test/a");
        assert_eq!(photos[1].user.as_ref().map(|u| u.name.as_str()), Some("B"));

        let request = server.await.expect("server panicked");
        let request_line = request.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("GET /photos?"), "{request_line}");
        assert!(request_line.contains("page=3"));
        assert!(request_line.contains("per_page=10"));
        assert!(request_line.contains("client_id=secret-key"));
        assert!(request.to_lowercase().contains("accept-version: v1"));
    }

    #[tokio::test]
    async fn error_status() {
        let (base_url, server) =
            serve_once("401 Unauthorized", r#"{"errors":["OAuth error: The access token is invalid"]}"#)
                .await;
        let client = local_client(&base_url, "bad-key");
        let result = client.list_photos(1, 10).await;
        assert!(matches!(result, Err(Error::Status(StatusCode::UNAUTHORIZED))));
        server.await.expect("server panicked");
    }

    #[tokio::test]
    async fn malformed_body() {
        let (base_url, server) = serve_once("200 OK", "<html>rate limited</html>").await;
        let client = local_client(&base_url, "key");
        assert!(matches!(
            client.list_photos(1, 10).await,
            Err(Error::Decode(_))
        ));
        server.await.expect("server panicked");
    }

    #[tokio::test]
    async fn unexpected_shape() {
        let (base_url, server) = serve_once("200 OK", r#"{"results":[]}"#).await;
        let client = local_client(&base_url, "key");
        assert!(matches!(
            client.list_photos(1, 10).await,
            Err(Error::Decode(_))
        ));
        server.await.expect("server panicked");
    }

    #[tokio::test]
    async fn connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("no local addr");
        drop(listener);
        let client = local_client(&format!("http://{addr}/"), "secret-key");
        match client.list_photos(1, 10).await {
            Err(e @ Error::Request(_)) => assert!(!e.to_string().contains("secret-key")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn from_config() {
        let mut config = UnsplashConfig::default();
        assert!(UnsplashClient::from_config(&config).is_none());
        config.access_key = Some(String::new());
        assert!(UnsplashClient::from_config(&config).is_none());
        config.access_key = Some("key".to_string());
        config.base_url = "https://api.unsplash.test/".to_string();
        let client = UnsplashClient::from_config(&config)
            .expect("access key is set")
            .expect("failed to build client");
        assert_eq!(client.base_url, "https://api.unsplash.test");
    }
}
