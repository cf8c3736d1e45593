use async_trait::async_trait;
use reqwest::{
    header::{ACCEPT_LANGUAGE, USER_AGENT},
    Client, StatusCode,
};
use thiserror::Error;
use url::Url;

use crate::config::FetchConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not an http(s) url: {0}")]
    InvalidUrl(String),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// Something that can turn a URL into page text.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct WebContentFetcher {
    client: Client,
    config: FetchConfig,
}

impl WebContentFetcher {
    pub fn new(client: Client, config: FetchConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl PageSource for WebContentFetcher {
    async fn fetch(&self, raw_url: &str) -> Result<String, FetchError> {
        let url = match Url::parse(raw_url.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => return Err(FetchError::InvalidUrl(raw_url.to_string())),
        };

        let request_err = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT_LANGUAGE, &self.config.accept_language)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(request_err)?;
        tracing::debug!(target: "fetch", url = %url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    pub fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    /// Serves exactly one canned HTTP response and hands back the raw request.
    pub async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{test_support::{local_client, serve_once}, *};

    fn fetcher() -> WebContentFetcher {
        WebContentFetcher::new(
            local_client(),
            FetchConfig {
                request_timeout: Duration::from_secs(5),
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
                accept_language: "en-US,en;q=0.9".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn returns_body_and_sends_browser_headers() {
        let (base, server) = serve_once("200 OK", "<p>Select a date</p>").await;
        let body = fetcher().fetch(&format!("{base}/appointments")).await.unwrap();
        assert_eq!(body, "<p>Select a date</p>");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /appointments"));
        assert!(request.contains("user-agent: mozilla/5.0 (windows nt 10.0; win64; x64)"));
        assert!(request.contains("accept-language: en-us,en;q=0.9"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base, server) = serve_once("503 Service Unavailable", "down").await;
        let err = fetcher().fetch(&base).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn rejects_non_http_urls_without_network() {
        let err = fetcher().fetch("ftp://example.com/file").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
        assert!(matches!(
            fetcher().fetch("not a url").await,
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = fetcher().fetch(&format!("http://{addr}/")).await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }
}
