//! Descriptor fetching: the HTTP GET issued once per load.

use crate::error::LoadError;
#[cfg(not(target_arch = "wasm32"))]
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use serde_json::Value;
use tracing::debug;

/// Source of descriptor JSON.
///
/// Implementations run on a single-threaded executor, so the returned future
/// need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait JsonSource {
    async fn fetch_json(&self, url: &str) -> Result<Value, LoadError>;
}

/// Fetches descriptors over HTTP with caching disabled.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, LoadError> {
        Self::from_builder(reqwest::Client::builder())
    }

    /// Builds the client from `builder`.
    ///
    /// Natively caching is disabled with request headers. In the browser those
    /// headers would force a CORS preflight, so each request sets the fetch
    /// cache mode instead.
    pub fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self, LoadError> {
        #[cfg(not(target_arch = "wasm32"))]
        let builder = {
            let mut headers = HeaderMap::new();
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
            builder.default_headers(headers)
        };
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl JsonSource for HttpSource {
    async fn fetch_json(&self, url: &str) -> Result<Value, LoadError> {
        debug!(url, "fetching image descriptor");
        let request = self.client.get(url);
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_cache_no_store();
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Http {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpSource, JsonSource};
    use crate::error::LoadError;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned response and returns the request head it received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/new-image", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_lowercase()
        });
        (url, handle)
    }

    fn local_source() -> HttpSource {
        HttpSource::from_builder(reqwest::Client::builder().no_proxy()).unwrap()
    }

    #[tokio::test]
    async fn returns_parsed_body_and_disables_caching() {
        let (url, server) = serve_once("200 OK", r#"[{"url":"a.png"}]"#).await;
        let source = local_source();

        let value = source.fetch_json(&url).await.unwrap();
        assert_eq!(value, json!([{"url": "a.png"}]));

        let request = server.await.unwrap();
        assert!(request.starts_with("get /api/new-image"));
        assert!(request.contains("cache-control: no-store"));
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let (url, server) = serve_once("404 Not Found", r#"{"error":"missing"}"#).await;
        let source = local_source();

        let err = source.fetch_json(&url).await.unwrap_err();
        assert!(matches!(err, LoadError::Http { status: 404 }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn invalid_body_is_parse_error() {
        let (url, server) = serve_once("200 OK", "<html>oops</html>").await;
        let source = local_source();

        let err = source.fetch_json(&url).await.unwrap_err();
        assert!(matches!(err, LoadError::BodyParse(_)));
        server.await.unwrap();
    }
}
