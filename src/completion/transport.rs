//! The HTTP side of a completion: one POST in, one body out.

mod error;

pub(crate) use error::{Error, ErrorKind};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use url::Url;

pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[async_trait]
pub(crate) trait Transport {
    /// POSTs `body` as JSON and returns the response body. A non-success
    /// status is not an error at this level: the body is returned so that
    /// the caller can classify it.
    async fn post_json(&self, url: &Url, body: String) -> Result<String, Error>;
}

pub(crate) struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub(crate) fn new() -> Result<HttpTransport, Error> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(HttpTransport { client })
    }

    #[cfg(test)]
    pub(crate) fn with_client(client: Client) -> HttpTransport {
        HttpTransport { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &Url, body: String) -> Result<String, Error> {
        let res = self
            .client
            .post(url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = res.status();

        log::debug!("{} responded with {}", url, status);

        Ok(res.text().await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = socket.read(&mut chunk).await.expect("failed to read request");

            if n == 0 {
                break;
            }

            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);

            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serves a single canned response on a loopback port. The handle
    /// resolves to the raw request that was received.
    pub(crate) async fn serve_once(status: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let addr = listener.local_addr().expect("no local address");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("failed to accept");

            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );

            socket
                .write_all(response.as_bytes())
                .await
                .expect("failed to write response");
            let _ = socket.shutdown().await;

            request
        });

        let url = Url::parse(&format!("http://{}/v1/chat/completions", addr)).unwrap();

        (url, handle)
    }

    pub(crate) fn loopback_transport() -> HttpTransport {
        let client = Client::builder()
            .no_proxy()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build client");

        HttpTransport::with_client(client)
    }

    #[tokio::test]
    async fn test_post_json() {
        let (url, server) = serve_once("200 OK", r#"{"content": "pong"}"#).await;

        let body = loopback_transport()
            .post_json(&url, r#"{"ping": true}"#.to_string())
            .await
            .expect("request failed");

        assert_eq!(body, r#"{"content": "pong"}"#);

        let request = server.await.unwrap();

        assert!(request.starts_with("POST /v1/chat/completions HTTP/1.1\r\n"));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/json\r\n"));
        assert!(request.ends_with(r#"{"ping": true}"#));
    }

    #[tokio::test]
    async fn test_post_json_returns_error_bodies() {
        let (url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"error": "model crashed"}"#,
        )
        .await;

        let body = loopback_transport()
            .post_json(&url, "{}".to_string())
            .await
            .expect("a non-success status should still yield the body");

        assert_eq!(body, r#"{"error": "model crashed"}"#);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_while_reading_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Promises more body than it sends, then stalls
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;

            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 64\r\n\r\n{\"content\": ")
                .await
                .unwrap();

            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_millis(300))
            .build()
            .unwrap();

        let url = Url::parse(&format!("http://{}/v1/chat/completions", addr)).unwrap();

        let err = HttpTransport::with_client(client)
            .post_json(&url, "{}".to_string())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TimedOut);

        server.abort();
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Reserve a port, then free it so nothing is listening
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let url = Url::parse(&format!("http://{}/v1/chat/completions", addr)).unwrap();

        let err = loopback_transport()
            .post_json(&url, "{}".to_string())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConnectFailed);
    }
}
