use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::feed::{Fetched, Source};

/// Reads exports relative to an HTTP base URL.
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base: normalize_base(base)?,
        })
    }

    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| anyhow!("bad path {}: {}", path, e))
    }
}

/// Parse `base`, forcing a trailing slash so `join` appends rather than replaces.
fn normalize_base(base: &str) -> Result<Url> {
    let mut raw = base.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| anyhow!("bad base url {}: {}", base, e))
}

#[async_trait]
impl Source for HttpSource {
    async fn read(&self, path: &str) -> Result<Fetched> {
        let url = self.url_for(path)?;
        let resp = self.client.get(url.clone()).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Fetched::NotFound);
        }
        if !status.is_success() {
            return Err(anyhow!("GET {} returned {}", url, status));
        }
        Ok(Fetched::Found(resp.text().await?))
    }

    fn describe(&self) -> String {
        format!("http:{}", self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::loader::load_csv;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const BODY: &str = "game,pick\nA @ B,A -3\n";

    /// Answers one request per connection, choosing the status by file name.
    async fn serve(listener: TcpListener) {
        while let Ok((sock, _)) = listener.accept().await {
            tokio::spawn(answer(sock));
        }
    }

    async fn answer(mut sock: TcpStream) {
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match sock.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => head.extend_from_slice(&chunk[..n]),
            }
        }
        let request = String::from_utf8_lossy(&head);
        let path = request.split_whitespace().nth(1).unwrap_or("");
        let (status, body) = if path.ends_with("missing.csv") {
            ("404 Not Found", "")
        } else if path.ends_with("broken.csv") {
            ("500 Internal Server Error", "boom")
        } else {
            ("200 OK", BODY)
        };
        let resp = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = sock.write_all(resp.as_bytes()).await;
        let _ = sock.shutdown().await;
    }

    async fn local_source() -> HttpSource {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener));
        HttpSource::new(&format!("http://{}/data", addr), 5).unwrap()
    }

    #[tokio::test]
    async fn status_codes_map_to_fetch_outcomes() {
        let src = local_source().await;

        assert_eq!(src.read("missing.csv").await.unwrap(), Fetched::NotFound);

        let err = src.read("broken.csv").await.unwrap_err();
        assert!(err.to_string().contains("500"), "{}", err);

        assert_eq!(
            src.read("2026-01-05_team_model.csv").await.unwrap(),
            Fetched::Found(BODY.to_string())
        );
    }

    #[tokio::test]
    async fn server_errors_load_as_empty() {
        let src = local_source().await;
        assert!(load_csv(&src, "broken.csv").await.is_empty());
        assert!(load_csv(&src, "missing.csv").await.is_empty());
        assert_eq!(load_csv(&src, "2026-01-05_team_model.csv").await.len(), 1);
    }

    #[test]
    fn joins_relative_to_base_directory() {
        let src = HttpSource::new("https://example.com/tracker/data", 5).unwrap();
        assert_eq!(
            src.url_for("2026-01-05_team_model.csv").unwrap().as_str(),
            "https://example.com/tracker/data/2026-01-05_team_model.csv"
        );
        assert_eq!(
            src.url_for("/2026-01-05_team_model.csv").unwrap().as_str(),
            "https://example.com/tracker/data/2026-01-05_team_model.csv"
        );
    }

    #[test]
    fn rejects_garbage_base() {
        assert!(HttpSource::new("not a url", 5).is_err());
    }
}
