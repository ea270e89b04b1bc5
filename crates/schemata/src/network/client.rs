//! Shared HTTP client wrapper
//!
//! Thin wrapper around `reqwest::blocking::Client` that centralizes
//! USER_AGENT, timeout, and status handling.

use crate::config::network::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Result, SchemataError};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Shared HTTP client with standard configuration
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()?;
        Ok(Self { inner })
    }

    /// GET a URL and return the body as text
    ///
    /// Non-success statuses are reported as `SchemataError::Status`.
    pub fn get_text(&self, url: &str) -> Result<String> {
        debug!(%url, "GET");
        let resp = self.inner.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SchemataError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.text()?;
        debug!(%url, bytes = body.len(), "response received");
        Ok(body)
    }

    /// GET a URL and deserialize the JSON response
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url)?;
        serde_json::from_str(&body)
            .map_err(|e| SchemataError::Parse(format!("Invalid JSON from {url}: {e}")))
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot loopback HTTP server for tests

    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Serve a single canned response, returning the base URL
    pub fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    /// A URL nothing listens on
    pub fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/catalog.json")
    }
}
