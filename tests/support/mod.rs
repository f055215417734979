//! Minimal HTTP/1.1 stub standing in for a Jenkins server
//!
//! Routes are matched on the full request target (path plus query). Every
//! connection serves one request and is closed afterwards.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
            delay: None,
        }
    }

    pub fn json(body: impl Into<String>) -> Self {
        Self::ok(body).with_header("Content-Type", "application/json")
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
            delay: None,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self::status(302).with_header("Location", location)
    }

    /// Holds the response back for `delay` after the request arrives.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A request as seen by the stub
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub target: String,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
pub struct StubJenkins {
    routes: Arc<Mutex<HashMap<String, StubResponse>>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl StubJenkins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, target: &str, response: StubResponse) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(target.to_string(), response);
        self
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Binds to an ephemeral port and serves until the runtime shuts down.
    pub async fn start(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let stub = self.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let stub = stub.clone();
                tokio::spawn(async move { stub.serve(stream).await });
            }
        });
        addr
    }

    async fn serve(&self, mut stream: TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let head = String::from_utf8_lossy(&buf).to_string();
        let mut lines = head.lines();
        let target = lines
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or("/")
            .to_string();
        let authorization = lines.find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("authorization") {
                Some(value.trim().to_string())
            } else {
                None
            }
        });

        self.seen.lock().unwrap().push(SeenRequest {
            target: target.clone(),
            authorization,
        });

        let response = self
            .routes
            .lock()
            .unwrap()
            .get(&target)
            .cloned()
            .unwrap_or_else(|| StubResponse::status(404));

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        let mut raw = format!(
            "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n",
            response.status,
            response.body.len()
        );
        for (name, value) in &response.headers {
            raw.push_str(&format!("{}: {}\r\n", name, value));
        }
        raw.push_str("\r\n");
        raw.push_str(&response.body);

        let _ = stream.write_all(raw.as_bytes()).await;
        let _ = stream.shutdown().await;
    }
}
