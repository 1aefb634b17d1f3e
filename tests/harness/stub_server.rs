//! Minimal HTTP/1.1 upstream answering from a per-path script.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::json(200, body)
    }
}

#[derive(Default)]
struct Script {
    /// Served in order; the last one repeats once the queue is down to one.
    responses: HashMap<String, VecDeque<StubResponse>>,
    hits: HashMap<String, usize>,
    requests: HashMap<String, Vec<String>>,
}

/// A local server bound to an ephemeral port.
pub struct StubServer {
    addr: SocketAddr,
    script: Arc<Mutex<Script>>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let script = Arc::new(Mutex::new(Script::default()));

        let shared = Arc::clone(&script);
        let task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let script = Arc::clone(&shared);
                tokio::spawn(async move {
                    let _ = serve(stream, script).await;
                });
            }
        });

        Self { addr, script, task }
    }

    /// Base URL to put in `[price_source].base_url`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queue responses for `path`.
    pub fn respond(&self, path: &str, responses: Vec<StubResponse>) {
        self.script
            .lock()
            .responses
            .insert(path.to_string(), responses.into());
    }

    pub fn hits(&self, path: &str) -> usize {
        self.script.lock().hits.get(path).copied().unwrap_or(0)
    }

    /// Raw requests (head and body) received on `path`, in order.
    pub fn requests(&self, path: &str) -> Vec<String> {
        self.script
            .lock()
            .requests
            .get(path)
            .cloned()
            .unwrap_or_default()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut stream: TcpStream, script: Arc<Mutex<Script>>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .split('?')
        .next()
        .unwrap_or("/")
        .to_string();

    let response = {
        let mut script = script.lock();
        *script.hits.entry(path.clone()).or_default() += 1;
        script
            .requests
            .entry(path.clone())
            .or_default()
            .push(String::from_utf8_lossy(&buf).to_string());
        match script.responses.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    }
    .unwrap_or_else(|| StubResponse::json(404, r#"{"error":"not scripted"}"#));

    let reply = format!(
        "HTTP/1.1 {} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    );
    stream.write_all(reply.as_bytes()).await?;
    stream.shutdown().await
}
