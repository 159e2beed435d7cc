use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

/// One canned reply, matched on `"METHOD /path"`.
#[derive(Clone)]
pub struct Route {
    pub request: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn new(request: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            status,
            body: body.into(),
        }
    }
}

/// A minimal HTTP/1.1 responder for adapter tests.
///
/// Every connection is answered once and closed. Unmatched requests get 404.
pub struct CannedServer {
    url: Url,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl CannedServer {
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let _ = answer(stream, &routes, &seen).await;
                });
            }
        });

        Self {
            url: Url::parse(&format!("http://{addr}")).expect("server url"),
            requests,
        }
    }

    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// `(request line, body)` pairs received so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().clone()
    }
}

async fn answer(
    mut stream: TcpStream,
    routes: &[Route],
    seen: &Mutex<Vec<(String, String)>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();

    let mut parts = head.split_whitespace();
    let request = format!(
        "{} {}",
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default()
    );
    seen.lock().push((request.clone(), body));

    let (status, reply) = routes
        .iter()
        .find(|r| r.request == request)
        .map_or((404, String::from("{}")), |r| (r.status, r.body.clone()));

    let response = format!(
        "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
        reply.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
