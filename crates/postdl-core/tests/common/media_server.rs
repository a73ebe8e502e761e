//! Minimal HTTP/1.1 server imitating a post search API for integration tests.
//!
//! `GET /index.php?...&limit=L&pid=P` answers with page `P` of the post list
//! as JSON (an empty body past the last page, like the real API).
//! `GET /images/<id>.jpg` answers with the post's payload, or 404 for posts
//! served without one. Every request path is counted.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// One post known to the server.
#[derive(Debug, Clone)]
pub struct ServedPost {
    pub id: u64,
    /// Payload bytes; `None` makes the image URL answer 404.
    pub body: Option<Vec<u8>>,
}

impl ServedPost {
    pub fn with_body(id: u64) -> Self {
        Self {
            id,
            body: Some(payload_for(id)),
        }
    }

    pub fn missing(id: u64) -> Self {
        Self { id, body: None }
    }
}

/// Deterministic payload for a post id.
pub fn payload_for(id: u64) -> Vec<u8> {
    (0..2048u32).map(|i| ((i as u64 * 31 + id) % 251) as u8).collect()
}

pub struct MediaServer {
    pub base: String,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl MediaServer {
    pub fn api_url(&self) -> String {
        format!("{}index.php", self.base)
    }

    /// Number of requests whose path started with `prefix`.
    pub fn hits(&self, prefix: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(_, n)| *n)
            .sum()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(posts: Vec<ServedPost>) -> MediaServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}/", port);
    let hits = Arc::new(Mutex::new(HashMap::new()));
    let posts = Arc::new(posts);
    {
        let base = base.clone();
        let hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let posts = Arc::clone(&posts);
                let hits = Arc::clone(&hits);
                let base = base.clone();
                thread::spawn(move || handle(stream, &posts, &base, &hits));
            }
        });
    }
    MediaServer { base, hits }
}

fn handle(
    mut stream: TcpStream,
    posts: &[ServedPost],
    base: &str,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    *hits.lock().unwrap().entry(path.to_string()).or_insert(0) += 1;

    if path == "/index.php" {
        let body = search_page(posts, base, query);
        respond(&mut stream, "200 OK", "application/json", body.as_bytes());
        return;
    }
    if let Some(name) = path.strip_prefix("/images/") {
        let id = name.strip_suffix(".jpg").and_then(|s| s.parse::<u64>().ok());
        let found = posts.iter().find(|p| Some(p.id) == id);
        match found.and_then(|p| p.body.as_deref()) {
            Some(body) => respond(&mut stream, "200 OK", "image/jpeg", body),
            None => respond(&mut stream, "404 Not Found", "text/plain", b"not found"),
        }
        return;
    }
    respond(&mut stream, "404 Not Found", "text/plain", b"not found");
}

fn search_page(posts: &[ServedPost], base: &str, query: &str) -> String {
    let param = |key: &str| -> usize {
        query
            .split('&')
            .filter_map(|kv| kv.split_once('='))
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0)
    };
    let (limit, pid) = (param("limit"), param("pid"));
    let start = limit.saturating_mul(pid);
    let page: Vec<String> = posts
        .iter()
        .skip(start)
        .take(limit)
        .map(|p| {
            format!(
                r#"{{"id": {id}, "file_url": "{base}images/{id}.jpg", "tags": "test", "rating": "safe"}}"#,
                id = p.id,
                base = base
            )
        })
        .collect();
    if page.is_empty() {
        return String::new();
    }
    format!("[{}]", page.join(","))
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
