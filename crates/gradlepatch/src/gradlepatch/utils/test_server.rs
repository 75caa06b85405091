//! Throwaway HTTP/1.1 server for download tests.
//!
//! Answers every HEAD and GET with the same body and status, closing the
//! connection after each response. Counts requests so tests can prove that
//! nothing hit the network.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    pub status: u16,
    /// Status for HEAD requests; `None` answers them with `status`.
    pub head_status: Option<u16>,
    /// Send `Content-Length` on HEAD responses.
    pub head_length: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            head_status: None,
            head_length: true,
        }
    }
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<AtomicUsize>,
}

impl TestServer {
    pub fn start(body: Vec<u8>) -> Self {
        Self::start_with_options(body, ServerOptions::default())
    }

    pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);
        let body = Arc::new(body);

        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                counter.fetch_add(1, Ordering::SeqCst);
                let body = Arc::clone(&body);
                thread::spawn(move || handle(stream, &body, opts));
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            requests,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// A base URL nothing listens on; any request against it fails.
pub fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn handle(mut stream: TcpStream, body: &[u8], opts: ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let is_head = request.starts_with(b"HEAD ");
    let status = match opts.head_status {
        Some(head_status) if is_head => head_status,
        _ => opts.status,
    };
    let status_line = format!("HTTP/1.1 {} {}\r\n", status, reason(status));
    let length = if is_head && !opts.head_length {
        String::new()
    } else {
        format!("Content-Length: {}\r\n", body.len())
    };
    let head = format!("{status_line}{length}Connection: close\r\n\r\n");

    let _ = stream.write_all(head.as_bytes());
    if !is_head {
        let _ = stream.write_all(body);
    }
    let _ = stream.flush();
}
