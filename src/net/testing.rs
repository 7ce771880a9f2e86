//! One-shot HTTP server standing in for the product server in tests.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned response. Returns the base URL and a handle yielding the raw request.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    serve_once_after(Duration::ZERO, status, body).await
}

/// Like [`serve_once`], but waits `delay` after reading the request before answering.
pub async fn serve_once_after(
    delay: Duration,
    status: &str,
    body: &str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&buf[..n]).to_string()
    });

    (format!("http://{addr}"), handle)
}
