
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Request paths (with query strings) in arrival order.
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

/// Route table: path prefix, response status, response body.
pub(crate) type Routes = Vec<(&'static str, u16, Vec<u8>)>;

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

async fn handle(mut stream: TcpStream, routes: &Routes, calls: &CallLog) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos;
        }
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    // Drain the body before answering so the client never sees a reset
    // mid-write.
    let total = header_end + 4 + content_length;
    while data.len() < total {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }

    let path = headers
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    calls.lock().unwrap().push(path.clone());

    let (status, body) = routes
        .iter()
        .find(|(prefix, _, _)| path.starts_with(prefix))
        .map(|(_, status, body)| (*status, body.clone()))
        .unwrap_or((404, Vec::new()));
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        _ => "Error",
    };

    let head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(&body).await;
    let _ = stream.shutdown().await;
}

/// Spawns a one-response-per-connection HTTP fixture on a loopback port and
/// returns its base URL plus the call log.
pub(crate) async fn spawn(routes: Routes) -> (String, CallLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));

    let log = calls.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let routes = routes.clone();
            let log = log.clone();
            tokio::spawn(async move {
                handle(stream, &routes, &log).await;
            });
        }
    });

    (format!("http://{addr}"), calls)
}
