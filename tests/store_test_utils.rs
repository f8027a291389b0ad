use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

pub mod shared {
    use super::*;

    /// A local stand-in for the store's `classes/<table>` find endpoint.
    ///
    /// It serves `rows` honouring `limit` (default 100, like the real server) and
    /// `skip`, and remembers every request target it saw.
    pub struct MockStore {
        pub server_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl MockStore {
        #[allow(dead_code)]
        pub fn requests(&self) -> Vec<Url> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|target| Url::parse(&format!("http://mock{}", target)).unwrap())
                .collect()
        }
    }

    pub fn query_param(url: &Url, key: &str) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[allow(dead_code)]
    pub fn city_rows(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                json!({
                    "objectId": format!("obj{}", i),
                    "name": format!("City {}", i),
                    "lat": (i % 180) as f64 - 90.0,
                    "long": (i % 360) as f64 - 180.0,
                })
            })
            .collect()
    }

    pub async fn spawn_mock_store(rows: Vec<Value>) -> MockStore {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let rows = Arc::new(rows);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let rows = Arc::clone(&rows);
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => head.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&head).to_string();
                    let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                    seen.lock().unwrap().push(target.clone());

                    let url = Url::parse(&format!("http://mock{}", target)).unwrap();
                    let number = |key: &str| query_param(&url, key).and_then(|v| v.parse::<usize>().ok());
                    let skip = number("skip").unwrap_or(0);
                    let limit = number("limit").unwrap_or(100);

                    let page: Vec<Value> = rows.iter().skip(skip).take(limit).cloned().collect();
                    let body = json!({ "results": page }).to_string();
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        MockStore {
            server_url: format!("http://{}/parse", addr),
            requests,
        }
    }
}
