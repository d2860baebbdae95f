#![allow(dead_code)]

use catchupd::{build_router, AppState, Store};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos(),
        NEXT_DIR.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Store,
}

pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("parse response json")
    }
}

pub async fn start(prefix: &str) -> TestServer {
    let store = Store::open(temp_dir(prefix).join("catchups.sqlite3")).expect("open store");
    let app = build_router(AppState::new(store.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });
    TestServer { addr, store }
}

impl TestServer {
    pub async fn get(&self, path: &str) -> HttpResponse {
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, self.addr
        );
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> HttpResponse {
        let payload = body.to_string();
        let request = format!(
            "POST {} HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            path,
            self.addr,
            payload.len(),
            payload
        );
        self.send(request).await
    }

    /// Registers a student and returns the id the server assigned.
    pub async fn add_student(&self, name: &str) -> i64 {
        let resp = self
            .post_json("/students", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(resp.status, 200, "add student: {}", resp.body);
        self.store
            .find_student_by_name(name)
            .expect("find student")
            .expect("student exists")
    }

    pub async fn add_catchup(&self, student_id: i64, date: &str, lesson: &str) {
        let resp = self
            .post_json(
                "/catchups",
                serde_json::json!({
                    "student_id": student_id,
                    "date": date,
                    "lesson_missed": lesson,
                }),
            )
            .await;
        assert_eq!(resp.status, 200, "add catch-up: {}", resp.body);
    }

    async fn send(&self, request: String) -> HttpResponse {
        let mut stream = tokio::net::TcpStream::connect(self.addr)
            .await
            .expect("connect server");
        stream
            .write_all(request.as_bytes())
            .await
            .expect("write request");
        let mut raw = String::new();
        stream
            .read_to_string(&mut raw)
            .await
            .expect("read response");
        parse_response(&raw)
    }
}

fn parse_response(raw: &str) -> HttpResponse {
    let (head, body) = raw.split_once("\r\n\r\n").expect("response head");
    let mut lines = head.split("\r\n");
    let status_line = lines.next().expect("status line");
    let status = status_line
        .split(' ')
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");
    let headers = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    HttpResponse {
        status,
        headers,
        body: body.to_string(),
    }
}
