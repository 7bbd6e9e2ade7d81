// In-process NAC stub: an axum router on 127.0.0.1:0 that records every
// request and answers with a canned status and body.
#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    tx: Arc<Mutex<Sender<RecordedRequest>>>,
}

async fn record(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let headers = headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let _ = stub.tx.lock().unwrap().send(RecordedRequest {
        method: method.to_string(),
        target,
        headers,
        body,
    });
    (
        stub.status,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body,
    )
}

pub struct StubServer {
    pub base_url: String,
    rx: Receiver<RecordedRequest>,
}

impl StubServer {
    pub fn request(&self) -> RecordedRequest {
        self.rx
            .recv_timeout(Duration::from_secs(5))
            .expect("stub server received no request")
    }
}

/// Start a stub answering every request with `status` and `body`.
pub fn spawn_stub(status: u16, body: &str) -> StubServer {
    let (tx, rx) = mpsc::channel();
    let stub = Stub {
        status: StatusCode::from_u16(status).expect("valid status code"),
        body: body.to_string(),
        tx: Arc::new(Mutex::new(tx)),
    };
    let (addr_tx, addr_rx) = mpsc::channel::<SocketAddr>();

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind random port");
            addr_tx.send(listener.local_addr().unwrap()).unwrap();
            let app = Router::new().fallback(record).with_state(stub);
            axum::serve(listener, app).await.expect("Server error");
        });
    });

    let addr = addr_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("stub server did not start");
    StubServer {
        base_url: format!("http://{addr}/tallac"),
        rx,
    }
}

/// A base URL for a port that had a listener a moment ago and now refuses.
pub fn refused_base_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/tallac")
}
