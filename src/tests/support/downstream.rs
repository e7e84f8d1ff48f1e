// Stub downstream service exposing the processing sub-API.

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Switches flipped by tests plus a log of every call received.
#[derive(Default)]
pub struct StubState {
    enabled: AtomicBool,
    failing: AtomicBool,
    hanging: AtomicBool,
    malformed_state: AtomicBool,
    calls: Mutex<Vec<String>>,
}

/// Downstream service stub bound to an ephemeral loopback port.
pub struct StubService {
    addr: String,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
    shutdown: tokio::sync::oneshot::Sender<()>,
}

impl StubService {
    /// Starts the stub with processing disabled.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());

        let router = Router::new()
            .fallback(handle)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://127.0.0.1:{}", addr.port());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, router);
            tokio::select! {
                _ = server => {},
                _ = shutdown_rx => {},
            }
        });

        Self {
            addr: addr_str,
            state,
            handle,
            shutdown: shutdown_tx,
        }
    }

    /// Base address, e.g. `http://127.0.0.1:41234`.
    pub fn addr(&self) -> String {
        self.addr.clone()
    }

    pub fn set_enabled(&self, v: bool) {
        self.state.enabled.store(v, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    /// Every endpoint answers 500.
    pub fn set_failing(&self, v: bool) {
        self.state.failing.store(v, Ordering::SeqCst);
    }

    /// Every endpoint sleeps far longer than any client timeout.
    pub fn set_hanging(&self, v: bool) {
        self.state.hanging.store(v, Ordering::SeqCst);
    }

    /// The state endpoint answers 200 with a non-JSON body.
    pub fn set_malformed_state(&self, v: bool) {
        self.state.malformed_state.store(v, Ordering::SeqCst);
    }

    /// Calls received so far, as `METHOD /path`.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.state.calls.lock().unwrap().clear();
    }

    pub async fn close(self) {
        let _ = self.shutdown.send(());
        self.handle.abort();
    }
}

async fn handle(State(state): State<Arc<StubState>>, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    state
        .calls
        .lock()
        .unwrap()
        .push(format!("{} {}", method, path));

    if state.hanging.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
    if state.failing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))).into_response();
    }

    match (method, path.as_str()) {
        (Method::POST, "/api/processing/start") => {
            state.enabled.store(true, Ordering::SeqCst);
            Json(json!({"status": "started"})).into_response()
        }
        (Method::POST, "/api/processing/stop") => {
            state.enabled.store(false, Ordering::SeqCst);
            Json(json!({"status": "stopped"})).into_response()
        }
        (Method::GET, "/api/processing/state") => {
            if state.malformed_state.load(Ordering::SeqCst) {
                return (StatusCode::OK, "definitely not json").into_response();
            }
            Json(json!({"enabled": state.enabled.load(Ordering::SeqCst), "queued": 3})).into_response()
        }
        (Method::GET, "/api/files") => {
            Json(json!({"files": ["a.pdf", "b.pdf"], "count": 2})).into_response()
        }
        (Method::GET, "/api/files/processed") | (Method::GET, "/files/processed") => {
            Json(json!({"files": ["a.pdf"], "processedCount": 1, "path": path})).into_response()
        }
        (Method::POST, "/api/reprocess-all") => {
            Json(json!({"status": "ok", "message": "reprocessing all files"})).into_response()
        }
        (Method::POST, "/api/processing/reset") => {
            Json(json!({"status": "reset"})).into_response()
        }
        (Method::POST, "/api/clear") => Json(json!({"status": "cleared"})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
