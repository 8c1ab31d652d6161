//! Shared utilities for integration tests: an in-process mock of the
//! content API (REST + push socket) and client builders.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use portfolio_sync::config::{ApiConfig, SyncConfig};

pub const TOKEN: &str = "test-token";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

/// Control messages for open push sockets.
#[derive(Debug, Clone)]
enum SocketControl {
    Frame(String),
    CloseNormal,
    Drop,
}

#[derive(Default)]
struct Counters {
    section_fetches: AtomicUsize,
    stats_gets: AtomicUsize,
    stats_posts: AtomicUsize,
    slow_hits: AtomicUsize,
    socket_connects: AtomicUsize,
    open_sockets: AtomicUsize,
}

pub struct MockState {
    sections: Mutex<Vec<Value>>,
    stats: Mutex<Vec<Value>>,
    about: Mutex<Vec<Value>>,
    projects: Vec<Value>,
    next_id: AtomicI64,
    fail_section_fetch: AtomicBool,
    fail_mutations: AtomicBool,
    stats_failures: AtomicUsize,
    counters: Counters,
    sockets: broadcast::Sender<SocketControl>,
}

/// A running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Bind on an ephemeral port and serve in the background.
    pub async fn start() -> Self {
        let (sockets, _) = broadcast::channel(16);
        let state = Arc::new(MockState {
            sections: Mutex::new(vec![
                json!({ "id": 1, "section_name": "hero", "title": "I Am Rahul Raj",
                        "subtitle": "AVP Product", "is_active": true, "order_index": 0 }),
                json!({ "id": 2, "section_name": "about", "title": "Get to Know Me",
                        "subtitle": null, "description": "A glimpse into my world of innovation and creativity",
                        "is_active": true, "order_index": 1 }),
            ]),
            stats: Mutex::new(vec![
                json!({ "id": 1, "label": "Years", "value": "10", "suffix": "+", "is_active": true, "order_index": 0 }),
            ]),
            about: Mutex::new(vec![
                json!({ "id": 1, "title": "Who I Am", "description": "Product leader", "order_index": 0 }),
                json!({ "id": 2, "title": "What I Do", "description": "Build platforms", "order_index": 1 }),
                json!({ "id": 3, "title": "What Interests Me", "description": "Systems", "order_index": 2 }),
            ]),
            projects: vec![
                json!({ "id": 1, "title": "Ledger", "description": "Payments core", "category": "fintech", "is_active": true }),
                json!({ "id": 2, "title": "Atlas", "description": "Maps", "category": "data", "is_active": true }),
                json!({ "id": 3, "title": "Vault", "description": "Custody", "category": "fintech", "is_active": false }),
            ],
            next_id: AtomicI64::new(100),
            fail_section_fetch: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            stats_failures: AtomicUsize::new(0),
            counters: Counters::default(),
            sockets,
        });

        let app = Router::new()
            .route("/", get(|| async { Json(json!({ "message": "Portfolio API is running" })) }))
            .route("/api/auth/login", post(login))
            .route("/api/section-titles", get(list_sections).post(create_section))
            .route("/api/section-titles/{key}", get(get_section).put(update_section))
            .route("/api/stats", get(list_stats).post(create_stat))
            .route("/api/stats/{id}", axum::routing::put(update_stat).delete(delete_stat))
            .route("/api/about", get(list_about))
            .route("/api/about/order", axum::routing::put(reorder_about))
            .route("/api/projects", get(list_projects))
            .route("/api/projects/{category}", get(projects_by_category))
            .route("/api/admin/contacts", get(admin_contacts))
            .route("/api/slow", get(slow))
            .route("/api/test-websocket", post(test_push))
            .route("/ws", get(ws_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Change a section title directly, as another admin would.
    pub fn set_title(&self, section: &str, title: &str) {
        let mut rows = self.state.sections.lock().unwrap();
        match rows.iter_mut().find(|r| r["section_name"] == section) {
            Some(row) => row["title"] = json!(title),
            None => {
                let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
                rows.push(json!({ "id": id, "section_name": section, "title": title, "is_active": true }));
            }
        }
    }

    pub fn title(&self, section: &str) -> Option<String> {
        let rows = self.state.sections.lock().unwrap();
        rows.iter()
            .find(|r| r["section_name"] == section)
            .and_then(|r| r["title"].as_str().map(str::to_string))
    }

    /// Send a raw text frame to every open socket.
    pub fn push(&self, frame: &str) {
        let _ = self.state.sockets.send(SocketControl::Frame(frame.to_string()));
    }

    pub fn push_config_updated(&self) {
        self.push(r#"{"type":"section_config_updated","timestamp":"2024-01-01T00:00:00"}"#);
    }

    /// Close every socket with code 1000.
    pub fn close_sockets_cleanly(&self) {
        let _ = self.state.sockets.send(SocketControl::CloseNormal);
    }

    /// Drop every socket without a close frame.
    pub fn drop_sockets(&self) {
        let _ = self.state.sockets.send(SocketControl::Drop);
    }

    /// About ids by stored position.
    pub fn about_order(&self) -> Vec<i64> {
        sorted_about(&self.state.about.lock().unwrap())
            .iter()
            .filter_map(|item| item["id"].as_i64())
            .collect()
    }

    pub fn fail_section_fetch(&self, fail: bool) {
        self.state.fail_section_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.state.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Make the next `n` stats list requests return 503.
    pub fn fail_next_stats_gets(&self, n: usize) {
        self.state.stats_failures.store(n, Ordering::SeqCst);
    }

    pub fn section_fetches(&self) -> usize {
        self.state.counters.section_fetches.load(Ordering::SeqCst)
    }

    pub fn stats_gets(&self) -> usize {
        self.state.counters.stats_gets.load(Ordering::SeqCst)
    }

    pub fn stats_posts(&self) -> usize {
        self.state.counters.stats_posts.load(Ordering::SeqCst)
    }

    pub fn slow_hits(&self) -> usize {
        self.state.counters.slow_hits.load(Ordering::SeqCst)
    }

    pub fn socket_connects(&self) -> usize {
        self.state.counters.socket_connects.load(Ordering::SeqCst)
    }

    pub fn open_sockets(&self) -> usize {
        self.state.counters.open_sockets.load(Ordering::SeqCst)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    if form.username == USERNAME && form.password == PASSWORD {
        Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect username or password")
    }
}

async fn list_sections(State(state): State<Arc<MockState>>) -> Response {
    state.counters.section_fetches.fetch_add(1, Ordering::SeqCst);
    if state.fail_section_fetch.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    let rows = state.sections.lock().unwrap().clone();
    Json(Value::Array(rows)).into_response()
}

async fn get_section(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    let rows = state.sections.lock().unwrap();
    match rows.iter().find(|r| r["section_name"] == name.as_str()) {
        Some(row) => Json(row.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Section title not found"),
    }
}

async fn create_section(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.fail_mutations.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }
    body["id"] = json!(state.next_id.fetch_add(1, Ordering::SeqCst));
    state.sections.lock().unwrap().push(body.clone());
    Json(body).into_response()
}

async fn update_section(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.fail_mutations.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }
    let Ok(id) = key.parse::<i64>() else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "id must be an integer");
    };
    let mut rows = state.sections.lock().unwrap();
    let Some(row) = rows.iter_mut().find(|r| r["id"] == id) else {
        return detail(StatusCode::NOT_FOUND, "Section title not found");
    };
    if let (Some(row), Some(fields)) = (row.as_object_mut(), body.as_object()) {
        for (k, v) in fields {
            row.insert(k.clone(), v.clone());
        }
    }
    Json(row.clone()).into_response()
}

async fn list_stats(State(state): State<Arc<MockState>>) -> Response {
    state.counters.stats_gets.fetch_add(1, Ordering::SeqCst);
    let remaining = state.stats_failures.load(Ordering::SeqCst);
    if remaining > 0 {
        state.stats_failures.store(remaining - 1, Ordering::SeqCst);
        return detail(StatusCode::SERVICE_UNAVAILABLE, "try again");
    }
    Json(Value::Array(state.stats.lock().unwrap().clone())).into_response()
}

async fn create_stat(State(state): State<Arc<MockState>>, Json(mut body): Json<Value>) -> Response {
    state.counters.stats_posts.fetch_add(1, Ordering::SeqCst);
    if body["label"].as_str().map(str::is_empty).unwrap_or(true) {
        return detail(StatusCode::BAD_REQUEST, "label is required");
    }
    if state.fail_mutations.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }
    body["id"] = json!(state.next_id.fetch_add(1, Ordering::SeqCst));
    state.stats.lock().unwrap().push(body.clone());
    Json(body).into_response()
}

async fn update_stat(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if state.fail_mutations.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }
    let mut stats = state.stats.lock().unwrap();
    let Some(stat) = stats.iter_mut().find(|s| s["id"] == id) else {
        return detail(StatusCode::NOT_FOUND, "Stat not found");
    };
    *stat = body;
    stat["id"] = json!(id);
    Json(stat.clone()).into_response()
}

async fn delete_stat(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    if state.fail_mutations.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }
    let mut stats = state.stats.lock().unwrap();
    let before = stats.len();
    stats.retain(|s| s["id"] != id);
    if stats.len() == before {
        return detail(StatusCode::NOT_FOUND, "Stat not found");
    }
    Json(json!({ "message": "Stat deleted" })).into_response()
}

fn sorted_about(items: &[Value]) -> Vec<Value> {
    let mut items = items.to_vec();
    items.sort_by_key(|item| item["order_index"].as_i64().unwrap_or(0));
    items
}

async fn list_about(State(state): State<Arc<MockState>>) -> Response {
    Json(Value::Array(sorted_about(&state.about.lock().unwrap()))).into_response()
}

#[derive(Deserialize)]
struct OrderEntry {
    id: i64,
    order_index: i64,
}

async fn reorder_about(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(order): Json<Vec<OrderEntry>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.fail_mutations.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "write failed");
    }
    let mut items = state.about.lock().unwrap();
    for entry in order {
        if let Some(item) = items.iter_mut().find(|i| i["id"] == entry.id) {
            item["order_index"] = json!(entry.order_index);
        }
    }
    Json(Value::Array(sorted_about(&items))).into_response()
}

async fn list_projects(State(state): State<Arc<MockState>>) -> Response {
    Json(Value::Array(state.projects.clone())).into_response()
}

async fn projects_by_category(
    State(state): State<Arc<MockState>>,
    Path(category): Path<String>,
) -> Response {
    let matching: Vec<Value> = state
        .projects
        .iter()
        .filter(|p| p["category"] == category.as_str() && p["is_active"] == true)
        .cloned()
        .collect();
    Json(Value::Array(matching)).into_response()
}

async fn admin_contacts(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([{ "id": 1, "name": "Ann", "email": "ann@example.com", "message": "Hi" }]))
        .into_response()
}

async fn slow(State(state): State<Arc<MockState>>) -> Response {
    state.counters.slow_hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "late": true })).into_response()
}

async fn test_push(State(state): State<Arc<MockState>>) -> Response {
    let frame = json!({
        "type": "test",
        "message": "This is a test WebSocket message",
        "timestamp": "2024-01-01T00:00:00"
    });
    let _ = state.sockets.send(SocketControl::Frame(frame.to_string()));
    Json(json!({ "message": "Test message broadcasted" })).into_response()
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<MockState>>) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

async fn serve_socket(mut socket: WebSocket, state: Arc<MockState>) {
    let mut control = state.sockets.subscribe();
    state.counters.socket_connects.fetch_add(1, Ordering::SeqCst);
    state.counters.open_sockets.fetch_add(1, Ordering::SeqCst);

    loop {
        tokio::select! {
            msg = control.recv() => match msg {
                Ok(SocketControl::Frame(text)) => {
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Ok(SocketControl::CloseNormal) => {
                    let _ = socket
                        .send(Message::Close(Some(CloseFrame {
                            code: 1000,
                            reason: Utf8Bytes::from_static("server closing"),
                        })))
                        .await;
                    break;
                }
                Ok(SocketControl::Drop) => break,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    state.counters.open_sockets.fetch_sub(1, Ordering::SeqCst);
}

/// API settings with short retry delays.
pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        max_attempts: 3,
        retry_base_delay_ms: 10,
        retry_max_delay_ms: 50,
        ..ApiConfig::default()
    }
}

/// Full client settings with fast reconnects.
pub fn sync_config(base_url: &str) -> SyncConfig {
    let mut config = SyncConfig::default();
    config.api = api_config(base_url);
    config.realtime.reconnect_base_delay_ms = 20;
    config.realtime.max_reconnect_attempts = 3;
    config
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

/// Await `fut` with a test-friendly deadline.
pub async fn within<F: Future>(timeout: Duration, fut: F) -> F::Output {
    tokio::time::timeout(timeout, fut)
        .await
        .expect("operation timed out")
}
