//! 测试用的 GoFile API 模拟服务（axum，监听 127.0.0.1 随机端口）

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gofile_direct_link::{config::Config, AppState};

pub const TOKEN: &str = "tok-123";
pub const WT: &str = "wt-456";

#[derive(Default)]
pub struct MockGofile {
    /// content id → data（文件夹的 children 内联）
    pub nodes: HashMap<String, Value>,
    /// content id → 明文密码
    pub passwords: HashMap<String, String>,
    /// 返回 500 + 非 JSON 的 content id
    pub failing: HashSet<String>,
    /// 延迟响应的 content id
    pub slow: HashMap<String, Duration>,
    pub accounts_fail: AtomicBool,
    pub accounts_calls: AtomicUsize,
    pub global_js_calls: AtomicUsize,
    pub contents_calls: AtomicUsize,
}

impl MockGofile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: &str, data: Value) -> Self {
        self.nodes.insert(id.to_string(), data);
        self
    }

    pub fn password(mut self, id: &str, password: &str) -> Self {
        self.passwords.insert(id.to_string(), password.to_string());
        self
    }

    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn slow(mut self, id: &str, delay: Duration) -> Self {
        self.slow.insert(id.to_string(), delay);
        self
    }

    pub fn accounts(&self) -> usize {
        self.accounts_calls.load(Ordering::SeqCst)
    }

    pub fn global_js(&self) -> usize {
        self.global_js_calls.load(Ordering::SeqCst)
    }

    pub fn contents(&self) -> usize {
        self.contents_calls.load(Ordering::SeqCst)
    }
}

pub fn file(name: &str, link: &str) -> Value {
    json!({ "type": "file", "name": name, "link": link })
}

pub fn folder(name: &str, children: Vec<(&str, Value)>) -> Value {
    let children: Map<String, Value> = children
        .into_iter()
        .map(|(id, child)| (id.to_string(), child))
        .collect();
    json!({ "type": "folder", "name": name, "children": children })
}

pub fn sub_folder(name: &str) -> Value {
    json!({ "type": "folder", "name": name })
}

async fn accounts(State(mock): State<Arc<MockGofile>>) -> Json<Value> {
    mock.accounts_calls.fetch_add(1, Ordering::SeqCst);
    if mock.accounts_fail.load(Ordering::SeqCst) {
        return Json(json!({ "status": "error-rateLimit", "data": {} }));
    }
    Json(json!({ "status": "ok", "data": { "token": TOKEN } }))
}

async fn global_js(State(mock): State<Arc<MockGofile>>) -> String {
    mock.global_js_calls.fetch_add(1, Ordering::SeqCst);
    format!("var appdata = {{}};\nappdata.wt = \"{}\";\nappdata.lang = \"en\";\n", WT)
}

async fn contents(
    State(mock): State<Arc<MockGofile>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    mock.contents_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(delay) = mock.slow.get(&id) {
        tokio::time::sleep(*delay).await;
    }

    if mock.failing.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false);
    if !authorized || query.get("wt").map(String::as_str) != Some(WT) {
        return Json(json!({ "status": "error-notAuthorized", "data": {} })).into_response();
    }

    let Some(node) = mock.nodes.get(&id) else {
        return Json(json!({ "status": "error-notFound", "data": {} })).into_response();
    };

    if let Some(password) = mock.passwords.get(&id) {
        let expected = format!("{:x}", Sha256::digest(password.as_bytes()));
        let sent = query.get("password").cloned().unwrap_or_default();
        if sent != expected {
            let status = if sent.is_empty() {
                "passwordRequired"
            } else {
                "passwordWrong"
            };
            return Json(json!({ "status": "ok", "data": { "passwordStatus": status } }))
                .into_response();
        }
        let mut node = node.clone();
        node["passwordStatus"] = json!("passwordOk");
        return Json(json!({ "status": "ok", "data": node })).into_response();
    }

    Json(json!({ "status": "ok", "data": node })).into_response()
}

/// 启动模拟服务，返回 base url
pub async fn serve_mock(mock: Arc<MockGofile>) -> String {
    let app = Router::new()
        .route("/accounts", post(accounts))
        .route("/dist/js/global.js", get(global_js))
        .route("/contents/:id", get(contents))
        .with_state(mock);

    serve(app).await
}

pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn test_config(base: &str) -> Config {
    let mut config = Config::default();
    config.gofile.api_base = base.to_string();
    config.gofile.site_base = base.to_string();
    config.gofile.token_timeout_secs = 2;
    config.gofile.wt_timeout_secs = 2;
    config.gofile.contents_timeout_secs = 2;
    config
}

/// 模拟服务 + 指向它的 AppState
pub async fn setup(mock: MockGofile) -> (Arc<MockGofile>, Arc<AppState>, String) {
    setup_with(mock, |_| {}).await
}

pub async fn setup_with(
    mock: MockGofile,
    tweak: impl FnOnce(&mut Config),
) -> (Arc<MockGofile>, Arc<AppState>, String) {
    let mock = Arc::new(mock);
    let base = serve_mock(mock.clone()).await;
    let mut config = test_config(&base);
    tweak(&mut config);
    let state = Arc::new(AppState::new(config).unwrap());
    (mock, state, base)
}
