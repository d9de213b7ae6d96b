//! Web 服务器模块

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    routing::post,
    Router,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::{gofile, AppState};

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

/// /convert 单个链接的结果
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ConvertResult {
    Links { input: Value, direct_links: Vec<String> },
    Failed { input: Value, error: String },
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub status: &'static str,
    pub results: Vec<ConvertResult>,
}

#[derive(Debug, Deserialize)]
pub struct FixedQuery {
    pub password: Option<String>,
}

/// 校验后的 /convert 请求
#[derive(Debug, PartialEq)]
pub struct ConvertRequest {
    pub urls: Vec<Value>,
    pub password: Option<String>,
}

/// 校验 /convert 请求体
///
/// 要求 `{"urls": [...]}`，1 到 `max_urls` 个元素；`password` 可选。
pub fn validate_convert_request(body: &[u8], max_urls: usize) -> Result<ConvertRequest, String> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|_| "JSON body must include 'urls' list".to_string())?;

    let Some(urls) = data.get("urls") else {
        return Err("JSON body must include 'urls' list".to_string());
    };

    let Some(urls) = urls.as_array() else {
        return Err("'urls' must be a list".to_string());
    };

    if urls.is_empty() {
        return Err("Provide at least one GoFile URL".to_string());
    }

    if urls.len() > max_urls {
        return Err(format!("Maximum {} URLs allowed", max_urls));
    }

    Ok(ConvertRequest {
        urls: urls.clone(),
        password: password_from(&data),
    })
}

fn password_from(data: &Value) -> Option<String> {
    data.get("password")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn bad_request(message: String) -> Response {
    warn!("❌ 请求无效: {}", message);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            status: "error",
            message,
        }),
    )
        .into_response()
}

/// 首页：用法说明
pub async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "ok",
        message: "GoFile converter API. POST /convert with JSON {\"urls\": [...] }",
    })
}

/// 健康检查端点
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION,
    })
}

/// 转换 API：最多 `max_urls` 个分享链接，并发解析
pub async fn convert_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let req = match validate_convert_request(&body, state.config.web.max_urls) {
        Ok(req) => req,
        Err(message) => return bad_request(message),
    };

    info!("📥 收到转换请求: {} 个链接", req.urls.len());

    let max_results = state.config.web.max_results;
    let password = req.password.as_deref();

    let results = join_all(req.urls.into_iter().map(|input| {
        let state = state.as_ref();
        async move {
            let Some(url) = input.as_str() else {
                return ConvertResult::Failed {
                    input,
                    error: "url must be a string".to_string(),
                };
            };

            match gofile::convert_to_direct_links(state, url, password, max_results).await {
                Ok(direct_links) => ConvertResult::Links {
                    input,
                    direct_links,
                },
                Err(e) => ConvertResult::Failed {
                    input,
                    error: e.to_string(),
                },
            }
        }
    }))
    .await;

    Json(ConvertResponse {
        status: "ok",
        results,
    })
    .into_response()
}

/// 固定链接（GET）：密码来自 `?password=`
pub async fn convert_fixed_get_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FixedQuery>,
) -> Json<Value> {
    Json(convert_fixed(&state, query.password.as_deref()).await)
}

/// 固定链接（POST）：密码来自 JSON body，body 无效时视为没有密码
pub async fn convert_fixed_post_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<Value> {
    let password = serde_json::from_slice::<Value>(&body)
        .ok()
        .as_ref()
        .and_then(password_from);
    Json(convert_fixed(&state, password.as_deref()).await)
}

/// 并发解析配置里的固定分享，每个链接单独超时，结果按 "1"、"2"… 编号
async fn convert_fixed(state: &AppState, password: Option<&str>) -> Value {
    let web = &state.config.web;
    let limit = Duration::from_secs(web.fixed_timeout_secs);

    info!("📥 转换固定链接: {} 个", web.fixed_shares.len());

    let outcomes = join_all(web.fixed_shares.iter().map(|share| async move {
        let outcome = tokio::time::timeout(
            limit,
            gofile::convert_to_direct_links(state, &share.url, password, web.fixed_max_results),
        )
        .await;

        match outcome {
            Ok(Ok(links)) => json!({
                "label": share.label,
                "direct": links.first(),
                "links": links,
            }),
            Ok(Err(e)) => json!({
                "label": share.label,
                "links": [],
                "direct": null,
                "error": e.to_string(),
            }),
            Err(_) => {
                warn!("⏱️ 固定链接超时: {}", share.label);
                json!({
                    "label": share.label,
                    "links": [],
                    "direct": null,
                    "error": "timeout",
                })
            }
        }
    }))
    .await;

    let results: Map<String, Value> = outcomes
        .into_iter()
        .enumerate()
        .map(|(i, item)| ((i + 1).to_string(), item))
        .collect();

    json!({ "status": "ok", "results": results })
}

/// 创建 Web 路由
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/convert", post(convert_handler))
        .route(
            "/convert_fixed",
            get(convert_fixed_get_handler).post(convert_fixed_post_handler),
        )
        .with_state(state)
}
