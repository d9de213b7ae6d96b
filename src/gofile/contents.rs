//! contents 接口：每个内容节点一次请求

use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info};

use super::auth::Credentials;
use super::error::ResolveError;
use super::types::{ApiResponse, ContentNode};
use crate::AppState;

/// 密码摘要：有密码时为 SHA-256 十六进制，没有密码时为空串
///
/// 接口靠空串区分“没有密码”和“密码错误”。
pub fn password_digest(password: Option<&str>) -> String {
    match password {
        Some(pwd) => format!("{:x}", Sha256::digest(pwd.as_bytes())),
        None => String::new(),
    }
}

/// 查询单个内容节点
///
/// 只处理传输层和 status 字段；passwordStatus 由调用方判断。
pub async fn fetch_content(
    state: &AppState,
    creds: &Credentials,
    content_id: &str,
    password_hash: &str,
) -> Result<ContentNode, ResolveError> {
    let cfg = &state.config.gofile;
    let url = format!(
        "{}/contents/{}?wt={}&cache=true&password={}",
        cfg.api_base.trim_end_matches('/'),
        urlencoding::encode(content_id),
        urlencoding::encode(&creds.wt),
        password_hash
    );

    debug!("📡 调用 contents API: content_id={}", content_id);

    let resp = state
        .client
        .get(&url)
        .bearer_auth(&creds.token)
        .timeout(Duration::from_secs(cfg.contents_timeout_secs))
        .send()
        .await?;

    let http_status = resp.status();
    let text = resp.text().await?;

    debug!(
        "📨 contents 响应 (status={}): {}",
        http_status,
        text.chars().take(300).collect::<String>()
    );

    let res: ApiResponse = serde_json::from_str(&text).map_err(|e| {
        ResolveError::Transport(format!(
            "parse contents response failed: {} (http status={})",
            e, http_status
        ))
    })?;

    info!(
        "📋 contents API status={} content_id={}",
        res.status, content_id
    );

    if res.status != "ok" {
        return Err(ResolveError::Remote(res.status));
    }

    serde_json::from_value(res.data)
        .map_err(|e| ResolveError::Transport(format!("parse contents data failed: {}", e)))
}
