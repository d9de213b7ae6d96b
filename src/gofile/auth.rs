//! GoFile 凭据：账号 token + global.js 里的 wt
//!
//! 两者都是惰性获取、进程内缓存，获取失败时保持未设置，下次调用重试。

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use super::error::ResolveError;
use super::types::ApiResponse;
use crate::state::AuthState;
use crate::AppState;

/// 一次解析使用的凭据快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub wt: String,
}

/// 确保 token 已获取
pub async fn ensure_token(state: &AppState) -> Result<(), ResolveError> {
    let mut auth = state.auth.lock().await;
    fill_token(state, &mut auth).await.map(|_| ())
}

/// 确保 wt 已获取
pub async fn ensure_secondary_secret(state: &AppState) -> Result<(), ResolveError> {
    let mut auth = state.auth.lock().await;
    fill_wt(state, &mut auth).await.map(|_| ())
}

/// 在同一把锁内依次确保 token 和 wt，返回快照
pub async fn ensure_credentials(state: &AppState) -> Result<Credentials, ResolveError> {
    let mut auth = state.auth.lock().await;
    let token = fill_token(state, &mut auth).await?;
    let wt = fill_wt(state, &mut auth).await?;
    Ok(Credentials { token, wt })
}

async fn fill_token(state: &AppState, auth: &mut AuthState) -> Result<String, ResolveError> {
    if let Some(token) = &auth.token {
        return Ok(token.clone());
    }

    let token = fetch_token(state).await.map_err(|e| {
        error!("❌ 获取 token 失败: {}", e);
        e
    })?;
    info!("✅ 已获取 token (长度: {})", token.len());
    auth.token = Some(token.clone());
    Ok(token)
}

async fn fill_wt(state: &AppState, auth: &mut AuthState) -> Result<String, ResolveError> {
    if let Some(wt) = &auth.wt {
        return Ok(wt.clone());
    }

    let wt = fetch_wt(state).await.map_err(|e| {
        error!("❌ 获取 wt 失败: {}", e);
        e
    })?;
    info!("✅ 已获取 wt (长度: {})", wt.len());
    auth.wt = Some(wt.clone());
    Ok(wt)
}

async fn fetch_token(state: &AppState) -> Result<String, ResolveError> {
    let cfg = &state.config.gofile;
    let url = format!("{}/accounts", cfg.api_base.trim_end_matches('/'));

    debug!("🔑 申请账号 token: {}", url);

    let resp = state
        .client
        .post(&url)
        .timeout(Duration::from_secs(cfg.token_timeout_secs))
        .send()
        .await
        .map_err(|e| ResolveError::Auth(format!("request failed: {}", e)))?;

    let text = resp
        .text()
        .await
        .map_err(|e| ResolveError::Auth(format!("read body failed: {}", e)))?;

    #[derive(Deserialize)]
    struct AccountData {
        #[serde(default)]
        token: String,
    }

    let res: ApiResponse = serde_json::from_str(&text)
        .map_err(|e| ResolveError::Auth(format!("parse accounts response failed: {}", e)))?;

    if res.status != "ok" {
        return Err(ResolveError::Auth(format!(
            "cannot get token: status={}",
            res.status
        )));
    }

    let data: AccountData = serde_json::from_value(res.data)
        .map_err(|e| ResolveError::Auth(format!("parse accounts data failed: {}", e)))?;

    if data.token.is_empty() {
        return Err(ResolveError::Auth("accounts returned empty token".to_string()));
    }

    Ok(data.token)
}

async fn fetch_wt(state: &AppState) -> Result<String, ResolveError> {
    let cfg = &state.config.gofile;
    let url = format!("{}/dist/js/global.js", cfg.site_base.trim_end_matches('/'));

    debug!("📜 获取 global.js: {}", url);

    let js = state
        .client
        .get(&url)
        .timeout(Duration::from_secs(cfg.wt_timeout_secs))
        .send()
        .await
        .map_err(|e| ResolveError::Auth(format!("request failed: {}", e)))?
        .text()
        .await
        .map_err(|e| ResolveError::Auth(format!("read body failed: {}", e)))?;

    extract_wt(&js).ok_or_else(|| ResolveError::Auth("cannot get wt".to_string()))
}

/// 从 global.js 中提取 `appdata.wt = "..."`
pub(crate) fn extract_wt(js: &str) -> Option<String> {
    use regex::Regex;
    use std::sync::OnceLock;

    static WT_RE: OnceLock<Regex> = OnceLock::new();
    let re = WT_RE.get_or_init(|| Regex::new(r#"appdata\.wt\s*=\s*"([^"]*)""#).unwrap());
    re.captures(js)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|wt| !wt.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_wt() {
        let js = r#"var appdata = {};
appdata.apiServer = "api";
appdata.wt = "4fd6sg89d7s6";
appdata.lang = "en";"#;
        assert_eq!(extract_wt(js), Some("4fd6sg89d7s6".to_string()));
    }

    #[test]
    fn test_extract_wt_missing() {
        assert_eq!(extract_wt("appdata.token = \"x\";"), None);
        assert_eq!(extract_wt("appdata.wt = \"\";"), None);
        assert_eq!(extract_wt(""), None);
    }
}
