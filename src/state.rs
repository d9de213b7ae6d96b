//! 应用状态：HTTP 连接池 + GoFile 凭据缓存

use anyhow::Result;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::config::Config;

/// 进程内缓存的 GoFile 凭据。
///
/// 两个字段各自最多写入一次，写入后在进程生命周期内不再失效。
#[derive(Debug, Default)]
pub struct AuthState {
    pub token: Option<String>,
    pub wt: Option<String>,
}

/// 进程启动时构造一次，以 `&AppState` / `Arc<AppState>` 传给每次解析。
pub struct AppState {
    pub config: Config,
    pub client: Client,
    /// 检查 - 获取 - 写入 token 和 wt 的整个过程都在这把锁里完成
    pub auth: Mutex<AuthState>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        // 与浏览器会话一样保留 Cookie，连接池在所有解析间共享
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(Config::browser_ua())
            .timeout(std::time::Duration::from_secs(
                config.gofile.http_timeout_secs,
            ))
            .build()?;

        Ok(Self {
            config,
            client,
            auth: Mutex::new(AuthState::default()),
        })
    }
}
