//! 配置文件加载

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub gofile: GofileConfig,
    #[serde(default)] // 如果配置文件没有 [web] 就用默认值
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GofileConfig {
    /// API 地址（accounts / contents）
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// 站点地址，global.js 和分享链接 `/d/<id>` 都挂在这里
    #[serde(default = "default_site_base")]
    pub site_base: String,
    #[serde(default = "default_token_timeout_secs")]
    pub token_timeout_secs: u64,
    #[serde(default = "default_wt_timeout_secs")]
    pub wt_timeout_secs: u64,
    #[serde(default = "default_contents_timeout_secs")]
    pub contents_timeout_secs: u64,
    /// 连接池级别的超时上限
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// 目录递归的最大深度
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// /convert 单次最多接受的链接数
    #[serde(default = "default_max_urls")]
    pub max_urls: usize,
    /// /convert 每个链接最多返回的直链数
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_fixed_max_results")]
    pub fixed_max_results: usize,
    /// /convert_fixed 单个链接的超时（秒），超时记为 "timeout"
    #[serde(default = "default_fixed_timeout_secs")]
    pub fixed_timeout_secs: u64,
    #[serde(default = "default_fixed_shares")]
    pub fixed_shares: Vec<FixedShare>,
}

/// /convert_fixed 使用的固定分享
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FixedShare {
    pub label: String,
    pub url: String,
}

impl Default for GofileConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            site_base: default_site_base(),
            token_timeout_secs: default_token_timeout_secs(),
            wt_timeout_secs: default_wt_timeout_secs(),
            contents_timeout_secs: default_contents_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            max_urls: default_max_urls(),
            max_results: default_max_results(),
            fixed_max_results: default_fixed_max_results(),
            fixed_timeout_secs: default_fixed_timeout_secs(),
            fixed_shares: default_fixed_shares(),
        }
    }
}

fn default_api_base() -> String {
    std::env::var("GOFILE_API_BASE").unwrap_or_else(|_| "https://api.gofile.io".to_string())
}

fn default_site_base() -> String {
    std::env::var("GOFILE_SITE_BASE").unwrap_or_else(|_| "https://gofile.io".to_string())
}

fn default_token_timeout_secs() -> u64 {
    6
}

fn default_wt_timeout_secs() -> u64 {
    6
}

fn default_contents_timeout_secs() -> u64 {
    8
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_max_depth() -> usize {
    64
}

fn default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000)
}

fn default_max_urls() -> usize {
    3
}

fn default_max_results() -> usize {
    50
}

fn default_fixed_max_results() -> usize {
    5
}

fn default_fixed_timeout_secs() -> u64 {
    8
}

fn default_fixed_shares() -> Vec<FixedShare> {
    [
        ("Standard", "https://gofile.io/d/en4HXu"),
        ("Enhanced", "https://gofile.io/d/YbiRbg"),
        ("Potato", "https://gofile.io/d/mnaS35"),
    ]
    .into_iter()
    .map(|(label, url)| FixedShare {
        label: label.to_string(),
        url: url.to_string(),
    })
    .collect()
}

impl Config {
    /// 读取 TOML 配置；文件不存在时退回默认值（默认值支持环境变量）
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn browser_ua() -> &'static str {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
    }
}
