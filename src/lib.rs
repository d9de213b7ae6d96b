//! GoFile 分享链接转直链

pub mod config;
pub mod gofile;
pub mod state;
pub mod web;

pub use config::Config;
pub use state::AppState;

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
