//! Web 服务器入口点

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gofile_direct_link::{config::Config, gofile, web, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gofile_direct_link=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 GoFile 直链 Web 服务器启动中...");

    let config_path = std::env::var("CONFIG_PATH")
        .ok()
        .or_else(|| std::env::args().nth(1))
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(&config_path)?;
    if std::path::Path::new(&config_path).exists() {
        tracing::info!("✅ 配置加载完成: {}", config_path);
    } else {
        tracing::info!("✅ 使用默认配置（支持环境变量）");
    }

    let port = config.web.port;
    let state = Arc::new(AppState::new(config)?);

    // 失败时凭据保持为空，由第一次解析重新获取
    match gofile::ensure_credentials(state.as_ref()).await {
        Ok(_) => tracing::info!("🔥 凭据预热完成"),
        Err(e) => tracing::warn!("⚠️ 预热失败: {}", e),
    }

    let app = web::create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("🌐 Web 服务器启动在: http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
