use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gofile_direct_link::{config::Config, gofile, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志（stdout 只输出直链，日志走 stderr）
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gofile_direct_link=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 用法：gofile-direct-link <share_url> [password] [config_path]
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err(anyhow!(
            "用法: {} <share_url> [password] [config_path]",
            args.first()
                .map(|s| s.as_str())
                .unwrap_or("gofile-direct-link")
        ));
    }

    let share_url = args[1].clone();
    let password = args.get(2).filter(|s| !s.is_empty()).cloned();
    let config_path = std::env::var("CONFIG_PATH")
        .ok()
        .or_else(|| args.get(3).cloned())
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path)?;
    if std::path::Path::new(&config_path).exists() {
        tracing::info!("✅ 配置加载完成: {}", config_path);
    } else {
        tracing::info!("✅ 使用默认配置（支持环境变量）");
    }

    let max_results = config.web.max_results;
    let state = Arc::new(AppState::new(config)?);

    let links = gofile::convert_to_direct_links(
        state.as_ref(),
        &share_url,
        password.as_deref(),
        max_results,
    )
    .await?;

    if links.is_empty() {
        tracing::warn!("⚠️ 没有解析到任何直链: {}", share_url);
    }

    for link in links {
        println!("{}", link);
    }

    Ok(())
}
