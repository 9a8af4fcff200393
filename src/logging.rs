//! # 日志配置模块
//!
//! 基于 tracing-subscriber 的日志初始化，支持 RUST_LOG 覆盖默认过滤规则

use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化日志系统
///
/// 默认级别为 `info`，本 crate 提升至 `debug`；
/// 设置 `RUST_LOG` 环境变量可完全覆盖默认规则
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let default_filter = format!("{level},oauth_relay=debug,hyper=warn,reqwest=warn");
    let log_filter = env::var("RUST_LOG").unwrap_or(default_filter);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
