//! 系统相关处理器

/// Ping处理器 - 存活探测
pub async fn ping_handler() -> &'static str {
    "pong"
}
