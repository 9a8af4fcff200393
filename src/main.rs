//! # OAuth Relay 主程序
//!
//! GitHub OAuth 授权码兑换中继服务

use oauth_relay::{Result, config, logging, server::RelayServer};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    logging::init_logging(None);

    // 加载配置（文件 + 环境变量）
    let config = config::load_config()?;

    // 凭据缺失不阻止启动：处理器会对每个请求返回部署错误提示
    if !config.credentials.is_loaded() {
        tracing::warn!(
            "provider credentials not configured, set {} and {}",
            config::ENV_CLIENT_ID,
            config::ENV_CLIENT_SECRET
        );
    }

    // 启动服务
    let server = RelayServer::new(config)?;
    if let Err(e) = server.serve().await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }

    Ok(())
}
