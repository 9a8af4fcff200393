//! # 配置管理模块
//!
//! 处理应用配置加载、验证和管理。
//! 服务端凭据只从环境变量读取，绝不写入配置文件。

mod relay_config;

pub use relay_config::{CorsConfig, CredentialSource, OAuthConfig, RelayConfig, ServerConfig};

use std::env;
use std::path::Path;

/// 客户端ID环境变量名
pub const ENV_CLIENT_ID: &str = "GITHUB_CLIENT_ID";
/// 客户端密钥环境变量名
pub const ENV_CLIENT_SECRET: &str = "GITHUB_CLIENT_SECRET";

/// 加载配置
///
/// 顺序：TOML 配置文件（可选）→ 环境变量覆盖 → 凭据读取 → 验证。
/// 配置文件路径由 `RELAY_CONFIG` 指定，默认 `config/relay.toml`；
/// 文件不存在时使用内置默认值。
pub fn load_config() -> crate::error::Result<RelayConfig> {
    let config_file = env::var("RELAY_CONFIG").unwrap_or_else(|_| "config/relay.toml".to_string());

    let mut config = if Path::new(&config_file).exists() {
        let config_content = std::fs::read_to_string(&config_file).map_err(|e| {
            crate::error::RelayError::config_with_source(
                format!("failed to read config file: {config_file}"),
                e,
            )
        })?;
        toml::from_str::<RelayConfig>(&config_content)?
    } else {
        RelayConfig::default()
    };

    config.apply_env_overrides(|key| env::var(key).ok())?;
    config.load_credentials(|key| env::var(key).ok());
    config.validate()?;

    Ok(config)
}
