//! # 应用配置结构定义

use super::{ENV_CLIENT_ID, ENV_CLIENT_SECRET};
use crate::error::{RelayError, Result};
use crate::oauth::ProviderCredentials;
use serde::{Deserialize, Serialize};
use url::Url;

/// GitHub 令牌端点（固定上游）
pub const DEFAULT_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// HTTP 服务器配置
    pub server: ServerConfig,
    /// CORS 配置
    pub cors: CorsConfig,
    /// OAuth 上游配置
    pub oauth: OAuthConfig,
    /// 提供商凭据（只来自环境变量，serde 跳过，避免密钥落盘）
    #[serde(skip)]
    pub credentials: CredentialSource,
}

/// HTTP 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许的跨域来源，`*` 表示任意来源
    /// 生产环境建议改为具体站点，例如 `https://example.github.io`
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
        }
    }
}

/// OAuth 上游配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// 令牌端点URL
    pub token_url: String,
    /// 出站请求超时时间（秒）
    pub request_timeout: u64,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_timeout: 30,
        }
    }
}

/// 凭据来源状态
///
/// 凭据缺失不会阻止进程启动：按规格要求由处理器对每个请求
/// 返回 500 部署错误提示，因此这里记录缺了哪些变量名
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// 已从环境变量读取
    Loaded(ProviderCredentials),
    /// 未配置，记录缺失的环境变量名
    Missing(Vec<String>),
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Missing(vec![
            ENV_CLIENT_ID.to_string(),
            ENV_CLIENT_SECRET.to_string(),
        ])
    }
}

impl CredentialSource {
    /// 凭据是否可用
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cors: CorsConfig::default(),
            oauth: OAuthConfig::default(),
            credentials: CredentialSource::default(),
        }
    }
}

impl RelayConfig {
    /// 应用环境变量覆盖
    ///
    /// `RELAY_BIND_ADDRESS` / `RELAY_PORT` / `RELAY_ALLOWED_ORIGIN`
    /// 优先于配置文件中的同名项
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_address) = lookup("RELAY_BIND_ADDRESS") {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = lookup("RELAY_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| RelayError::config_with_source(format!("invalid RELAY_PORT: {port}"), e))?;
        }
        if let Some(origin) = lookup("RELAY_ALLOWED_ORIGIN") {
            self.cors.allowed_origin = origin;
        }
        Ok(())
    }

    /// 从环境读取提供商凭据
    ///
    /// 空字符串视同未设置；缺失时不报错，只记录缺失的变量名
    pub fn load_credentials<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup(ENV_CLIENT_ID).filter(|v| !v.is_empty());
        let client_secret = lookup(ENV_CLIENT_SECRET).filter(|v| !v.is_empty());

        self.credentials = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => {
                CredentialSource::Loaded(ProviderCredentials {
                    client_id,
                    client_secret,
                })
            }
            (id, secret) => {
                let mut missing = Vec::new();
                if id.is_none() {
                    missing.push(ENV_CLIENT_ID.to_string());
                }
                if secret.is_none() {
                    missing.push(ENV_CLIENT_SECRET.to_string());
                }
                CredentialSource::Missing(missing)
            }
        };
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(RelayError::config("server port cannot be 0"));
        }

        if self.cors.allowed_origin != "*" {
            Url::parse(&self.cors.allowed_origin).map_err(|e| {
                RelayError::config_with_source(
                    format!("invalid allowed_origin: {}", self.cors.allowed_origin),
                    e,
                )
            })?;
        }

        let token_url = Url::parse(&self.oauth.token_url).map_err(|e| {
            RelayError::config_with_source(
                format!("invalid token_url: {}", self.oauth.token_url),
                e,
            )
        })?;
        if !matches!(token_url.scheme(), "http" | "https") {
            return Err(RelayError::config(format!(
                "token_url must be http(s): {}",
                self.oauth.token_url
            )));
        }

        if self.oauth.request_timeout == 0 {
            return Err(RelayError::config("request_timeout must be greater than 0"));
        }

        Ok(())
    }
}
