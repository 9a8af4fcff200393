//! # 错误类型定义

use super::ErrorCategory;
use thiserror::Error;

/// 应用主要错误类型
///
/// 请求路径上的四类错误（缺少参数、未配置、上游拒绝、传输失败）
/// 与进程启动阶段的配置/网络/IO错误统一在此定义
#[derive(Debug, Error)]
pub enum RelayError {
    /// 请求缺少 code 参数
    #[error("missing code")]
    MissingCode,

    /// 凭据未配置（部署问题，而非客户端错误）
    #[error("server not configured (missing {missing})")]
    NotConfigured {
        /// 缺失的环境变量名称
        missing: String,
    },

    /// 上游身份提供商拒绝了授权码（过期、无效或已使用）
    #[error("upstream rejected code: {error}")]
    Upstream {
        /// 上游返回的错误码
        error: String,
        /// 上游返回的可读描述（优先透传给调用方）
        description: Option<String>,
    },

    /// 与上游通信失败（网络、超时、响应不是JSON）
    /// 详情只记录在服务端日志，不暴露给调用方
    #[error("transport error: {message}")]
    Transport {
        /// 失败描述
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 配置相关错误
    #[error("config error: {message}")]
    Config {
        /// 失败描述
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 网络监听错误
    #[error("network error: {message}")]
    Network {
        /// 失败描述
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO相关错误
    #[error("io error: {message}")]
    Io {
        /// 失败描述
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl RelayError {
    /// 创建上游错误
    pub fn upstream<T: Into<String>>(error: T, description: Option<String>) -> Self {
        Self::Upstream {
            error: error.into(),
            description,
        }
    }

    /// 创建传输错误
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的传输错误
    pub fn transport_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建网络错误
    pub fn network<T: Into<String>>(message: T) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// 错误分类（用于监控与告警）
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCode | Self::Upstream { .. } => ErrorCategory::Client,
            Self::NotConfigured { .. }
            | Self::Transport { .. }
            | Self::Config { .. }
            | Self::Network { .. }
            | Self::Io { .. } => ErrorCategory::Server,
        }
    }
}

impl From<std::io::Error> for RelayError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
            source,
        }
    }
}

impl From<toml::de::Error> for RelayError {
    fn from(source: toml::de::Error) -> Self {
        Self::config_with_source("invalid TOML configuration", source)
    }
}
