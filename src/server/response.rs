//! # API 响应结构
//!
//! 出站 JSON 为扁平结构：成功时 `{access_token, token_type}`，
//! 失败时 `{error: <message>}`，与浏览器端约定保持一致

use crate::error::RelayError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// 标准错误响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// 错误信息
    pub error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // 客户端错误：请求缺少授权码
            Self::MissingCode => (StatusCode::BAD_REQUEST, "missing code".to_string()),
            // 部署错误：凭据未配置，明确指出缺失的变量名
            Self::NotConfigured { missing } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("server not configured (missing {missing})"),
            ),
            // 上游拒绝：优先透传可读描述
            Self::Upstream { error, description } => (
                StatusCode::BAD_REQUEST,
                description.clone().unwrap_or_else(|| error.clone()),
            ),
            // 传输及其余服务端错误：对外只给不透明信息，详情留在日志
            Self::Transport { .. } | Self::Config { .. } | Self::Network { .. } | Self::Io { .. } => {
                tracing::error!(error = ?self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
