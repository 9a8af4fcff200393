//! # OAuth 线格式类型定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 提供商凭据（进程级只读配置）
///
/// 绝不持久化、绝不写入日志、绝不返回给调用方
#[derive(Clone)]
pub struct ProviderCredentials {
    /// OAuth 应用的客户端ID
    pub client_id: String,
    /// OAuth 应用的客户端密钥（保密）
    pub client_secret: String,
}

// 手动实现 Debug，密钥只显示占位符
impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***redacted***")
            .finish()
    }
}

/// 令牌端点原始响应
///
/// GitHub 对成功和失败都返回 HTTP 200，区别只在响应体字段，
/// 因此所有字段都是可选的，由调用方检查 `error` 判定结果
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamTokenResponse {
    /// 访问令牌（成功时出现）
    pub access_token: Option<String>,
    /// 令牌类型，GitHub 可能省略
    pub token_type: Option<String>,
    /// 授权范围（本服务不透传）
    pub scope: Option<String>,
    /// 错误码（失败时出现）
    pub error: Option<String>,
    /// 可读的错误描述
    pub error_description: Option<String>,
}

/// 兑换成功的结果
///
/// 只保留白名单字段：`scope` 等上游附加字段被有意丢弃，
/// 避免把意料之外的内容转发给浏览器
#[derive(Debug, Clone, Serialize)]
pub struct TokenGrant {
    /// 访问令牌
    pub access_token: String,
    /// 令牌类型，上游省略时默认 `bearer`
    pub token_type: String,
}
