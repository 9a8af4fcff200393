//! # Token交换逻辑
//!
//! 实现 OAuth 2.0 授权码到访问令牌的交换流程。
//! 授权码一次性有效，交换失败绝不自动重试——重试同一个码必然再次失败。

use crate::error::{RelayError, Result};
use crate::oauth::types::{ProviderCredentials, TokenGrant, UpstreamTokenResponse};
use serde_json::json;
use std::time::Duration;

/// Token交换客户端
///
/// 持有一个带超时的 reqwest 客户端，进程内共享复用连接池
#[derive(Debug, Clone)]
pub struct TokenExchangeClient {
    http_client: reqwest::Client,
    token_url: String,
}

impl TokenExchangeClient {
    /// 创建新的Token交换客户端
    #[must_use]
    pub fn new(token_url: String, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent("oauth-relay/0.1")
            .build()
            .unwrap_or_default();

        Self {
            http_client: client,
            token_url,
        }
    }

    /// 交换授权码获取访问令牌
    ///
    /// 向令牌端点 POST JSON 请求体 `{client_id, client_secret, code}`，
    /// 并要求 JSON 格式响应
    pub async fn exchange_code(
        &self,
        credentials: &ProviderCredentials,
        code: &str,
    ) -> Result<TokenGrant> {
        let body = json!({
            "client_id": credentials.client_id,
            "client_secret": credentials.client_secret,
            "code": code,
        });

        let response = self
            .http_client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(token_url = %self.token_url, error = %e, "令牌端点请求失败");
                RelayError::transport_with_source("token endpoint request failed", e)
            })?;

        let status = response.status();
        let data = response.text().await.map_err(|e| {
            tracing::error!(%status, error = %e, "读取令牌端点响应失败");
            RelayError::transport_with_source("failed to read token endpoint response", e)
        })?;

        // 上游可能用非 2xx 状态携带标准 {error, error_description} 错误体，
        // 状态码不是判定依据：无论状态先解析 JSON，解析不了才算传输失败
        let parsed = match serde_json::from_str::<UpstreamTokenResponse>(&data) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!(%status, error = %e, "令牌端点响应不是合法JSON");
                return Err(RelayError::transport_with_source(
                    format!("token endpoint answered HTTP {status} with non-JSON body"),
                    e,
                ));
            }
        };

        grant_from_response(parsed)
    }
}

/// 将上游原始响应精炼为兑换结果
///
/// 上游带 `error` 字段视为拒绝；成功时 `token_type` 缺省为 `bearer`，
/// `scope` 等其余字段被有意丢弃（白名单策略）
fn grant_from_response(response: UpstreamTokenResponse) -> Result<TokenGrant> {
    if let Some(error) = response.error {
        tracing::debug!(upstream_error = %error, "上游拒绝了授权码");
        return Err(RelayError::upstream(error, response.error_description));
    }

    let access_token = response
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| RelayError::transport("token endpoint response missing access_token"))?;

    Ok(TokenGrant {
        access_token,
        token_type: response
            .token_type
            .unwrap_or_else(|| "bearer".to_string()),
    })
}
