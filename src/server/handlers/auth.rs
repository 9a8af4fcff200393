//! OAuth 授权码兑换处理器
//!
//! 浏览器端不能持有 client_secret，由本处理器代替浏览器
//! 与 GitHub 令牌端点通信

use crate::config::CredentialSource;
use crate::error::RelayError;
use crate::oauth::TokenGrant;
use crate::server::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

/// 兑换请求的查询参数
///
/// 只读取 `code`，其余入站字段一律忽略
#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    /// 提供商签发的一次性授权码
    pub code: Option<String>,
}

/// 兑换授权码
///
/// 流程：校验 code → 检查凭据 → 向令牌端点兑换 → 返回白名单字段。
/// 任何失败都由 `RelayError` 的响应映射转成对应状态码，
/// 响应体里永远不会出现 client_secret
pub async fn exchange_code(
    State(state): State<AppState>,
    query: Result<Query<AuthQuery>, QueryRejection>,
) -> Result<Json<TokenGrant>, RelayError> {
    // 查询串缺失、code 为空或整串不可解析都视同未携带 code，
    // 保证错误响应始终是统一的 {error} JSON 格式
    let code = match query {
        Ok(Query(AuthQuery { code: Some(code) })) if !code.is_empty() => code,
        _ => return Err(RelayError::MissingCode),
    };

    let credentials = match &state.config().credentials {
        CredentialSource::Loaded(credentials) => credentials,
        CredentialSource::Missing(missing) => {
            // 部署配置问题，而非客户端错误
            return Err(RelayError::NotConfigured {
                missing: missing.join("/"),
            });
        }
    };

    let grant = state.exchange_client().exchange_code(credentials, &code).await?;

    Ok(Json(grant))
}
