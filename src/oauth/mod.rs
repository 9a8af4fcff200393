//! # OAuth 模块
//!
//! 授权码换取访问令牌的客户端与线格式类型

pub mod token_exchange;
pub mod types;

pub use token_exchange::TokenExchangeClient;
pub use types::{ProviderCredentials, TokenGrant, UpstreamTokenResponse};
