//! # OAuth Code Exchange Relay 核心库
//!
//! 服务端中继：接收浏览器回传的 GitHub OAuth 授权码，
//! 使用保密的 client_secret 换取访问令牌后返回给调用方

pub mod config;
pub mod error;
pub mod logging;
pub mod oauth;
pub mod server;

// Re-export commonly used types
pub use config::RelayConfig;
pub use error::{RelayError, Result};
