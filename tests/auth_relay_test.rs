//! # 授权码兑换端到端测试
//!
//! 用 wiremock 扮演 GitHub 令牌端点，通过 `tower::ServiceExt::oneshot`
//! 直接驱动路由器，覆盖兑换路径的全部可观察行为

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use oauth_relay::config::{ENV_CLIENT_ID, ENV_CLIENT_SECRET, RelayConfig};
use oauth_relay::server::RelayServer;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_CLIENT_ID: &str = "iv1.test-client";
const TEST_CLIENT_SECRET: &str = "test-secret-never-in-responses";
const TOKEN_PATH: &str = "/login/oauth/access_token";

/// 构造指向 mock 上游的配置
fn test_config(mock_server: &MockServer, with_credentials: bool) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.oauth.token_url = format!("{}{TOKEN_PATH}", mock_server.uri());
    config.oauth.request_timeout = 1;
    if with_credentials {
        config.load_credentials(|key| match key {
            ENV_CLIENT_ID => Some(TEST_CLIENT_ID.to_string()),
            ENV_CLIENT_SECRET => Some(TEST_CLIENT_SECRET.to_string()),
            _ => None,
        });
    }
    config
}

fn app(config: RelayConfig) -> Router {
    RelayServer::new(config).expect("服务器构造失败").router()
}

async fn send(router: Router, req_method: Method, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .method(req_method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    // 任何场景下响应体都不能出现 client_secret
    assert!(
        !body.contains(TEST_CLIENT_SECRET),
        "client_secret 泄漏到响应体: {body}"
    );
    (status, headers, body)
}

fn assert_cors_headers(headers: &HeaderMap, expected_origin: &str) {
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        expected_origin
    );
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET,OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type"
    );
}

#[tokio::test]
async fn test_options_preflight_answers_204_with_cors_headers() {
    let mock_server = MockServer::start().await;
    let router = app(test_config(&mock_server, true));

    let (status, headers, body) = send(router, Method::OPTIONS, "/api/auth").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert_cors_headers(&headers, "*");
}

#[tokio::test]
async fn test_missing_code_is_rejected_with_400() {
    let mock_server = MockServer::start().await;
    let router = app(test_config(&mock_server, true));

    for uri in ["/api/auth", "/api/auth?code="] {
        let (status, headers, body) = send(router.clone(), Method::GET, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({"error": "missing code"}));
        assert_cors_headers(&headers, "*");
    }
}

#[tokio::test]
async fn test_unconfigured_server_answers_500_without_upstream_call() {
    let mock_server = MockServer::start().await;
    // 上游绝不能被调用
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let router = app(test_config(&mock_server, false));
    let (status, _headers, body) = send(router, Method::GET, "/api/auth?code=abc123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": "server not configured (missing GITHUB_CLIENT_ID/GITHUB_CLIENT_SECRET)"})
    );
    mock_server.verify().await;
}

#[tokio::test]
async fn test_successful_exchange_returns_allowlisted_fields_only() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("Accept", "application/json"))
        .and(body_json(json!({
            "client_id": TEST_CLIENT_ID,
            "client_secret": TEST_CLIENT_SECRET,
            "code": "good-code",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc",
            "token_type": "bearer",
            "scope": "repo,gist",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let router = app(test_config(&mock_server, true));
    let (status, headers, body) = send(router, Method::GET, "/api/auth?code=good-code").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    // scope 等上游字段被有意丢弃
    assert_eq!(body, json!({"access_token": "abc", "token_type": "bearer"}));
    assert_cors_headers(&headers, "*");
    mock_server.verify().await;
}

#[tokio::test]
async fn test_token_type_defaults_to_bearer_when_upstream_omits_it() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "gho_xyz"})),
        )
        .mount(&mock_server)
        .await;

    let router = app(test_config(&mock_server, true));
    let (status, _headers, body) = send(router, Method::GET, "/api/auth?code=good-code").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"access_token": "gho_xyz", "token_type": "bearer"}));
}

#[tokio::test]
async fn test_upstream_rejection_forwards_description_with_400() {
    let mock_server = MockServer::start().await;
    // GitHub 对错误同样返回 HTTP 200，错误只在响应体里
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired.",
        })))
        .mount(&mock_server)
        .await;

    let router = app(test_config(&mock_server, true));
    let (status, _headers, body) = send(router, Method::GET, "/api/auth?code=stale-code").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": "The code passed is incorrect or expired."})
    );
}

#[tokio::test]
async fn test_non_2xx_upstream_error_body_is_forwarded_as_400() {
    let mock_server = MockServer::start().await;
    // 错误体也可能搭配非 2xx 状态返回，判定依据是响应体而非状态码
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired.",
        })))
        .mount(&mock_server)
        .await;

    let router = app(test_config(&mock_server, true));
    let (status, _headers, body) = send(router, Method::GET, "/api/auth?code=stale-code").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": "The code passed is incorrect or expired."})
    );
}

#[tokio::test]
async fn test_non_2xx_non_json_body_is_internal_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let router = app(test_config(&mock_server, true));
    let (status, _headers, body) = send(router, Method::GET, "/api/auth?code=abc123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"error": "internal_error"}));
}

#[tokio::test]
async fn test_unparseable_query_string_keeps_json_error_shape() {
    let mock_server = MockServer::start().await;
    let router = app(test_config(&mock_server, true));

    // 重复的 code 参数使查询串无法反序列化
    let (status, headers, body) = send(router, Method::GET, "/api/auth?code=a&code=b").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"error": "missing code"}));
    assert_cors_headers(&headers, "*");
}

#[tokio::test]
async fn test_non_json_upstream_body_is_opaque_internal_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html>"))
        .mount(&mock_server)
        .await;

    let router = app(test_config(&mock_server, true));
    let (status, _headers, body) = send(router, Method::GET, "/api/auth?code=abc123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"error": "internal_error"}));
}

#[tokio::test]
async fn test_upstream_timeout_is_opaque_internal_error() {
    let mock_server = MockServer::start().await;
    // 客户端超时设为 1 秒，上游延迟 1.5 秒
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "late"}))
                .set_delay(std::time::Duration::from_millis(1500)),
        )
        .mount(&mock_server)
        .await;

    let router = app(test_config(&mock_server, true));
    let (status, _headers, body) = send(router, Method::GET, "/api/auth?code=abc123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"error": "internal_error"}));
}

#[tokio::test]
async fn test_configured_origin_replaces_wildcard() {
    let mock_server = MockServer::start().await;
    let mut config = test_config(&mock_server, true);
    config.cors.allowed_origin = "https://blog.example.com".to_string();

    let router = app(config);
    let (status, headers, _body) = send(router, Method::OPTIONS, "/api/auth").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_cors_headers(&headers, "https://blog.example.com");
}

#[tokio::test]
async fn test_ping_liveness() {
    let mock_server = MockServer::start().await;
    let router = app(test_config(&mock_server, true));

    let (status, headers, body) = send(router, Method::GET, "/ping").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "pong");
    assert_cors_headers(&headers, "*");
}
