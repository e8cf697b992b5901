//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::time::Duration;

use domain_provisioner_provider::{CloudflareProvider, ResellerClubRegistrar};
use serde_json::{Value, json};
use wiremock::MockServer;

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const TEST_TOKEN: &str = "cf-test-token";
pub const TEST_ACCOUNT: &str = "acc-123";
pub const TEST_AUTH_USER: &str = "900100";
pub const TEST_API_KEY: &str = "rc-secret-key";

/// 指向 mock server 的 Cloudflare provider
pub fn cloudflare(server: &MockServer) -> CloudflareProvider {
    CloudflareProvider::new(TEST_TOKEN.to_string(), TEST_ACCOUNT.to_string())
        .with_base_url(&server.uri())
}

/// 指向 mock server 的 ResellerClub registrar
pub fn resellerclub(server: &MockServer) -> ResellerClubRegistrar {
    ResellerClubRegistrar::new(
        TEST_AUTH_USER.to_string(),
        TEST_API_KEY.to_string(),
        Duration::from_secs(5),
    )
    .with_base_url(&server.uri())
}

/// Cloudflare 成功信封
pub fn cf_success(result: Value) -> Value {
    json!({ "success": true, "errors": [], "messages": [], "result": result })
}

/// Cloudflare 失败信封
pub fn cf_failure(code: i32, message: &str) -> Value {
    json!({
        "success": false,
        "errors": [{ "code": code, "message": message }],
        "messages": [],
        "result": null
    })
}

/// ResellerClub 错误信封
pub fn rc_error(message: &str) -> Value {
    json!({ "status": "ERROR", "message": message })
}
