mod test_utils;

use actix_web::{
    body::to_bytes,
    dev::ServiceResponse,
    http::StatusCode,
    middleware::NormalizePath,
    test, App,
};
use portfolio_cms::{
    middlewares::{auth::AuthMiddleware, security_headers::security_headers},
    routes::{configure_routes, json_config, path_config},
};
use serde_json::{json, Value};

use test_utils::offline_state;

macro_rules! offline_app {
    () => {
        test::init_service(
            App::new()
                .app_data(offline_state())
                .app_data(json_config(1024 * 1024))
                .app_data(path_config())
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .wrap(security_headers(false))
                .configure(configure_routes),
        )
        .await
    };
}

async fn body_json(res: ServiceResponse) -> Value {
    let bytes = to_bytes(res.into_body()).await.expect("readable body");
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

#[actix_rt::test]
async fn protected_routes_require_a_token() {
    let app = offline_app!();

    for (method, uri) in [
        ("GET", "/api/bulk/export"),
        ("GET", "/api/experience/admin/all"),
        ("POST", "/api/projects"),
        ("GET", "/api/auth/me"),
        ("DELETE", "/api/certifications/1"),
    ] {
        let req = test::TestRequest::default()
            .method(method.parse().unwrap())
            .uri(uri)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");

        let body = body_json(res).await;
        assert_eq!(body["error"], "Access token required");
    }
}

#[actix_rt::test]
async fn garbage_token_is_rejected_before_touching_the_database() {
    let app = offline_app!();
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["error"], "Invalid token");
}

#[actix_rt::test]
async fn unknown_routes_get_a_json_404() {
    let app = offline_app!();
    let req = test::TestRequest::get().uri("/definitely/not/here").to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await, json!({"error": "Route not found"}));
}

#[actix_rt::test]
async fn malformed_login_body_is_a_json_error() {
    let app = offline_app!();
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"username\": ")
        .to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert!(body["error"].as_str().unwrap().starts_with("JSON payload error"));
}

#[actix_rt::test]
async fn forgot_password_validates_before_lookup() {
    let app = offline_app!();
    let req = test::TestRequest::post()
        .uri("/api/auth/forgot-password")
        .set_json(json!({"email": "nope"}))
        .to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], "email");
}

#[actix_rt::test]
async fn health_reports_an_unreachable_database() {
    let app = offline_app!();
    let req = test::TestRequest::get().uri("/api/health/").to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "testing");
    assert_eq!(body["database"], "Unavailable");
}

#[actix_rt::test]
async fn resume_info_is_public_and_reports_absence() {
    let app = offline_app!();
    let req = test::TestRequest::get().uri("/api/resume/info").to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!({"exists": false}));
}

#[actix_rt::test]
async fn upload_paths_cannot_escape_the_upload_dir() {
    let app = offline_app!();
    let req = test::TestRequest::get().uri("/uploads/..%2Fsettings.rs").to_request();

    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn every_response_disables_content_sniffing() {
    let app = offline_app!();

    for uri in ["/", "/uploads/missing.png", "/api/auth/me", "/api/resume/info"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;

        let headers = res.headers();
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff", "{uri}");
        assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN", "{uri}");
        assert!(headers.contains_key("referrer-policy"), "{uri}");
    }
}
