//! End-to-end scenarios against a real Postgres. Set `TEST_DATABASE_URL` to run them;
//! they truncate every table first. All steps share one test so they never race.

mod test_utils;

use reqwest::Method;
use serde_json::{json, Value};

use test_utils::TestApp;

#[actix_rt::test]
async fn portfolio_lifecycle() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    init_runs_once(&app).await;
    let token = login(&app).await;

    experience_crud(&app, &token).await;
    patch_semantics_and_toggles(&app, &token).await;
    featured_projects(&app, &token).await;
    non_admin_is_forbidden(&app, &token).await;
    import_export_roundtrip(&app, &token).await;
    reset_token_is_single_use(&app).await;
}

async fn init_runs_once(app: &TestApp) {
    app.admin_token().await;

    let (status, body) = app.send_json(Method::POST, "/api/auth/init", None, None).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Users already exist");
}

async fn login(app: &TestApp) -> String {
    let (status, _) = app
        .send_json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "owner", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, 401);

    let (status, body) = app
        .send_json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "owner@example.com", "password": "owner-pass"})),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["user"]["role"], "admin");
    body["token"].as_str().unwrap().to_string()
}

async fn experience_crud(app: &TestApp, token: &str) {
    let (status, body) = app
        .send_json(Method::POST, "/api/experience", Some(token), Some(json!({"company": " "})))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Validation failed");

    let (status, created) = app
        .send_json(
            Method::POST,
            "/api/experience",
            Some(token),
            Some(json!({"company": "Acme", "title": "Eng", "dates": "2020-2021", "tags": null})),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(created["tags"], json!([]));
    assert_eq!(created["bullets"], json!([]));
    let id = created["id"].as_i64().unwrap();

    let (_, list) = app.send_json(Method::GET, "/api/experience", None, None).await;
    assert!(list.as_array().unwrap().iter().any(|e| e["id"] == id));

    let (status, _) = app.send_json(Method::GET, "/api/experience/not-a-number", None, None).await;
    assert_eq!(status, 404);

    let path = format!("/api/experience/{id}");
    let (status, body) = app.send_json(Method::DELETE, &path, Some(token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Experience deleted successfully");

    let (status, body) = app.send_json(Method::GET, &path, None, None).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Experience not found");
}

async fn patch_semantics_and_toggles(app: &TestApp, token: &str) {
    let (_, created) = app
        .send_json(
            Method::POST,
            "/api/certifications",
            Some(token),
            Some(json!({
                "name": "CKA",
                "description": "Kubernetes",
                "logo": "/uploads/cka.png",
                "tags": ["k8s"],
                "order": 2
            })),
        )
        .await;
    let id = created["id"].as_i64().unwrap();
    let path = format!("/api/certifications/{id}");

    let (status, body) = app
        .send_json(Method::PUT, &path, Some(token), Some(json!({"description": "CKAD"})))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["errors"].as_array().unwrap().iter().any(|e| e["field"] == "name"));

    let (status, updated) = app
        .send_json(
            Method::PUT,
            &path,
            Some(token),
            Some(json!({"name": "CKA", "logo": null, "tags": null, "description": "CKAD"})),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["logo"], Value::Null);
    assert_eq!(updated["tags"], json!([]));
    assert_eq!(updated["name"], "CKA");
    assert_eq!(updated["description"], "CKAD");
    assert_eq!(updated["order"], 2);

    let toggle = format!("{path}/toggle");
    let (_, hidden) = app.send_json(Method::PATCH, &toggle, Some(token), None).await;
    assert_eq!(hidden["isActive"], false);

    let (_, public) = app.send_json(Method::GET, "/api/certifications", None, None).await;
    assert!(public.as_array().unwrap().iter().all(|c| c["id"] != id));
    let (_, all) = app.send_json(Method::GET, "/api/certifications/admin/all", Some(token), None).await;
    assert!(all.as_array().unwrap().iter().any(|c| c["id"] == id));

    let (_, restored) = app.send_json(Method::PATCH, &toggle, Some(token), None).await;
    assert_eq!(restored["isActive"], true);

    let (status, _) = app.send_json(Method::PATCH, "/api/certifications/999999/toggle", Some(token), None).await;
    assert_eq!(status, 404);
}

async fn featured_projects(app: &TestApp, token: &str) {
    let (_, project) = app
        .send_json(
            Method::POST,
            "/api/projects",
            Some(token),
            Some(json!({"name": "CMS", "description": "This API"})),
        )
        .await;
    assert_eq!(project["featured"], false);
    let id = project["id"].as_i64().unwrap();

    let (_, featured) = app.send_json(Method::GET, "/api/projects/featured", None, None).await;
    assert!(featured.as_array().unwrap().is_empty());

    let (_, toggled) = app
        .send_json(Method::PATCH, &format!("/api/projects/{id}/featured"), Some(token), None)
        .await;
    assert_eq!(toggled["featured"], true);

    let (_, featured) = app.send_json(Method::GET, "/api/projects/featured", None, None).await;
    assert_eq!(featured.as_array().unwrap().len(), 1);
}

async fn non_admin_is_forbidden(app: &TestApp, token: &str) {
    let (status, _) = app
        .send_json(
            Method::POST,
            "/api/auth/register",
            Some(token),
            Some(json!({"username": "viewer", "email": "viewer@example.com", "password": "viewer-pass", "role": "user"})),
        )
        .await;
    assert_eq!(status, 201);

    let (status, _) = app
        .send_json(
            Method::POST,
            "/api/auth/register",
            Some(token),
            Some(json!({"username": "viewer", "email": "other@example.com", "password": "viewer-pass"})),
        )
        .await;
    assert_eq!(status, 400);

    let (_, body) = app
        .send_json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "viewer", "password": "viewer-pass"})),
        )
        .await;
    let viewer = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.send_json(Method::GET, "/api/auth/me", Some(&viewer), None).await;
    assert_eq!(status, 200);
    assert_eq!(me["user"]["username"], "viewer");

    let (status, body) = app.send_json(Method::GET, "/api/bulk/export", Some(&viewer), None).await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "Admin access required");

    let (status, _) = app
        .send_json(Method::DELETE, "/api/auth/users/by-username/viewer", Some(token), None)
        .await;
    assert_eq!(status, 200);

    let (status, _) = app.send_json(Method::GET, "/api/auth/me", Some(&viewer), None).await;
    assert_eq!(status, 401);
}

async fn import_export_roundtrip(app: &TestApp, token: &str) {
    let data = json!({
        "experiences": [
            {"company": "Acme", "title": "Eng", "dates": "2020-2021", "isActive": false},
            {"company": "Globex", "title": "Lead", "dates": "2022"},
            {"title": "missing company"}
        ],
        "projects": [{"name": "CMS", "description": "API", "featured": true}],
        "certifications": []
    });

    let (status, report) = app
        .send_json(
            Method::POST,
            "/api/bulk/import",
            Some(token),
            Some(json!({"data": data, "replaceExisting": true})),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(report["stats"]["experiences"], json!({"created": 2, "skipped": 0, "errors": 1}));
    assert_eq!(report["totalItems"], 3);

    let response = app
        .client
        .get(app.url("/api/bulk/export"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("portfolio-export-"));

    let export: Value = response.json().await.unwrap();
    assert_eq!(export["counts"], json!({"experiences": 2, "projects": 1, "certifications": 0}));

    let (status, _) = app
        .send_json(Method::POST, "/api/bulk/clear", Some(token), Some(json!({"confirm": "yes"})))
        .await;
    assert_eq!(status, 400);

    let (status, cleared) = app
        .send_json(Method::POST, "/api/bulk/clear", Some(token), Some(json!({"confirm": "DELETE_ALL_DATA"})))
        .await;
    assert_eq!(status, 200);
    assert_eq!(cleared["deletedCounts"]["experiences"], 2);
    assert_eq!(cleared["message"], "All portfolio data cleared successfully");

    let (_, all) = app.send_json(Method::GET, "/api/experience/admin/all", Some(token), None).await;
    assert!(all.as_array().unwrap().is_empty());
}

async fn reset_token_is_single_use(app: &TestApp) {
    let (status, _) = app
        .send_json(
            Method::POST,
            "/api/auth/forgot-password",
            None,
            Some(json!({"email": "owner@example.com"})),
        )
        .await;
    assert_eq!(status, 200);

    let token: String = sqlx::query_scalar("SELECT reset_password_token FROM users WHERE username = 'owner'")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();

    let body = json!({"token": token, "password": "brand-new-pass"});
    let (status, _) = app
        .send_json(Method::POST, "/api/auth/reset-password", None, Some(body.clone()))
        .await;
    assert_eq!(status, 200);

    let (status, error) = app
        .send_json(Method::POST, "/api/auth/reset-password", None, Some(body))
        .await;
    assert_eq!(status, 400);
    assert_eq!(error["error"], "Invalid or expired reset token");

    let (status, _) = app
        .send_json(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"username": "owner", "password": "brand-new-pass"})),
        )
        .await;
    assert_eq!(status, 200);
}
