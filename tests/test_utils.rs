#![allow(dead_code)]

use std::{net::TcpListener, path::PathBuf, sync::Arc, time::Duration};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use portfolio_cms::{
    db::postgres::init_store,
    mail::{LogMailer, Mailer},
    middlewares::auth::AuthMiddleware,
    routes::{configure_routes, json_config},
    settings::{AppConfig, AppEnvironment, StorageBackend},
    storage::{FileStorage, LocalStorage},
    AppState,
};
use reqwest::Client;
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio CMS Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgres://127.0.0.1:1/unreachable".to_string()),
        cors_allowed_origins: "*".to_string(),
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".to_string(),
        jwt_expiration_minutes: 60,
        frontend_url: "http://localhost:3000".to_string(),
        storage_backend: StorageBackend::Local,
        upload_dir: scratch_dir("uploads").to_string_lossy().into_owned(),
        upload_max_bytes: 5 * 1024 * 1024,
        resume_max_bytes: 10 * 1024 * 1024,
        json_body_limit: 10 * 1024 * 1024,
        s3_bucket: None,
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        s3_public_base_url: None,
        mail_api_url: None,
        mail_api_key: None,
        mail_from: "no-reply@localhost".to_string(),
        rate_limit_max_requests: 1000,
        rate_limit_window_secs: 900,
        trust_proxy: false,
    }
}

/// Per-process temp directory so parallel test binaries don't share files.
pub fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("portfolio-cms-test-{}-{}", name, std::process::id()))
}

pub fn test_storage(config: &AppConfig) -> Arc<dyn FileStorage> {
    Arc::new(LocalStorage::new(&config.upload_dir))
}

pub fn test_mailer() -> Arc<dyn Mailer> {
    Arc::new(LogMailer)
}

/// State backed by a pool that never connects; enough for requests rejected
/// before any query runs.
pub fn offline_state() -> web::Data<AppState> {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(250))
        .connect_lazy("postgres://127.0.0.1:1/unreachable")
        .expect("lazy pool from a well-formed url");

    web::Data::new(AppState::new(&config, pool, test_storage(&config), test_mailer()))
}

/// A full server on a random port, backed by `TEST_DATABASE_URL`.
pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub client: Client,
    pub config: AppConfig,
}

impl TestApp {
    /// `None` when no test database is configured.
    pub async fn spawn() -> Option<Self> {
        if std::env::var("TEST_DATABASE_URL").is_err() {
            eprintln!("TEST_DATABASE_URL not set; skipping database-backed test");
            return None;
        }

        let config = test_config();
        let db_pool = init_store(&config.database_url)
            .await
            .expect("Failed to initialise test database");

        sqlx::query("TRUNCATE TABLE users, experiences, projects, certifications RESTART IDENTITY CASCADE")
            .execute(&db_pool)
            .await
            .expect("Failed to truncate tables");

        let state = web::Data::new(AppState::new(
            &config,
            db_pool.clone(),
            test_storage(&config),
            test_mailer(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().expect("listener has an address").port();
        let address = format!("http://127.0.0.1:{}", port);

        let json_limit = config.json_body_limit;
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .app_data(json_config(json_limit))
                .wrap(AuthMiddleware)
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to listen")
        .workers(1)
        .run();

        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/api/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Some(TestApp { address, db_pool, client, config })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Bootstraps the admin account and returns its token.
    pub async fn admin_token(&self) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/init"))
            .json(&json!({"username": "owner", "email": "owner@example.com", "password": "owner-pass"}))
            .send()
            .await
            .expect("init request");
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.expect("init body");
        body["token"].as_str().expect("token in init response").to_string()
    }

    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.expect("request sent");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}
