use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, limiter, mail, storage, utils};

use auth::jwt::JwtService;
use mail::Mailer;
use repositories::sqlx_repo::{
    SqlxBulkRepo, SqlxCertificationRepo, SqlxExperienceRepo, SqlxProjectRepo, SqlxUserRepo,
};
use storage::FileStorage;
use use_cases::{
    auth::AuthHandler, bulk::BulkHandler, certification::CertificationHandler,
    experience::ExperienceHandler, project::ProjectHandler, upload::UploadHandler,
};

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;

pub struct AppState {
    pub service_name: String,
    pub environment: String,
    pub auth_handler: AppAuthHandler,
    pub experience_handler: ExperienceHandler<SqlxExperienceRepo>,
    pub project_handler: ProjectHandler<SqlxProjectRepo>,
    pub certification_handler: CertificationHandler<SqlxCertificationRepo>,
    pub bulk_handler: BulkHandler<SqlxBulkRepo>,
    pub upload_handler: UploadHandler,
}

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        pool: sqlx::PgPool,
        storage: Arc<dyn FileStorage>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let jwt_service = JwtService::new(config);
        let auth_handler = AuthHandler::new(
            SqlxUserRepo::new(pool.clone()),
            jwt_service,
            mailer,
            config.frontend_url.clone(),
        );

        AppState {
            service_name: config.name.clone(),
            environment: config.env.to_string(),
            auth_handler,
            experience_handler: ExperienceHandler::new(SqlxExperienceRepo::new(pool.clone())),
            project_handler: ProjectHandler::new(SqlxProjectRepo::new(pool.clone())),
            certification_handler: CertificationHandler::new(SqlxCertificationRepo::new(pool.clone())),
            bulk_handler: BulkHandler::new(SqlxBulkRepo::new(pool)),
            upload_handler: UploadHandler::new(storage, config.upload_max_bytes, config.resume_max_bytes),
        }
    }
}
