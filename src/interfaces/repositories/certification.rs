use async_trait::async_trait;
use sqlx::{types::Json, PgExecutor, PgPool};

use crate::{
    entities::certification::{Certification, CertificationInsert, UpdateCertification},
    errors::AppError,
    repositories::{
        content::{self, UpdateBuilder},
        sqlx_repo::SqlxCertificationRepo,
    },
};

pub const CERTIFICATION_TABLE: &str = "certifications";

#[async_trait]
pub trait CertificationRepository: Send + Sync {
    async fn list_certifications(&self, active_only: bool) -> Result<Vec<Certification>, AppError>;
    async fn get_certification(&self, id: i32, active_only: bool) -> Result<Option<Certification>, AppError>;
    async fn create_certification(&self, item: &CertificationInsert) -> Result<Certification, AppError>;
    async fn update_certification(&self, id: i32, patch: &UpdateCertification) -> Result<Option<Certification>, AppError>;
    async fn delete_certification(&self, id: i32) -> Result<bool, AppError>;
    async fn toggle_certification_active(&self, id: i32) -> Result<Option<Certification>, AppError>;
}

pub async fn insert_certification<'e, E>(executor: E, item: &CertificationInsert) -> Result<Certification, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Certification>(
        r#"
        INSERT INTO certifications (
            name, description, logo, external_url, tags, media, sort_order, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&item.name)
    .bind(&item.description)
    .bind(&item.logo)
    .bind(&item.external_url)
    .bind(Json(&item.tags))
    .bind(Json(&item.media))
    .bind(item.order)
    .bind(item.is_active)
    .fetch_one(executor)
    .await
}

impl SqlxCertificationRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxCertificationRepo { pool }
    }
}

#[async_trait]
impl CertificationRepository for SqlxCertificationRepo {
    async fn list_certifications(&self, active_only: bool) -> Result<Vec<Certification>, AppError> {
        Ok(content::list_rows(&self.pool, CERTIFICATION_TABLE, active_only).await?)
    }

    async fn get_certification(&self, id: i32, active_only: bool) -> Result<Option<Certification>, AppError> {
        Ok(content::get_row(&self.pool, CERTIFICATION_TABLE, id, active_only).await?)
    }

    async fn create_certification(&self, item: &CertificationInsert) -> Result<Certification, AppError> {
        Ok(insert_certification(&self.pool, item).await?)
    }

    async fn update_certification(&self, id: i32, patch: &UpdateCertification) -> Result<Option<Certification>, AppError> {
        let mut update = UpdateBuilder::new(CERTIFICATION_TABLE);
        update
            .required_text("name", &patch.name)
            .required_text("description", &patch.description)
            .text("logo", &patch.logo)
            .text("external_url", &patch.external_url)
            .list("tags", &patch.tags)
            .list("media", &patch.media)
            .scalar("sort_order", &patch.order)
            .scalar("is_active", &patch.is_active);

        Ok(update.fetch(&self.pool, id).await?)
    }

    async fn delete_certification(&self, id: i32) -> Result<bool, AppError> {
        Ok(content::delete_row(&self.pool, CERTIFICATION_TABLE, id).await?)
    }

    async fn toggle_certification_active(&self, id: i32) -> Result<Option<Certification>, AppError> {
        Ok(content::toggle_column(&self.pool, CERTIFICATION_TABLE, "is_active", id).await?)
    }
}
