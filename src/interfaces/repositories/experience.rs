use async_trait::async_trait;
use sqlx::{types::Json, PgExecutor, PgPool};

use crate::{
    entities::experience::{Experience, ExperienceInsert, UpdateExperience},
    errors::AppError,
    repositories::{
        content::{self, UpdateBuilder},
        sqlx_repo::SqlxExperienceRepo,
    },
};

pub const EXPERIENCE_TABLE: &str = "experiences";

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    async fn list_experiences(&self, active_only: bool) -> Result<Vec<Experience>, AppError>;
    async fn get_experience(&self, id: i32, active_only: bool) -> Result<Option<Experience>, AppError>;
    async fn create_experience(&self, item: &ExperienceInsert) -> Result<Experience, AppError>;
    async fn update_experience(&self, id: i32, patch: &UpdateExperience) -> Result<Option<Experience>, AppError>;
    async fn delete_experience(&self, id: i32) -> Result<bool, AppError>;
    async fn toggle_experience_active(&self, id: i32) -> Result<Option<Experience>, AppError>;
}

/// Shared by the CRUD path and bulk import, which runs it inside a savepoint.
pub async fn insert_experience<'e, E>(executor: E, item: &ExperienceInsert) -> Result<Experience, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Experience>(
        r#"
        INSERT INTO experiences (
            company, title, dates, logo, bullets, media, tags, sort_order, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&item.company)
    .bind(&item.title)
    .bind(&item.dates)
    .bind(&item.logo)
    .bind(Json(&item.bullets))
    .bind(Json(&item.media))
    .bind(Json(&item.tags))
    .bind(item.order)
    .bind(item.is_active)
    .fetch_one(executor)
    .await
}

impl SqlxExperienceRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxExperienceRepo { pool }
    }
}

#[async_trait]
impl ExperienceRepository for SqlxExperienceRepo {
    async fn list_experiences(&self, active_only: bool) -> Result<Vec<Experience>, AppError> {
        Ok(content::list_rows(&self.pool, EXPERIENCE_TABLE, active_only).await?)
    }

    async fn get_experience(&self, id: i32, active_only: bool) -> Result<Option<Experience>, AppError> {
        Ok(content::get_row(&self.pool, EXPERIENCE_TABLE, id, active_only).await?)
    }

    async fn create_experience(&self, item: &ExperienceInsert) -> Result<Experience, AppError> {
        Ok(insert_experience(&self.pool, item).await?)
    }

    async fn update_experience(&self, id: i32, patch: &UpdateExperience) -> Result<Option<Experience>, AppError> {
        let mut update = UpdateBuilder::new(EXPERIENCE_TABLE);
        update
            .required_text("company", &patch.company)
            .required_text("title", &patch.title)
            .required_text("dates", &patch.dates)
            .text("logo", &patch.logo)
            .list("bullets", &patch.bullets)
            .list("media", &patch.media)
            .list("tags", &patch.tags)
            .scalar("sort_order", &patch.order)
            .scalar("is_active", &patch.is_active);

        Ok(update.fetch(&self.pool, id).await?)
    }

    async fn delete_experience(&self, id: i32) -> Result<bool, AppError> {
        Ok(content::delete_row(&self.pool, EXPERIENCE_TABLE, id).await?)
    }

    async fn toggle_experience_active(&self, id: i32) -> Result<Option<Experience>, AppError> {
        Ok(content::toggle_column(&self.pool, EXPERIENCE_TABLE, "is_active", id).await?)
    }
}
