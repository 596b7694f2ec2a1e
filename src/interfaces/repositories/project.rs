use async_trait::async_trait;
use sqlx::{types::Json, PgExecutor, PgPool};

use crate::{
    entities::project::{Project, ProjectInsert, UpdateProject},
    errors::AppError,
    repositories::{
        content::{self, UpdateBuilder, LIST_ORDER},
        sqlx_repo::SqlxProjectRepo,
    },
};

pub const PROJECT_TABLE: &str = "projects";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self, active_only: bool) -> Result<Vec<Project>, AppError>;
    async fn list_featured_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn get_project(&self, id: i32, active_only: bool) -> Result<Option<Project>, AppError>;
    async fn create_project(&self, item: &ProjectInsert) -> Result<Project, AppError>;
    async fn update_project(&self, id: i32, patch: &UpdateProject) -> Result<Option<Project>, AppError>;
    async fn delete_project(&self, id: i32) -> Result<bool, AppError>;
    async fn toggle_project_active(&self, id: i32) -> Result<Option<Project>, AppError>;
    async fn toggle_project_featured(&self, id: i32) -> Result<Option<Project>, AppError>;
}

pub async fn insert_project<'e, E>(executor: E, item: &ProjectInsert) -> Result<Project, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (
            name, description, tags, github_url, external_url, image,
            featured, media, sort_order, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&item.name)
    .bind(&item.description)
    .bind(Json(&item.tags))
    .bind(&item.github_url)
    .bind(&item.external_url)
    .bind(&item.image)
    .bind(item.featured)
    .bind(Json(&item.media))
    .bind(item.order)
    .bind(item.is_active)
    .fetch_one(executor)
    .await
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, active_only: bool) -> Result<Vec<Project>, AppError> {
        Ok(content::list_rows(&self.pool, PROJECT_TABLE, active_only).await?)
    }

    async fn list_featured_projects(&self) -> Result<Vec<Project>, AppError> {
        let sql = format!(
            "SELECT * FROM {PROJECT_TABLE} WHERE is_active = TRUE AND featured = TRUE {LIST_ORDER}"
        );
        let projects = sqlx::query_as::<_, Project>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }

    async fn get_project(&self, id: i32, active_only: bool) -> Result<Option<Project>, AppError> {
        Ok(content::get_row(&self.pool, PROJECT_TABLE, id, active_only).await?)
    }

    async fn create_project(&self, item: &ProjectInsert) -> Result<Project, AppError> {
        Ok(insert_project(&self.pool, item).await?)
    }

    async fn update_project(&self, id: i32, patch: &UpdateProject) -> Result<Option<Project>, AppError> {
        let mut update = UpdateBuilder::new(PROJECT_TABLE);
        update
            .required_text("name", &patch.name)
            .required_text("description", &patch.description)
            .list("tags", &patch.tags)
            .text("github_url", &patch.github_url)
            .text("external_url", &patch.external_url)
            .text("image", &patch.image)
            .scalar("featured", &patch.featured)
            .list("media", &patch.media)
            .scalar("sort_order", &patch.order)
            .scalar("is_active", &patch.is_active);

        Ok(update.fetch(&self.pool, id).await?)
    }

    async fn delete_project(&self, id: i32) -> Result<bool, AppError> {
        Ok(content::delete_row(&self.pool, PROJECT_TABLE, id).await?)
    }

    async fn toggle_project_active(&self, id: i32) -> Result<Option<Project>, AppError> {
        Ok(content::toggle_column(&self.pool, PROJECT_TABLE, "is_active", id).await?)
    }

    async fn toggle_project_featured(&self, id: i32) -> Result<Option<Project>, AppError> {
        Ok(content::toggle_column(&self.pool, PROJECT_TABLE, "featured", id).await?)
    }
}
