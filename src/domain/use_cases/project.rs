use validator::Validate;

use crate::{
    entities::project::{NewProject, Project, UpdateProject},
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::valid_id::valid_id,
};

const NOT_FOUND: &str = "Project not found";

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    pub async fn list_projects(&self, include_inactive: bool) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects(!include_inactive).await
    }

    pub async fn list_featured_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_featured_projects().await
    }

    pub async fn get_project(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        self.project_repo
            .get_project(id, true)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create_project(&self, payload: NewProject) -> Result<Project, AppError> {
        payload.validate()?;
        let insert = payload.prepare_for_insert();

        let project = self.project_repo.create_project(&insert).await?;
        tracing::info!(id = project.id, "Project created");
        Ok(project)
    }

    pub async fn update_project(&self, id: &str, patch: UpdateProject) -> Result<Project, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        patch.validate()?;

        self.project_repo
            .update_project(id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        if !self.project_repo.delete_project(id).await? {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }
        tracing::info!(id, "Project deleted");
        Ok(())
    }

    pub async fn toggle_active(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        self.project_repo
            .toggle_project_active(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn toggle_featured(&self, id: &str) -> Result<Project, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        self.project_repo
            .toggle_project_featured(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }
}
