use validator::Validate;

use crate::{
    entities::experience::{Experience, NewExperience, UpdateExperience},
    errors::AppError,
    repositories::experience::ExperienceRepository,
    utils::valid_id::valid_id,
};

const NOT_FOUND: &str = "Experience not found";

pub struct ExperienceHandler<R>
where
    R: ExperienceRepository,
{
    pub experience_repo: R,
}

impl<R> ExperienceHandler<R>
where
    R: ExperienceRepository,
{
    pub fn new(experience_repo: R) -> Self {
        ExperienceHandler { experience_repo }
    }

    /// Active entries for the public site; admins see everything.
    pub async fn list_experiences(&self, include_inactive: bool) -> Result<Vec<Experience>, AppError> {
        self.experience_repo.list_experiences(!include_inactive).await
    }

    pub async fn get_experience(&self, id: &str) -> Result<Experience, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        self.experience_repo
            .get_experience(id, true)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create_experience(&self, payload: NewExperience) -> Result<Experience, AppError> {
        payload.validate()?;
        let insert = payload.prepare_for_insert();

        let experience = self.experience_repo.create_experience(&insert).await?;
        tracing::info!(id = experience.id, "Experience created");
        Ok(experience)
    }

    pub async fn update_experience(&self, id: &str, patch: UpdateExperience) -> Result<Experience, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        patch.validate()?;

        self.experience_repo
            .update_experience(id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn delete_experience(&self, id: &str) -> Result<(), AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        if !self.experience_repo.delete_experience(id).await? {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }
        tracing::info!(id, "Experience deleted");
        Ok(())
    }

    pub async fn toggle_active(&self, id: &str) -> Result<Experience, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        self.experience_repo
            .toggle_experience_active(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }
}
