use validator::Validate;

use crate::{
    entities::certification::{Certification, NewCertification, UpdateCertification},
    errors::AppError,
    repositories::certification::CertificationRepository,
    utils::valid_id::valid_id,
};

const NOT_FOUND: &str = "Certification not found";

pub struct CertificationHandler<R>
where
    R: CertificationRepository,
{
    pub certification_repo: R,
}

impl<R> CertificationHandler<R>
where
    R: CertificationRepository,
{
    pub fn new(certification_repo: R) -> Self {
        CertificationHandler { certification_repo }
    }

    pub async fn list_certifications(&self, include_inactive: bool) -> Result<Vec<Certification>, AppError> {
        self.certification_repo.list_certifications(!include_inactive).await
    }

    pub async fn get_certification(&self, id: &str) -> Result<Certification, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        self.certification_repo
            .get_certification(id, true)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create_certification(&self, payload: NewCertification) -> Result<Certification, AppError> {
        payload.validate()?;
        let insert = payload.prepare_for_insert();

        let certification = self.certification_repo.create_certification(&insert).await?;
        tracing::info!(id = certification.id, "Certification created");
        Ok(certification)
    }

    pub async fn update_certification(
        &self,
        id: &str,
        patch: UpdateCertification,
    ) -> Result<Certification, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        patch.validate()?;

        self.certification_repo
            .update_certification(id, &patch)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn delete_certification(&self, id: &str) -> Result<(), AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        if !self.certification_repo.delete_certification(id).await? {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }
        tracing::info!(id, "Certification deleted");
        Ok(())
    }

    pub async fn toggle_active(&self, id: &str) -> Result<Certification, AppError> {
        let id = valid_id(id, NOT_FOUND)?;
        self.certification_repo
            .toggle_certification_active(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }
}
