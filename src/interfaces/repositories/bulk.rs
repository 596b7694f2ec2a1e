use async_trait::async_trait;
use sqlx::{Acquire, PgPool, Postgres, Transaction};

use crate::{
    entities::{
        bulk::{ExportData, KindCounts},
        certification::CertificationInsert,
        experience::ExperienceInsert,
        project::ProjectInsert,
    },
    errors::AppError,
    repositories::{
        certification::{insert_certification, CERTIFICATION_TABLE},
        content,
        experience::{insert_experience, EXPERIENCE_TABLE},
        project::{insert_project, PROJECT_TABLE},
        sqlx_repo::SqlxBulkRepo,
    },
};

#[async_trait]
pub trait BulkRepository: Send + Sync {
    /// Every record of every kind, inactive included, in list order.
    async fn export_all(&self) -> Result<ExportData, AppError>;

    /// Opens the import transaction, wiping existing content first when `replace_existing`.
    async fn begin_import(&self, replace_existing: bool) -> Result<Box<dyn ImportSink>, AppError>;

    async fn clear_all(&self) -> Result<KindCounts, AppError>;
}

/// One open import. Each insert is isolated so a failure leaves earlier rows intact;
/// nothing is visible until `commit`.
#[async_trait]
pub trait ImportSink: Send {
    async fn insert_experience(&mut self, item: &ExperienceInsert) -> Result<(), AppError>;
    async fn insert_project(&mut self, item: &ProjectInsert) -> Result<(), AppError>;
    async fn insert_certification(&mut self, item: &CertificationInsert) -> Result<(), AppError>;
    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

impl SqlxBulkRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBulkRepo { pool }
    }
}

async fn delete_content(tx: &mut Transaction<'static, Postgres>) -> Result<KindCounts, sqlx::Error> {
    let experiences = content::delete_all(&mut **tx, EXPERIENCE_TABLE).await?;
    let projects = content::delete_all(&mut **tx, PROJECT_TABLE).await?;
    let certifications = content::delete_all(&mut **tx, CERTIFICATION_TABLE).await?;

    Ok(KindCounts { experiences, projects, certifications })
}

#[async_trait]
impl BulkRepository for SqlxBulkRepo {
    async fn export_all(&self) -> Result<ExportData, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let experiences = content::list_rows(&mut *tx, EXPERIENCE_TABLE, false).await?;
        let projects = content::list_rows(&mut *tx, PROJECT_TABLE, false).await?;
        let certifications = content::list_rows(&mut *tx, CERTIFICATION_TABLE, false).await?;
        tx.commit().await?;

        Ok(ExportData { experiences, projects, certifications })
    }

    async fn begin_import(&self, replace_existing: bool) -> Result<Box<dyn ImportSink>, AppError> {
        let mut tx = self.pool.begin().await?;

        if replace_existing {
            let removed = delete_content(&mut tx).await?;
            tracing::info!(
                experiences = removed.experiences,
                projects = removed.projects,
                certifications = removed.certifications,
                "Cleared existing content before import"
            );
        }

        Ok(Box::new(PgImportSink { tx }))
    }

    async fn clear_all(&self) -> Result<KindCounts, AppError> {
        let mut tx = self.pool.begin().await?;
        let counts = delete_content(&mut tx).await?;
        tx.commit().await?;

        Ok(counts)
    }
}

pub struct PgImportSink {
    tx: Transaction<'static, Postgres>,
}

/// Runs `$insert` inside a savepoint on `$tx`, rolling the savepoint back on failure.
macro_rules! in_savepoint {
    ($tx:expr, $insert:ident, $item:expr) => {{
        let mut savepoint = (&mut $tx).begin().await?;
        match $insert(&mut *savepoint, $item).await {
            Ok(_) => {
                savepoint.commit().await?;
                Ok(())
            }
            Err(e) => {
                savepoint.rollback().await?;
                Err(AppError::from(e))
            }
        }
    }};
}

#[async_trait]
impl ImportSink for PgImportSink {
    async fn insert_experience(&mut self, item: &ExperienceInsert) -> Result<(), AppError> {
        in_savepoint!(self.tx, insert_experience, item)
    }

    async fn insert_project(&mut self, item: &ProjectInsert) -> Result<(), AppError> {
        in_savepoint!(self.tx, insert_project, item)
    }

    async fn insert_certification(&mut self, item: &CertificationInsert) -> Result<(), AppError> {
        in_savepoint!(self.tx, insert_certification, item)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
