use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use crate::{
    constants::{CLEAR_CONFIRMATION, EXPORT_FORMAT_VERSION},
    entities::{
        bulk::{ClearReport, ClearRequest, ExportDocument, ImportReport, ImportRequest, ImportStats, KindCounts, KindStats},
        certification::{CertificationInsert, NewCertification},
        experience::{ExperienceInsert, NewExperience},
        project::{NewProject, ProjectInsert},
    },
    errors::AppError,
    repositories::bulk::{BulkRepository, ImportSink},
};

/// Keys a previous export carries that must not be written back.
const SERVER_MANAGED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

enum PreparedItem {
    Experience(ExperienceInsert),
    Project(ProjectInsert),
    Certification(CertificationInsert),
}

trait ImportPayload: DeserializeOwned + Validate {
    fn prepare(self) -> PreparedItem;
}

impl ImportPayload for NewExperience {
    fn prepare(self) -> PreparedItem {
        PreparedItem::Experience(self.prepare_for_insert())
    }
}

impl ImportPayload for NewProject {
    fn prepare(self) -> PreparedItem {
        PreparedItem::Project(self.prepare_for_insert())
    }
}

impl ImportPayload for NewCertification {
    fn prepare(self) -> PreparedItem {
        PreparedItem::Certification(self.prepare_for_insert())
    }
}

fn decode_item<P: ImportPayload>(mut item: Value) -> Result<PreparedItem, AppError> {
    let Some(object) = item.as_object_mut() else {
        return Err(AppError::BadRequest("Import item is not an object".into()));
    };
    for key in SERVER_MANAGED_KEYS {
        object.remove(key);
    }

    let payload: P = serde_json::from_value(item)
        .map_err(|e| AppError::BadRequest(format!("Malformed import item: {}", e)))?;
    payload.validate()?;
    Ok(payload.prepare())
}

async fn insert_prepared(sink: &mut dyn ImportSink, item: PreparedItem) -> Result<(), AppError> {
    match item {
        PreparedItem::Experience(insert) => sink.insert_experience(&insert).await,
        PreparedItem::Project(insert) => sink.insert_project(&insert).await,
        PreparedItem::Certification(insert) => sink.insert_certification(&insert).await,
    }
}

/// Imports one kind item by item; failures are counted, never raised.
async fn import_kind<P: ImportPayload>(sink: &mut dyn ImportSink, kind: &str, items: &[Value]) -> KindStats {
    let mut stats = KindStats::default();

    for (index, item) in items.iter().enumerate() {
        let outcome = match decode_item::<P>(item.clone()) {
            Ok(prepared) => insert_prepared(sink, prepared).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => stats.created += 1,
            Err(e) => {
                tracing::warn!(kind, index, "Skipping import item: {}", e);
                stats.errors += 1;
            }
        }
    }

    stats
}

fn array_field<'a>(data: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    data.get(key).and_then(Value::as_array)
}

pub struct BulkHandler<R>
where
    R: BulkRepository,
{
    pub bulk_repo: R,
}

impl<R> BulkHandler<R>
where
    R: BulkRepository,
{
    pub fn new(bulk_repo: R) -> Self {
        BulkHandler { bulk_repo }
    }

    pub async fn export(&self) -> Result<ExportDocument, AppError> {
        let data = self.bulk_repo.export_all().await?;
        let counts = KindCounts {
            experiences: data.experiences.len() as u64,
            projects: data.projects.len() as u64,
            certifications: data.certifications.len() as u64,
        };

        tracing::info!(?counts, "Portfolio data exported");
        Ok(ExportDocument {
            export_date: Utc::now(),
            version: EXPORT_FORMAT_VERSION.to_string(),
            data,
            counts,
        })
    }

    /// Best effort: every item that decodes, validates and inserts is kept, the rest are
    /// counted as errors. The whole batch still shares one transaction.
    pub async fn import(&self, request: ImportRequest) -> Result<ImportReport, AppError> {
        let data = &request.data;
        let (Some(experiences), Some(projects), Some(certifications)) = (
            array_field(data, "experiences"),
            array_field(data, "projects"),
            array_field(data, "certifications"),
        ) else {
            return Err(AppError::BadRequest("Invalid import data format".into()));
        };

        let mut sink = self.bulk_repo.begin_import(request.replace_existing).await?;

        let stats = ImportStats {
            experiences: import_kind::<NewExperience>(sink.as_mut(), "experiences", experiences).await,
            projects: import_kind::<NewProject>(sink.as_mut(), "projects", projects).await,
            certifications: import_kind::<NewCertification>(sink.as_mut(), "certifications", certifications).await,
        };

        sink.commit().await?;

        tracing::info!(
            replace_existing = request.replace_existing,
            created = stats.total_created(),
            "Import completed"
        );
        Ok(ImportReport {
            message: "Import completed".to_string(),
            total_items: stats.total_created(),
            stats,
        })
    }

    /// Deletes every content record. A missing body counts as unconfirmed.
    pub async fn clear(&self, request: Option<ClearRequest>) -> Result<ClearReport, AppError> {
        let confirmed = request
            .and_then(|r| r.confirm)
            .is_some_and(|c| c == CLEAR_CONFIRMATION);
        if !confirmed {
            return Err(AppError::ConfirmationRequired);
        }

        let deleted_counts = self.bulk_repo.clear_all().await?;
        tracing::warn!(?deleted_counts, "All portfolio content cleared");

        Ok(ClearReport {
            message: "All portfolio data cleared successfully".to_string(),
            deleted_counts,
        })
    }
}
