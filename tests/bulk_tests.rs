use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use portfolio_cms::{
    entities::{
        bulk::{ClearRequest, ExportData, ImportRequest, KindCounts},
        certification::CertificationInsert,
        experience::{Experience, ExperienceInsert},
        project::ProjectInsert,
    },
    errors::AppError,
    repositories::bulk::{BulkRepository, ImportSink},
    use_cases::bulk::BulkHandler,
};
use serde_json::json;
use sqlx::types::Json;

/// Everything the fake database has seen.
#[derive(Default)]
struct Recorded {
    experiences: Vec<ExperienceInsert>,
    projects: Vec<ProjectInsert>,
    certifications: Vec<CertificationInsert>,
    replaced: bool,
    committed: bool,
    cleared: bool,
}

#[derive(Clone, Default)]
struct InMemoryBulkRepo {
    recorded: Arc<Mutex<Recorded>>,
}

struct InMemorySink {
    recorded: Arc<Mutex<Recorded>>,
}

#[async_trait]
impl ImportSink for InMemorySink {
    async fn insert_experience(&mut self, item: &ExperienceInsert) -> Result<(), AppError> {
        // Stands in for a constraint violation raised by the database.
        if item.company == "REJECTED BY DB" {
            return Err(AppError::InternalError("check constraint violated".into()));
        }
        self.recorded.lock().unwrap().experiences.push(item.clone());
        Ok(())
    }

    async fn insert_project(&mut self, item: &ProjectInsert) -> Result<(), AppError> {
        self.recorded.lock().unwrap().projects.push(item.clone());
        Ok(())
    }

    async fn insert_certification(&mut self, item: &CertificationInsert) -> Result<(), AppError> {
        self.recorded.lock().unwrap().certifications.push(item.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.recorded.lock().unwrap().committed = true;
        Ok(())
    }
}

#[async_trait]
impl BulkRepository for InMemoryBulkRepo {
    async fn export_all(&self) -> Result<ExportData, AppError> {
        let now = Utc::now();
        let experience = |id: i32, active: bool| Experience {
            id,
            company: format!("Company {id}"),
            title: "Engineer".into(),
            dates: "2020-2021".into(),
            logo: None,
            bullets: Json(vec![]),
            media: Json(vec![]),
            tags: Json(vec!["rust".into()]),
            order: 0,
            is_active: active,
            created_at: now,
            updated_at: now,
        };

        Ok(ExportData {
            experiences: vec![experience(1, true), experience(2, false)],
            projects: vec![],
            certifications: vec![],
        })
    }

    async fn begin_import(&self, replace_existing: bool) -> Result<Box<dyn ImportSink>, AppError> {
        self.recorded.lock().unwrap().replaced = replace_existing;
        Ok(Box::new(InMemorySink { recorded: self.recorded.clone() }))
    }

    async fn clear_all(&self) -> Result<KindCounts, AppError> {
        self.recorded.lock().unwrap().cleared = true;
        Ok(KindCounts { experiences: 2, projects: 1, certifications: 0 })
    }
}

fn handler() -> (BulkHandler<InMemoryBulkRepo>, Arc<Mutex<Recorded>>) {
    let repo = InMemoryBulkRepo::default();
    let recorded = repo.recorded.clone();
    (BulkHandler::new(repo), recorded)
}

#[actix_rt::test]
async fn one_good_and_one_malformed_experience() {
    let (bulk, recorded) = handler();
    let request = ImportRequest {
        data: json!({
            "experiences": [
                {"id": 5, "company": "Acme", "title": "Eng", "dates": "2020-2021", "createdAt": "2020-01-01"},
                {"company": "", "title": "Eng"}
            ],
            "projects": [],
            "certifications": []
        }),
        replace_existing: false,
    };

    let report = bulk.import(request).await.unwrap();

    assert_eq!(report.message, "Import completed");
    assert_eq!(report.stats.experiences.created, 1);
    assert_eq!(report.stats.experiences.errors, 1);
    assert_eq!(report.stats.experiences.skipped, 0);
    assert_eq!(report.total_items, 1);

    let recorded = recorded.lock().unwrap();
    assert!(recorded.committed);
    assert!(!recorded.replaced);
    assert_eq!(recorded.experiences.len(), 1);
    assert_eq!(recorded.experiences[0].company, "Acme");
}

#[actix_rt::test]
async fn database_failures_are_counted_and_the_batch_continues() {
    let (bulk, recorded) = handler();
    let request = ImportRequest {
        data: json!({
            "experiences": [
                {"company": "REJECTED BY DB", "title": "Eng", "dates": "2019"},
                {"company": "Globex", "title": "Lead", "dates": "2021", "tags": null}
            ],
            "projects": [
                {"name": "CMS", "description": "Portfolio backend", "featured": true},
                "not an object"
            ],
            "certifications": [
                {"name": "CKA", "description": "Kubernetes admin"}
            ]
        }),
        replace_existing: true,
    };

    let report = bulk.import(request).await.unwrap();

    assert_eq!(report.stats.experiences.created, 1);
    assert_eq!(report.stats.experiences.errors, 1);
    assert_eq!(report.stats.projects.created, 1);
    assert_eq!(report.stats.projects.errors, 1);
    assert_eq!(report.stats.certifications.created, 1);
    assert_eq!(report.total_items, 3);

    let recorded = recorded.lock().unwrap();
    assert!(recorded.replaced);
    assert!(recorded.experiences[0].tags.is_empty());
    assert!(recorded.projects[0].featured);
}

#[actix_rt::test]
async fn wrong_shape_touches_nothing() {
    let (bulk, recorded) = handler();
    let request = ImportRequest {
        data: json!({"experiences": [], "projects": {}}),
        replace_existing: true,
    };

    let err = bulk.import(request).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(msg) if msg == "Invalid import data format"));

    let recorded = recorded.lock().unwrap();
    assert!(!recorded.replaced);
    assert!(!recorded.committed);
}

#[actix_rt::test]
async fn clear_requires_the_exact_confirmation() {
    let (bulk, recorded) = handler();

    for request in [
        None,
        Some(ClearRequest { confirm: None }),
        Some(ClearRequest { confirm: Some("delete_all_data".into()) }),
    ] {
        let err = bulk.clear(request).await.unwrap_err();
        assert!(matches!(err, AppError::ConfirmationRequired));
    }
    assert!(!recorded.lock().unwrap().cleared);

    let report = bulk
        .clear(Some(ClearRequest { confirm: Some("DELETE_ALL_DATA".into()) }))
        .await
        .unwrap();
    assert_eq!(report.message, "All portfolio data cleared successfully");
    assert_eq!(report.deleted_counts.experiences, 2);
    assert!(recorded.lock().unwrap().cleared);
}

#[actix_rt::test]
async fn export_counts_every_record() {
    let (bulk, _) = handler();
    let document = bulk.export().await.unwrap();

    assert_eq!(document.version, "1.0");
    assert_eq!(document.counts.experiences, 2);
    assert!(document.file_name().starts_with("portfolio-export-"));

    let json = serde_json::to_value(&document).unwrap();
    assert_eq!(json["data"]["experiences"][1]["isActive"], false);
    assert_eq!(json["data"]["experiences"][0]["tags"], json!(["rust"]));
    assert!(json.get("exportDate").is_some());
}
