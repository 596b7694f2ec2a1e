use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{certification::Certification, experience::Experience, project::Project};

// ───── Export ─────

#[derive(Debug, Serialize)]
pub struct ExportData {
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KindCounts {
    pub experiences: u64,
    pub projects: u64,
    pub certifications: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_date: DateTime<Utc>,
    pub version: String,
    pub data: ExportData,
    pub counts: KindCounts,
}

impl ExportDocument {
    pub fn file_name(&self) -> String {
        format!("portfolio-export-{}.json", self.export_date.format("%Y-%m-%d"))
    }
}

// ───── Import ─────

/// Items stay untyped until each one is decoded on its own, so a bad item can't sink the batch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub data: serde_json::Value,

    #[serde(default)]
    pub replace_existing: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KindStats {
    pub created: u64,
    pub skipped: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ImportStats {
    pub experiences: KindStats,
    pub projects: KindStats,
    pub certifications: KindStats,
}

impl ImportStats {
    pub fn total_created(&self) -> u64 {
        self.experiences.created + self.projects.created + self.certifications.created
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub message: String,
    pub stats: ImportStats,
    pub total_items: u64,
}

// ───── Clear ─────

#[derive(Debug, Default, Deserialize)]
pub struct ClearRequest {
    #[serde(default)]
    pub confirm: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearReport {
    pub message: String,
    pub deleted_counts: KindCounts,
}
