//! Domain model structs and enumerations for the hiring pipeline.
//!
//! Wire shapes match what the web client consumes: camelCase field names,
//! lowercase stage/status values, kebab-case question kinds.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InvalidValue;

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// Publication status of a job posting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Archived,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Result<Self, InvalidValue> {
        match value {
            "active" => Ok(JobStatus::Active),
            "archived" => Ok(JobStatus::Archived),
            other => Err(InvalidValue::new("job status", other)),
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Active
    }
}

/// A job posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Auto-assigned identifier, immutable after creation.
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub status: JobStatus,
    /// Ordered tag list, e.g. `["remote", "full-time"]`.
    pub tags: Vec<String>,
    /// Manual sort position. Not required to be unique.
    pub order: i64,
}

/// Body of `POST /api/jobs`. The identifier is always server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Sort position; when omitted the store appends after the current last.
    #[serde(default)]
    pub order: Option<i64>,
}

/// Body of `PATCH /api/jobs/:id`. Merge semantics: only supplied fields
/// change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub order: Option<i64>,
}

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// Position of a candidate in the hiring pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Stage; 6] = [
        Stage::Applied,
        Stage::Screen,
        Stage::Tech,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Applied => "applied",
            Stage::Screen => "screen",
            Stage::Tech => "tech",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Result<Self, InvalidValue> {
        match value {
            "applied" => Ok(Stage::Applied),
            "screen" => Ok(Stage::Screen),
            "tech" => Ok(Stage::Tech),
            "offer" => Ok(Stage::Offer),
            "hired" => Ok(Stage::Hired),
            "rejected" => Ok(Stage::Rejected),
            other => Err(InvalidValue::new("stage", other)),
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Applied
    }
}

/// A person moving through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Auto-assigned identifier.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub stage: Stage,
    /// The job this candidate applied to, if any.
    pub job_id: Option<i64>,
}

/// Body of `POST /api/candidates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub job_id: Option<i64>,
}

/// Body of `PATCH /api/candidates/:id`. Merge semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CandidatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub job_id: Option<i64>,
}

/// One recorded stage transition, as returned by the timeline route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub stage: Stage,
    pub date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Kind of a single assessment question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    ShortText,
    LongText,
    SingleChoice,
    MultiChoice,
    Numeric,
    File,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::ShortText => "short-text",
            QuestionKind::LongText => "long-text",
            QuestionKind::SingleChoice => "single-choice",
            QuestionKind::MultiChoice => "multi-choice",
            QuestionKind::Numeric => "numeric",
            QuestionKind::File => "file",
        }
    }
}

/// A single question inside an assessment section.
///
/// The optional fields are kind-specific: `options` for choice kinds,
/// `min`/`max` for numeric, `max_length` for short text. Absent fields are
/// omitted from the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// An ordered group of questions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub questions: Vec<Question>,
}

/// The per-job questionnaire. At most one exists per job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub job_id: i64,
    pub sections: Vec<Section>,
}

/// One submitted set of answers. Immutable once inserted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    /// Server-assigned identifier.
    pub id: Uuid,
    pub job_id: i64,
    pub candidate_id: i64,
    /// question id → answer, answers are free-form JSON.
    pub responses: BTreeMap<String, serde_json::Value>,
    /// Server-assigned submission time.
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::parse(stage.as_str()).unwrap(), stage);
        }
        assert!(Stage::parse("interviewing").is_err());
    }

    #[test]
    fn question_kind_wire_names() {
        let json = serde_json::to_string(&QuestionKind::ShortText).unwrap();
        assert_eq!(json, "\"short-text\"");
        let parsed: QuestionKind = serde_json::from_str("\"multi-choice\"").unwrap();
        assert_eq!(parsed, QuestionKind::MultiChoice);
    }

    #[test]
    fn candidate_serializes_camel_case() {
        let candidate = Candidate {
            id: 7,
            name: "Candidate 7".into(),
            email: "candidate7@mail.com".into(),
            stage: Stage::Screen,
            job_id: Some(2),
        };
        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["jobId"], 2);
        assert_eq!(value["stage"], "screen");
    }

    #[test]
    fn job_patch_rejects_unknown_fields() {
        let result: Result<JobPatch, _> =
            serde_json::from_str(r#"{"title": "x", "salary": 100}"#);
        assert!(result.is_err());
    }

    #[test]
    fn question_omits_absent_fields() {
        let question = Question {
            id: "q2".into(),
            kind: QuestionKind::File,
            text: "Upload your resume".into(),
            options: None,
            min: None,
            max: None,
            max_length: None,
            required: None,
        };
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "file");
        assert!(value.get("options").is_none());
        assert!(value.get("maxLength").is_none());
    }
}
