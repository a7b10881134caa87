//! CRUD operations for [`Assessment`] records and submitted responses.
//!
//! Assessments are keyed by job id: at most one questionnaire exists per
//! job, and saves are upserts. Responses are append-only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use talentflow_shared::{Assessment, AssessmentResponse, Section};

use crate::database::Database;
use crate::error::Result;

impl Database {
    // ------------------------------------------------------------------
    // Assessments
    // ------------------------------------------------------------------

    /// Fetch the assessment for a job, if one has been saved.
    pub fn get_assessment(&self, job_id: i64) -> Result<Option<Assessment>> {
        let row: Option<String> = self
            .conn()
            .query_row(
                "SELECT sections FROM assessments WHERE job_id = ?1",
                params![job_id],
                |row| row.get(0),
            )
            .optional()?;

        match row {
            Some(sections_json) => {
                let sections: Vec<Section> = serde_json::from_str(&sections_json)?;
                Ok(Some(Assessment { job_id, sections }))
            }
            None => Ok(None),
        }
    }

    /// Create or replace the assessment for a job. The per-job count stays
    /// at one either way.
    pub fn upsert_assessment(&self, job_id: i64, sections: &[Section]) -> Result<Assessment> {
        let sections_json = serde_json::to_string(sections)?;

        self.conn().execute(
            "INSERT INTO assessments (job_id, sections)
             VALUES (?1, ?2)
             ON CONFLICT(job_id) DO UPDATE SET sections = excluded.sections",
            params![job_id, sections_json],
        )?;

        Ok(Assessment {
            job_id,
            sections: sections.to_vec(),
        })
    }

    /// Number of stored assessments for a job (0 or 1).
    pub fn assessment_count(&self, job_id: i64) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM assessments WHERE job_id = ?1",
            params![job_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Responses
    // ------------------------------------------------------------------

    /// Append a submitted response.
    pub fn insert_response(&self, response: &AssessmentResponse) -> Result<()> {
        let responses_json = serde_json::to_string(&response.responses)?;

        self.conn().execute(
            "INSERT INTO assessment_responses (id, job_id, candidate_id, responses, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                response.id.to_string(),
                response.job_id,
                response.candidate_id,
                responses_json,
                response.submitted_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All responses submitted for a job, oldest first.
    pub fn list_responses_for_job(&self, job_id: i64) -> Result<Vec<AssessmentResponse>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, job_id, candidate_id, responses, submitted_at
             FROM assessment_responses
             WHERE job_id = ?1
             ORDER BY submitted_at ASC",
        )?;

        let rows = stmt.query_map(params![job_id], row_to_response)?;

        let mut responses = Vec::new();
        for row in rows {
            responses.push(row?);
        }
        Ok(responses)
    }
}

fn row_to_response(row: &rusqlite::Row<'_>) -> rusqlite::Result<AssessmentResponse> {
    let id_str: String = row.get(0)?;
    let responses_json: String = row.get(3)?;
    let ts_str: String = row.get(4)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let responses: BTreeMap<String, serde_json::Value> = serde_json::from_str(&responses_json)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let submitted_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(AssessmentResponse {
        id,
        job_id: row.get(1)?,
        candidate_id: row.get(2)?,
        responses,
        submitted_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentflow_shared::{Question, QuestionKind};

    fn quiz_sections() -> Vec<Section> {
        vec![Section {
            title: "General Questions".to_string(),
            questions: vec![Question {
                id: "q1".to_string(),
                kind: QuestionKind::SingleChoice,
                text: "Do you have 3+ years of experience?".to_string(),
                options: Some(vec!["Yes".to_string(), "No".to_string()]),
                min: None,
                max: None,
                max_length: None,
                required: Some(true),
            }],
        }]
    }

    #[test]
    fn missing_assessment_reads_as_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_assessment(1).unwrap().is_none());
    }

    #[test]
    fn upsert_updates_in_place() {
        let db = Database::open_in_memory().unwrap();

        db.upsert_assessment(1, &quiz_sections()).unwrap();
        assert_eq!(db.assessment_count(1).unwrap(), 1);

        let mut replaced = quiz_sections();
        replaced[0].title = "Technical Quiz".to_string();
        db.upsert_assessment(1, &replaced).unwrap();

        // still one row, now carrying the replacement
        assert_eq!(db.assessment_count(1).unwrap(), 1);
        let stored = db.get_assessment(1).unwrap().unwrap();
        assert_eq!(stored.sections[0].title, "Technical Quiz");
    }

    #[test]
    fn responses_round_trip() {
        let db = Database::open_in_memory().unwrap();

        let mut answers = BTreeMap::new();
        answers.insert("q1".to_string(), serde_json::json!("Yes"));
        let response = AssessmentResponse {
            id: Uuid::new_v4(),
            job_id: 1,
            candidate_id: 42,
            responses: answers,
            submitted_at: Utc::now(),
        };

        db.insert_response(&response).unwrap();

        let stored = db.list_responses_for_job(1).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, response.id);
        assert_eq!(stored[0].candidate_id, 42);
        assert_eq!(stored[0].responses["q1"], serde_json::json!("Yes"));
    }
}
