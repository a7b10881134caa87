//! CRUD operations for [`Candidate`] records and their stage history.
//!
//! Every stage a candidate enters is recorded as a `stage_events` row (one at
//! creation, one per stage-changing update), which is what the timeline route
//! serves back.

use chrono::{DateTime, Utc};
use rusqlite::{params, types::ToSql};

use talentflow_shared::constants::DEFAULT_PAGE_SIZE;
use talentflow_shared::{Candidate, CandidatePatch, NewCandidate, Stage, TimelineEvent};

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Filters and pagination for the candidates listing. Filtering is applied
/// before pagination.
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    /// Case-insensitive substring match against name OR email.
    pub search: Option<String>,
    /// Exact stage match.
    pub stage: Option<Stage>,
    /// 1-indexed page number.
    pub page: u32,
    pub page_size: u32,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            search: None,
            stage: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of candidates plus the pre-pagination match count.
#[derive(Debug, Clone)]
pub struct CandidatePage {
    pub data: Vec<Candidate>,
    /// Count of records matching the filters, before pagination.
    pub total: u64,
    /// The 1-indexed page that was returned.
    pub page: u32,
}

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new candidate and record their initial stage event.
    pub fn create_candidate(&mut self, new: &NewCandidate) -> Result<Candidate> {
        let tx = self.conn_mut().transaction()?;

        tx.execute(
            "INSERT INTO candidates (name, email, stage, job_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![new.name, new.email, new.stage.as_str(), new.job_id],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO stage_events (candidate_id, stage, occurred_at)
             VALUES (?1, ?2, ?3)",
            params![id, new.stage.as_str(), Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;

        Ok(Candidate {
            id,
            name: new.name.clone(),
            email: new.email.clone(),
            stage: new.stage,
            job_id: new.job_id,
        })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single candidate by id.
    pub fn get_candidate(&self, id: i64) -> Result<Candidate> {
        self.conn()
            .query_row(
                "SELECT id, name, email, stage, job_id
                 FROM candidates
                 WHERE id = ?1",
                params![id],
                row_to_candidate,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List candidates with optional search/stage filters and pagination.
    ///
    /// `total` counts the post-filter, pre-pagination matches.
    pub fn list_candidates(&self, query: &CandidateQuery) -> Result<CandidatePage> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut filter_values: Vec<String> = Vec::new();

        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search.to_lowercase());
            clauses.push("(LOWER(name) LIKE ? OR LOWER(email) LIKE ?)");
            filter_values.push(pattern.clone());
            filter_values.push(pattern);
        }

        if let Some(stage) = query.stage {
            clauses.push("stage = ?");
            filter_values.push(stage.as_str().to_string());
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let filter_params: Vec<&dyn ToSql> =
            filter_values.iter().map(|v| v as &dyn ToSql).collect();

        let total: i64 = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM candidates{where_sql}"),
            &filter_params[..],
            |row| row.get(0),
        )?;

        let page = query.page.max(1);
        let limit = i64::from(query.page_size);
        let offset = i64::from(page - 1) * limit;

        let mut stmt = self.conn().prepare(&format!(
            "SELECT id, name, email, stage, job_id
             FROM candidates{where_sql}
             ORDER BY id ASC
             LIMIT ? OFFSET ?"
        ))?;

        let mut page_params = filter_params;
        page_params.push(&limit);
        page_params.push(&offset);

        let rows = stmt.query_map(&page_params[..], row_to_candidate)?;

        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }

        Ok(CandidatePage {
            data,
            total: total as u64,
            page,
        })
    }

    /// Count all candidates.
    pub fn count_candidates(&self) -> Result<i64> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))?;
        Ok(count)
    }

    /// The recorded stage history for a candidate, oldest first.
    pub fn candidate_timeline(&self, candidate_id: i64) -> Result<Vec<TimelineEvent>> {
        // The timeline of an unknown candidate is an error, not an empty list.
        self.get_candidate(candidate_id)?;

        let mut stmt = self.conn().prepare(
            "SELECT stage, occurred_at
             FROM stage_events
             WHERE candidate_id = ?1
             ORDER BY occurred_at ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![candidate_id], row_to_timeline_event)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?);
        }
        Ok(events)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Merge the supplied fields into an existing candidate. A stage change
    /// additionally appends a stage event, atomically with the update.
    pub fn update_candidate(&mut self, id: i64, patch: &CandidatePatch) -> Result<Candidate> {
        let tx = self.conn_mut().transaction()?;

        let existing = tx
            .query_row(
                "SELECT id, name, email, stage, job_id
                 FROM candidates
                 WHERE id = ?1",
                params![id],
                row_to_candidate,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })?;

        let merged = Candidate {
            id: existing.id,
            name: patch.name.clone().unwrap_or(existing.name),
            email: patch.email.clone().unwrap_or(existing.email),
            stage: patch.stage.unwrap_or(existing.stage),
            job_id: patch.job_id.or(existing.job_id),
        };

        tx.execute(
            "UPDATE candidates
             SET name = ?1, email = ?2, stage = ?3, job_id = ?4
             WHERE id = ?5",
            params![
                merged.name,
                merged.email,
                merged.stage.as_str(),
                merged.job_id,
                id,
            ],
        )?;

        if merged.stage != existing.stage {
            tx.execute(
                "INSERT INTO stage_events (candidate_id, stage, occurred_at)
                 VALUES (?1, ?2, ?3)",
                params![id, merged.stage.as_str(), Utc::now().to_rfc3339()],
            )?;
        }

        tx.commit()?;
        Ok(merged)
    }
}

fn row_to_candidate(row: &rusqlite::Row<'_>) -> rusqlite::Result<Candidate> {
    let stage_str: String = row.get(3)?;

    let stage = Stage::parse(&stage_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Candidate {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        stage,
        job_id: row.get(4)?,
    })
}

fn row_to_timeline_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<TimelineEvent> {
    let stage_str: String = row.get(0)?;
    let ts_str: String = row.get(1)?;

    let stage = Stage::parse(&stage_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let date: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(TimelineEvent { stage, date })
}
