//! CRUD operations for [`Job`] records.

use rusqlite::params;

use talentflow_shared::{Job, JobPatch, JobStatus, NewJob};

use crate::database::Database;
use crate::error::{Result, StoreError};

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new job, letting SQLite assign the identifier.
    ///
    /// When `new.order` is omitted the job is appended after the current
    /// last sort position.
    pub fn create_job(&self, new: &NewJob) -> Result<Job> {
        let ord = match new.order {
            Some(ord) => ord,
            None => self.conn().query_row(
                "SELECT COALESCE(MAX(ord), 0) + 1 FROM jobs",
                [],
                |row| row.get(0),
            )?,
        };

        let tags_json = serde_json::to_string(&new.tags)?;

        self.conn().execute(
            "INSERT INTO jobs (title, slug, status, tags, ord)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.title, new.slug, new.status.as_str(), tags_json, ord],
        )?;

        let id = self.conn().last_insert_rowid();

        Ok(Job {
            id,
            title: new.title.clone(),
            slug: new.slug.clone(),
            status: new.status,
            tags: new.tags.clone(),
            order: ord,
        })
    }

    /// Insert a job with an explicit identifier. Used by the fixture seeder,
    /// which needs stable ids.
    pub fn insert_job(&self, job: &Job) -> Result<()> {
        let tags_json = serde_json::to_string(&job.tags)?;

        self.conn().execute(
            "INSERT INTO jobs (id, title, slug, status, tags, ord)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                job.id,
                job.title,
                job.slug,
                job.status.as_str(),
                tags_json,
                job.order,
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single job by id.
    pub fn get_job(&self, id: i64) -> Result<Job> {
        self.conn()
            .query_row(
                "SELECT id, title, slug, status, tags, ord
                 FROM jobs
                 WHERE id = ?1",
                params![id],
                row_to_job,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all jobs, ordered by sort position then id.
    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, title, slug, status, tags, ord
             FROM jobs
             ORDER BY ord ASC, id ASC",
        )?;

        let rows = stmt.query_map([], row_to_job)?;

        let mut jobs = Vec::new();
        for row in rows {
            jobs.push(row?);
        }
        Ok(jobs)
    }

    /// Count all jobs.
    pub fn count_jobs(&self) -> Result<i64> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Merge the supplied fields into an existing job and return the merged
    /// record. Fields absent from the patch are left unchanged.
    pub fn update_job(&self, id: i64, patch: &JobPatch) -> Result<Job> {
        let existing = self.get_job(id)?;

        let merged = Job {
            id: existing.id,
            title: patch.title.clone().unwrap_or(existing.title),
            slug: patch.slug.clone().unwrap_or(existing.slug),
            status: patch.status.unwrap_or(existing.status),
            tags: patch.tags.clone().unwrap_or(existing.tags),
            order: patch.order.unwrap_or(existing.order),
        };

        let tags_json = serde_json::to_string(&merged.tags)?;

        self.conn().execute(
            "UPDATE jobs
             SET title = ?1, slug = ?2, status = ?3, tags = ?4, ord = ?5
             WHERE id = ?6",
            params![
                merged.title,
                merged.slug,
                merged.status.as_str(),
                tags_json,
                merged.order,
                id,
            ],
        )?;

        Ok(merged)
    }

    /// Move a job to a new sort position.
    pub fn reorder_job(&self, id: i64, to_order: i64) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE jobs SET ord = ?1 WHERE id = ?2",
            params![to_order, id],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn row_to_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
    let status_str: String = row.get(3)?;
    let tags_json: String = row.get(4)?;

    let status = JobStatus::parse(&status_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        status,
        tags,
        order: row.get(5)?,
    })
}
