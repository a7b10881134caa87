//! v001 -- Initial schema creation.
//!
//! Creates the five core tables: `jobs`, `candidates`, `stage_events`,
//! `assessments`, and `assessment_responses`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Jobs
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS jobs (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    title  TEXT NOT NULL,
    slug   TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',   -- 'active' | 'archived'
    tags   TEXT NOT NULL DEFAULT '[]',       -- JSON array of strings
    ord    INTEGER NOT NULL DEFAULT 0        -- manual sort position (ORDER is a keyword)
);

CREATE INDEX IF NOT EXISTS idx_jobs_ord ON jobs(ord);

-- ----------------------------------------------------------------
-- Candidates
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS candidates (
    id     INTEGER PRIMARY KEY AUTOINCREMENT,
    name   TEXT NOT NULL,
    email  TEXT NOT NULL,
    stage  TEXT NOT NULL DEFAULT 'applied',
    job_id INTEGER,                          -- nullable FK -> jobs(id)

    FOREIGN KEY (job_id) REFERENCES jobs(id)
);

CREATE INDEX IF NOT EXISTS idx_candidates_stage ON candidates(stage);

-- ----------------------------------------------------------------
-- Stage events (timeline source)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS stage_events (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    candidate_id INTEGER NOT NULL,           -- FK -> candidates(id)
    stage        TEXT NOT NULL,
    occurred_at  TEXT NOT NULL,              -- ISO-8601 / RFC-3339

    FOREIGN KEY (candidate_id) REFERENCES candidates(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_stage_events_candidate
    ON stage_events(candidate_id, occurred_at);

-- ----------------------------------------------------------------
-- Assessments (one per job)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS assessments (
    job_id   INTEGER PRIMARY KEY NOT NULL,   -- natural key
    sections TEXT NOT NULL DEFAULT '[]'      -- JSON array of sections
);

-- ----------------------------------------------------------------
-- Assessment responses (append-only)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS assessment_responses (
    id           TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    job_id       INTEGER NOT NULL,
    candidate_id INTEGER NOT NULL,
    responses    TEXT NOT NULL,              -- JSON: question id -> answer
    submitted_at TEXT NOT NULL               -- ISO-8601
);

CREATE INDEX IF NOT EXISTS idx_responses_job ON assessment_responses(job_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
