//! # talentflow-store
//!
//! The record store backing the simulated hiring API, built on SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed CRUD helpers for every domain
//! model. The default database is in-memory and dies with the process; a
//! file path can be used for persistence.

pub mod assessments;
pub mod candidates;
pub mod database;
pub mod jobs;
pub mod migrations;

mod error;

pub use candidates::{CandidatePage, CandidateQuery};
pub use database::Database;
pub use error::StoreError;
