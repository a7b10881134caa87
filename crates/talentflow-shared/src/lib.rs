//! # talentflow-shared
//!
//! Domain vocabulary shared by the record store and the simulated API:
//! entity structs, the fixed enumerations (pipeline stage, job status,
//! question kind), and the patch shapes used by partial updates.
//!
//! Everything here crosses the simulated wire as JSON, so all types are
//! serde-serializable with the camelCase field names the web client
//! consumes.

pub mod constants;
pub mod error;
pub mod types;

pub use error::InvalidValue;
pub use types::*;
