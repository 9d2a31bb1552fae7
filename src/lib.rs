// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analyzer;
pub mod api;
pub mod assessment;
pub mod category;
pub mod config;
pub mod indicators;
pub mod prefs;
pub mod report;
pub mod scorer;
pub mod session;
pub mod stage;
pub mod submit;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::assessment::{OverallAssessment, StageResult, ThresholdPolicy, Tier};
pub use crate::category::Category;
pub use crate::config::AppConfig;
pub use crate::session::UploadSession;
pub use crate::submit::{SubmissionOutcome, SubmitError, Submitter};
