//! Upload session: at most one candidate file per category, the remote ids
//! assigned after upload, the terms flag, and the submission phase machine.

use crate::category::Category;
use crate::validate::{validate, FileMeta, FilePolicy, RejectReason};

/// A selected file with its raw content. Replaced wholesale on re-selection.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub meta: FileMeta,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(meta: FileMeta, bytes: Vec<u8>) -> Self {
        Self { meta, bytes }
    }
}

/// Where a submission currently stands. Selection sets the early phases;
/// the orchestrator drives the later ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Selecting,
    Validating,
    Uploading,
    Analyzing,
    Scored,
    Done,
    /// Category-tagged, user-facing message.
    Error(String),
}

/// Per-category slot: what the last `select` left behind.
#[derive(Debug, Clone, Default)]
pub enum Slot {
    #[default]
    Empty,
    Accepted(CandidateFile),
    /// Kept for display; the file itself is discarded.
    Rejected(RejectReason),
}

impl Slot {
    pub fn accepted(&self) -> Option<&CandidateFile> {
        match self {
            Slot::Accepted(f) => Some(f),
            _ => None,
        }
    }
}

/// One page-session's worth of selections. Mutations must not race an
/// in-flight submission: the orchestrator re-checks `is_complete` at submit
/// time, not only when the submit control was enabled.
#[derive(Debug, Default)]
pub struct UploadSession {
    slots: [Slot; 3],
    remote_ids: [Option<String>; 3],
    terms_accepted: bool,
    phase: Phase,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a selection. Last write wins unconditionally;
    /// a rejection clears any previously accepted file for that category.
    /// Once the outcome is recorded the session settles back to `Idle`;
    /// `Selecting`/`Validating` are only ever transient.
    pub fn select(
        &mut self,
        category: Category,
        file: CandidateFile,
        policy: &FilePolicy,
    ) -> Result<(), RejectReason> {
        self.phase = Phase::Validating;
        let outcome = validate(&file.meta, policy);
        self.slots[category.index()] = match &outcome {
            Ok(()) => Slot::Accepted(file),
            Err(reason) => Slot::Rejected(reason.clone()),
        };
        self.phase = Phase::Idle;
        outcome
    }

    pub fn clear(&mut self, category: Category) {
        self.slots[category.index()] = Slot::Empty;
        self.remote_ids[category.index()] = None;
    }

    pub fn slot(&self, category: Category) -> &Slot {
        &self.slots[category.index()]
    }

    pub fn candidate(&self, category: Category) -> Option<&CandidateFile> {
        self.slots[category.index()].accepted()
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    /// Sole submission gate: every category holds an accepted candidate and
    /// the terms flag is set.
    pub fn is_complete(&self) -> bool {
        self.terms_accepted
            && Category::ALL
                .iter()
                .all(|c| self.candidate(*c).is_some())
    }

    pub fn set_remote_id(&mut self, category: Category, id: impl Into<String>) {
        self.remote_ids[category.index()] = Some(id.into());
    }

    pub fn remote_id(&self, category: Category) -> Option<&str> {
        self.remote_ids[category.index()].as_deref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Back to all-absent: slots, remote ids and the terms flag. UI prefs
    /// (theme/accent) live elsewhere and are untouched.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
