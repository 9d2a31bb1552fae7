//! Submission orchestrator: the only component with externally observable
//! side effects. Re-checks session completeness, pushes the binary
//! candidates to the remote store, decodes the text candidate inline, drives
//! the stage runner and aggregates the score.

use std::time::Duration;

use thiserror::Error;

use crate::analyzer::{build_analyzer, StageEvidence};
use crate::assessment::{OverallAssessment, StageResult, ThresholdPolicy};
use crate::category::Category;
use crate::config::{AnalyzerMode, AppConfig, RemoteConfig};
use crate::scorer::score;
use crate::session::{CandidateFile, Phase, UploadSession};
use crate::stage::StageRunner;

/// How a remote call went wrong. Transport, explicit server failure and
/// malformed bodies are distinguished here even though the rendered message
/// stays short and generic.
#[derive(Debug, Error)]
pub enum RemoteFailure {
    #[error("Network error while uploading")]
    Transport(#[source] reqwest::Error),
    #[error("Server error: {0}")]
    HttpStatus(u16),
    #[error("Unknown server response")]
    ServerReported(String),
    #[error("Unknown server response")]
    Malformed,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The completeness gate failed at submit time (a slot was cleared or
    /// the terms flag dropped between enabling submit and clicking it).
    #[error("Submission incomplete: three accepted files and accepted terms are required")]
    Incomplete,
    #[error("{category}: {failure}")]
    Upload {
        category: Category,
        failure: RemoteFailure,
    },
    #[error("Failed to read text file")]
    TextDecode(#[source] std::string::FromUtf8Error),
}

/// Everything the results view needs: per-category results in pipeline
/// order plus the aggregated assessment.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub results: Vec<StageResult>,
    pub overall: OverallAssessment,
}

/// Success shape of the remote store: `{"status":"success","filename":...}`.
#[derive(Debug, serde::Deserialize)]
struct UploadResponse {
    status: String,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct Submitter {
    http: reqwest::Client,
    remote: RemoteConfig,
    runner: StageRunner,
    thresholds: ThresholdPolicy,
}

impl Submitter {
    pub fn from_config(config: &AppConfig) -> Self {
        let analyzer = build_analyzer(config);
        let runner = StageRunner::new(analyzer, config.analysis.clone());
        Self::with_runner(config, runner)
    }

    /// Injection point for tests: a scripted runner with a test clock.
    pub fn with_runner(config: &AppConfig, runner: StageRunner) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("insureguard-analyzer/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            http,
            remote: config.remote.clone(),
            runner,
            thresholds: config.analysis.thresholds,
        }
    }

    /// End-to-end flow: uploads (remote mode only) → stage run → score.
    /// The first upload failure aborts before any analysis; the session is
    /// left in `Phase::Error` with a category-tagged message.
    pub async fn submit(
        &self,
        session: &mut UploadSession,
    ) -> Result<SubmissionOutcome, SubmitError> {
        // Completeness is re-checked here, not only when the submit control
        // was enabled; selection mutations must not race an in-flight submit.
        if !session.is_complete() {
            session.set_phase(Phase::Error("Submission incomplete".to_string()));
            return Err(SubmitError::Incomplete);
        }

        if self.remote.mode == AnalyzerMode::Remote {
            session.set_phase(Phase::Uploading);
            for category in Category::ALL.into_iter().filter(|c| c.is_binary()) {
                let file = session
                    .candidate(category)
                    .cloned()
                    .ok_or(SubmitError::Incomplete)?;
                match self.upload(category, &file).await {
                    Ok(remote_id) => {
                        tracing::info!(%category, %remote_id, "stored on remote");
                        session.set_remote_id(category, remote_id);
                    }
                    Err(failure) => {
                        let err = SubmitError::Upload { category, failure };
                        session.set_phase(Phase::Error(err.to_string()));
                        return Err(err);
                    }
                }
            }
        }

        // Text travels inline, never through the store.
        let text_file = session
            .candidate(Category::Text)
            .cloned()
            .ok_or(SubmitError::Incomplete)?;
        let text = String::from_utf8(text_file.bytes).map_err(|e| {
            let err = SubmitError::TextDecode(e);
            session.set_phase(Phase::Error(err.to_string()));
            err
        })?;

        session.set_phase(Phase::Analyzing);
        let evidence = StageEvidence {
            voice_id: session.remote_id(Category::Voice).map(str::to_string),
            image_id: session.remote_id(Category::Image).map(str::to_string),
            text: Some(text),
        };

        let results = self.runner.run(&evidence).await;
        session.set_phase(Phase::Scored);

        let overall = score(&results, &self.thresholds);
        session.set_phase(Phase::Done);

        Ok(SubmissionOutcome { results, overall })
    }

    /// One multipart request per binary category; the file field is named
    /// after the category. Returns the server-assigned identifier.
    async fn upload(
        &self,
        category: Category,
        file: &CandidateFile,
    ) -> Result<String, RemoteFailure> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.meta.name.clone());
        // An unparseable declared type is not a reason to refuse the upload.
        let part = match part.mime_str(&file.meta.content_type) {
            Ok(p) => p,
            Err(_) => reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.meta.name.clone()),
        };
        let form = reqwest::multipart::Form::new().part(category.as_str().to_string(), part);

        let resp = self
            .http
            .post(self.remote.upload_url(category))
            .multipart(form)
            .send()
            .await
            .map_err(RemoteFailure::Transport)?;

        if !resp.status().is_success() {
            return Err(RemoteFailure::HttpStatus(resp.status().as_u16()));
        }

        let body: UploadResponse = resp.json().await.map_err(|_| RemoteFailure::Malformed)?;
        if body.status != "success" {
            return Err(RemoteFailure::ServerReported(
                body.error.unwrap_or_else(|| body.status.clone()),
            ));
        }
        body.filename.ok_or(RemoteFailure::Malformed)
    }
}
