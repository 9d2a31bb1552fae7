//! Analyzer adapter: provider abstraction over stage-result production.
//!
//! Two production implementations selectable by configuration: a local
//! pseudo-random simulation and a remote delegation that calls the analysis
//! endpoint and falls back to the simulation when the backend is unreachable
//! or answers with garbage. Tests inject a scripted analyzer instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::assessment::{StageResult, ThresholdPolicy, Tier};
use crate::category::Category;
use crate::config::{AnalyzerMode, AppConfig, RemoteConfig};
use crate::indicators::indicators_for;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

/// Everything an analyzer may consult for one run: remote store ids for the
/// binary categories, inline content for text.
#[derive(Debug, Clone, Default)]
pub struct StageEvidence {
    pub voice_id: Option<String>,
    pub image_id: Option<String>,
    pub text: Option<String>,
}

/// Strategy seam between the stage runner and result production.
#[async_trait]
pub trait StageAnalyzer: Send + Sync {
    /// Called once at the start of every run, before the first stage.
    /// Implementations drop any state left over from a previous run; each
    /// run must be answered from its own evidence.
    async fn begin_run(&self, _evidence: &StageEvidence) {}

    /// Produce the result for one category. Infallible by design: the remote
    /// implementation absorbs its own failures by falling back locally, so
    /// the user-visible flow is never blocked by backend unavailability.
    async fn analyze(&self, category: Category, evidence: &StageEvidence) -> StageResult;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynAnalyzer = Arc<dyn StageAnalyzer>;

/// Factory: build the analyzer the configuration asks for.
pub fn build_analyzer(config: &AppConfig) -> DynAnalyzer {
    match config.remote.mode {
        AnalyzerMode::Mock => Arc::new(MockAnalyzer::new(config.analysis.thresholds)),
        AnalyzerMode::Remote => Arc::new(RemoteAnalyzer::new(
            config.remote.clone(),
            config.analysis.thresholds,
        )),
    }
}

// ------------------------------------------------------------
// Local simulation
// ------------------------------------------------------------

/// Draws a uniform confidence in [0,100), buckets it through the shared
/// thresholds and attaches the canned findings for that category and tier.
pub struct MockAnalyzer {
    thresholds: ThresholdPolicy,
    rng: Mutex<StdRng>,
}

impl MockAnalyzer {
    pub fn new(thresholds: ThresholdPolicy) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        Self::with_seed(thresholds, seed)
    }

    /// Deterministic variant for tests and reproducible demos.
    pub fn with_seed(thresholds: ThresholdPolicy, seed: u64) -> Self {
        Self {
            thresholds,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self) -> u8 {
        let raw: f64 = self
            .rng
            .lock()
            .expect("rng lock poisoned")
            .random_range(0.0..100.0);
        raw.round() as u8
    }
}

#[async_trait]
impl StageAnalyzer for MockAnalyzer {
    async fn analyze(&self, category: Category, _evidence: &StageEvidence) -> StageResult {
        let confidence = self.draw();
        let tier = self.thresholds.tier_for(confidence);
        StageResult::new(category, confidence, tier)
            .with_indicators(indicators_for(category, tier).iter().copied())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// ------------------------------------------------------------
// Remote delegation
// ------------------------------------------------------------

/// Wire shape of the analysis request the backend expects.
#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    image: Option<&'a str>,
    voice: Option<&'a str>,
    text: &'a str,
}

/// One category's slice of the analysis response. Extra keys (risk scores
/// and the like) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WireStageResult {
    pub confidence: u8,
    pub status: Tier,
    #[serde(default)]
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    voice: Option<WireStageResult>,
    #[serde(default)]
    image: Option<WireStageResult>,
    #[serde(default)]
    text: Option<WireStageResult>,
}

impl AnalyzeResponse {
    fn for_category(&self, category: Category) -> Option<&WireStageResult> {
        match category {
            Category::Voice => self.voice.as_ref(),
            Category::Image => self.image.as_ref(),
            Category::Text => self.text.as_ref(),
        }
    }
}

/// Calls the analysis endpoint once per run (the wire contract carries all
/// three categories in one request), memoizes the keyed response, and serves
/// each stage from it. The memo lives for exactly one run: `begin_run`
/// drops it, so a later run is never scored from an earlier run's response.
/// Any failure, or a missing category in the response, falls back to the
/// local simulation for that stage.
pub struct RemoteAnalyzer {
    http: reqwest::Client,
    remote: RemoteConfig,
    fallback: MockAnalyzer,
    // None = not fetched this run; Some(None) = fetch failed, stay on fallback.
    memo: tokio::sync::Mutex<Option<Option<AnalyzeResponse>>>,
}

impl RemoteAnalyzer {
    pub fn new(remote: RemoteConfig, thresholds: ThresholdPolicy) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("insureguard-analyzer/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            http,
            remote,
            fallback: MockAnalyzer::new(thresholds),
            memo: tokio::sync::Mutex::new(None),
        }
    }

    async fn fetch(&self, evidence: &StageEvidence) -> Option<AnalyzeResponse> {
        let req = AnalyzeRequest {
            image: evidence.image_id.as_deref(),
            voice: evidence.voice_id.as_deref(),
            text: evidence.text.as_deref().unwrap_or(""),
        };

        let resp = match self
            .http
            .post(self.remote.analyze_url())
            .json(&req)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "analysis endpoint unreachable, falling back to simulation");
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), "analysis endpoint failed, falling back to simulation");
            return None;
        }

        match resp.json::<AnalyzeResponse>().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(error = %e, "malformed analysis response, falling back to simulation");
                None
            }
        }
    }

    async fn response_for(&self, evidence: &StageEvidence) -> Option<AnalyzeResponse> {
        let mut memo = self.memo.lock().await;
        if memo.is_none() {
            *memo = Some(self.fetch(evidence).await);
        }
        memo.as_ref().and_then(|cached| cached.clone())
    }
}

#[async_trait]
impl StageAnalyzer for RemoteAnalyzer {
    async fn begin_run(&self, _evidence: &StageEvidence) {
        *self.memo.lock().await = None;
    }

    async fn analyze(&self, category: Category, evidence: &StageEvidence) -> StageResult {
        if let Some(resp) = self.response_for(evidence).await {
            if let Some(wire) = resp.for_category(category) {
                return StageResult::new(category, wire.confidence, wire.status)
                    .with_indicators(wire.indicators.iter().cloned());
            }
            tracing::warn!(%category, "analysis response missing category, simulating");
        }
        self.fallback.analyze(category, evidence).await
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

// ------------------------------------------------------------
// Scripted analyzer (tests, demos)
// ------------------------------------------------------------

/// Returns pre-seeded confidences per category; anything unseeded scores 0.
pub struct ScriptedAnalyzer {
    thresholds: ThresholdPolicy,
    confidences: HashMap<Category, u8>,
}

impl ScriptedAnalyzer {
    pub fn new<I>(thresholds: ThresholdPolicy, confidences: I) -> Self
    where
        I: IntoIterator<Item = (Category, u8)>,
    {
        Self {
            thresholds,
            confidences: confidences.into_iter().collect(),
        }
    }
}

#[async_trait]
impl StageAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, category: Category, _evidence: &StageEvidence) -> StageResult {
        let confidence = self.confidences.get(&category).copied().unwrap_or(0);
        let tier = self.thresholds.tier_for(confidence);
        StageResult::new(category, confidence, tier)
            .with_indicators(indicators_for(category, tier).iter().copied())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
