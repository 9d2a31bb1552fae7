//! Stage runner: drives the fixed voice → image → text sequence, narrating
//! progress at evenly spaced intervals and stopping early on a fraudulent
//! outcome.
//!
//! Stages run strictly sequentially; the narrative ("listen, then look, then
//! read") is a correctness requirement, not a scheduling accident. Time and
//! progress delivery are injected so tests run without the wall clock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::analyzer::{DynAnalyzer, StageAnalyzer, StageEvidence};
use crate::assessment::StageResult;
use crate::category::Category;
use crate::config::AnalysisConfig;

/// Abstract timer. Production sleeps on tokio; tests use `NoopClock`.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Zero-delay clock for tests.
pub struct NoopClock;

#[async_trait]
impl Clock for NoopClock {
    async fn sleep(&self, _duration: Duration) {}
}

/// Observer of narration ticks. Purely informational; nothing downstream
/// consumes these values.
pub trait ProgressSink: Send + Sync {
    fn progress(&self, category: Category, message: &str, percent: u8);
}

/// Default sink: narration goes to the log.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn progress(&self, category: Category, message: &str, percent: u8) {
        tracing::info!(%category, percent, "{message}");
    }
}

pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn progress(&self, _category: Category, _message: &str, _percent: u8) {}
}

pub struct StageRunner {
    analyzer: DynAnalyzer,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ProgressSink>,
    config: AnalysisConfig,
}

impl StageRunner {
    pub fn new(analyzer: DynAnalyzer, config: AnalysisConfig) -> Self {
        Self {
            analyzer,
            clock: Arc::new(TokioClock),
            sink: Arc::new(LogProgress),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Execute one full run over the given evidence snapshot. Returns the
    /// results actually produced, in pipeline order; a fraudulent stage ends
    /// the run and later categories yield nothing. Not restartable; a new
    /// run takes a new snapshot.
    pub async fn run(&self, evidence: &StageEvidence) -> Vec<StageResult> {
        self.analyzer.begin_run(evidence).await;
        let mut results = Vec::with_capacity(Category::ALL.len());

        for category in Category::ALL {
            let result = self.run_stage(category, evidence).await;
            let passed = result.passed();
            results.push(result);
            if !passed {
                tracing::info!(%category, "stage flagged fraudulent, stopping pipeline");
                break;
            }
        }

        results
    }

    async fn run_stage(&self, category: Category, evidence: &StageEvidence) -> StageResult {
        let stage = self.config.stage(category);
        let steps = stage.messages.len().max(1);
        let time_per_step = stage.duration() / steps as u32;

        for (i, message) in stage.messages.iter().enumerate() {
            let percent = (((i + 1) * 100) / steps) as u8;
            self.sink.progress(category, message, percent);
            self.clock.sleep(time_per_step).await;
        }

        let result = self.analyzer.analyze(category, evidence).await;

        let closing = if result.passed() {
            "Analysis complete - Authentic"
        } else {
            "Analysis complete - Issues detected"
        };
        self.sink.progress(category, closing, 100);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ScriptedAnalyzer;
    use crate::assessment::{ThresholdPolicy, Tier};
    use std::sync::Mutex;

    /// Records every tick for later inspection.
    #[derive(Default)]
    struct RecordingSink {
        ticks: Mutex<Vec<(Category, String, u8)>>,
    }

    impl ProgressSink for RecordingSink {
        fn progress(&self, category: Category, message: &str, percent: u8) {
            self.ticks
                .lock()
                .unwrap()
                .push((category, message.to_string(), percent));
        }
    }

    fn runner(confidences: &[(Category, u8)], sink: Arc<RecordingSink>) -> StageRunner {
        let thresholds = ThresholdPolicy::default();
        let analyzer = Arc::new(ScriptedAnalyzer::new(
            thresholds,
            confidences.iter().copied(),
        ));
        StageRunner::new(analyzer, crate::config::AnalysisConfig::default())
            .with_clock(Arc::new(NoopClock))
            .with_sink(sink)
    }

    #[tokio::test]
    async fn all_passing_stages_produce_three_results_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let r = runner(
            &[
                (Category::Voice, 80),
                (Category::Image, 75),
                (Category::Text, 65),
            ],
            sink.clone(),
        );
        let results = r.run(&StageEvidence::default()).await;

        let categories: Vec<_> = results.iter().map(|r| r.category).collect();
        assert_eq!(
            categories,
            vec![Category::Voice, Category::Image, Category::Text]
        );
        assert_eq!(results[2].tier, Tier::Suspicious);
    }

    #[tokio::test]
    async fn fraudulent_voice_short_circuits_image_and_text() {
        let sink = Arc::new(RecordingSink::default());
        let r = runner(
            &[
                (Category::Voice, 20),
                (Category::Image, 90),
                (Category::Text, 90),
            ],
            sink.clone(),
        );
        let results = r.run(&StageEvidence::default()).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, Category::Voice);
        assert_eq!(results[0].tier, Tier::Fraudulent);

        // No narration tick ever fired for the skipped stages.
        let ticks = sink.ticks.lock().unwrap();
        assert!(ticks.iter().all(|(c, _, _)| *c == Category::Voice));
    }

    #[tokio::test]
    async fn narration_covers_every_message_and_ends_at_100() {
        let sink = Arc::new(RecordingSink::default());
        let r = runner(&[(Category::Voice, 20)], sink.clone());
        let _ = r.run(&StageEvidence::default()).await;

        let ticks = sink.ticks.lock().unwrap();
        // Five configured messages plus the closing status line.
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].2, 20);
        assert_eq!(ticks[4].2, 100);
        assert_eq!(ticks[5].1, "Analysis complete - Issues detected");
    }

    #[tokio::test]
    async fn each_run_is_announced_to_the_analyzer() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingAnalyzer {
            inner: ScriptedAnalyzer,
            runs: AtomicUsize,
        }

        #[async_trait]
        impl StageAnalyzer for CountingAnalyzer {
            async fn begin_run(&self, _evidence: &StageEvidence) {
                self.runs.fetch_add(1, Ordering::SeqCst);
            }

            async fn analyze(&self, category: Category, evidence: &StageEvidence) -> StageResult {
                self.inner.analyze(category, evidence).await
            }

            fn name(&self) -> &'static str {
                "counting"
            }
        }

        let analyzer = Arc::new(CountingAnalyzer {
            inner: ScriptedAnalyzer::new(ThresholdPolicy::default(), [(Category::Voice, 80)]),
            runs: AtomicUsize::new(0),
        });
        let r = StageRunner::new(analyzer.clone(), crate::config::AnalysisConfig::default())
            .with_clock(Arc::new(NoopClock))
            .with_sink(Arc::new(NullProgress));

        let _ = r.run(&StageEvidence::default()).await;
        let _ = r.run(&StageEvidence::default()).await;
        assert_eq!(analyzer.runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn suspicious_stage_does_not_stop_the_run() {
        let sink = Arc::new(RecordingSink::default());
        let r = runner(
            &[
                (Category::Voice, 45),
                (Category::Image, 45),
                (Category::Text, 45),
            ],
            sink,
        );
        let results = r.run(&StageEvidence::default()).await;
        assert_eq!(results.len(), 3);
    }
}
