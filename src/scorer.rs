//! # Scorer
//! Pure aggregation of produced stage results into the overall assessment.
//! No I/O, suitable for unit tests and offline evaluation.

use crate::assessment::{OverallAssessment, StageResult, ThresholdPolicy, Tier};

/// Overall confidence is the round-half-up mean of the *produced* results;
/// categories whose stage never ran are excluded, not counted as zero.
/// An empty run is the minimum-information default: 0 / fraudulent.
pub fn score(results: &[StageResult], thresholds: &ThresholdPolicy) -> OverallAssessment {
    if results.is_empty() {
        return OverallAssessment {
            confidence: 0,
            tier: Tier::Fraudulent,
        };
    }

    let sum: u32 = results.iter().map(|r| r.confidence as u32).sum();
    let mean = sum as f64 / results.len() as f64;
    let confidence = mean.round() as u8;

    OverallAssessment {
        confidence,
        tier: thresholds.tier_for(confidence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn result(category: Category, confidence: u8) -> StageResult {
        let thresholds = ThresholdPolicy::default();
        StageResult::new(category, confidence, thresholds.tier_for(confidence))
    }

    #[test]
    fn empty_run_is_zero_fraudulent() {
        let overall = score(&[], &ThresholdPolicy::default());
        assert_eq!(overall.confidence, 0);
        assert_eq!(overall.tier, Tier::Fraudulent);
    }

    #[test]
    fn mean_rounds_half_up() {
        // (80 + 75 + 65) / 3 = 73.33 → 73
        let results = vec![
            result(Category::Voice, 80),
            result(Category::Image, 75),
            result(Category::Text, 65),
        ];
        let overall = score(&results, &ThresholdPolicy::default());
        assert_eq!(overall.confidence, 73);
        assert_eq!(overall.tier, Tier::Authentic);

        // (70 + 71) / 2 = 70.5 → 71
        let results = vec![result(Category::Voice, 70), result(Category::Image, 71)];
        assert_eq!(score(&results, &ThresholdPolicy::default()).confidence, 71);
    }

    #[test]
    fn order_does_not_matter() {
        let a = vec![
            result(Category::Voice, 80),
            result(Category::Image, 75),
            result(Category::Text, 65),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(
            score(&a, &ThresholdPolicy::default()),
            score(&b, &ThresholdPolicy::default())
        );
    }

    #[test]
    fn single_result_passes_through() {
        let results = vec![result(Category::Voice, 25)];
        let overall = score(&results, &ThresholdPolicy::default());
        assert_eq!(overall.confidence, 25);
        assert_eq!(overall.tier, Tier::Fraudulent);
    }

    #[test]
    fn overall_tier_uses_shared_thresholds() {
        let results = vec![result(Category::Voice, 40), result(Category::Image, 40)];
        assert_eq!(
            score(&results, &ThresholdPolicy::default()).tier,
            Tier::Suspicious
        );
    }
}
