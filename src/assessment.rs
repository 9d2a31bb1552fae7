//! Tiers, thresholds, per-stage results and the overall verdict.
//!
//! The tier function is shared: the same `ThresholdPolicy` buckets both a
//! single stage's confidence and the aggregated overall confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Coarse classification of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Authentic,
    Suspicious,
    Fraudulent,
}

impl Tier {
    /// Authentic and suspicious both pass; only fraudulent stops the pipeline.
    pub fn passed(&self) -> bool {
        !matches!(self, Tier::Fraudulent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Authentic => "authentic",
            Tier::Suspicious => "suspicious",
            Tier::Fraudulent => "fraudulent",
        }
    }

    /// Headline shown next to the overall score.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Authentic => "Likely Authentic",
            Tier::Suspicious => "Requires Review",
            Tier::Fraudulent => "High Risk",
        }
    }
}

/// Tier cut points, inclusive on the lower end of each band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    /// score >= authentic → authentic
    pub authentic: u8,
    /// suspicious <= score < authentic → suspicious; below → fraudulent
    pub suspicious: u8,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            authentic: 70,
            suspicious: 40,
        }
    }
}

impl ThresholdPolicy {
    pub fn tier_for(&self, confidence: u8) -> Tier {
        if confidence >= self.authentic {
            Tier::Authentic
        } else if confidence >= self.suspicious {
            Tier::Suspicious
        } else {
            Tier::Fraudulent
        }
    }
}

/// Outcome of one category's analysis stage. Produced exactly once per
/// category per run; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    #[serde(rename = "type")]
    pub category: Category,
    /// Integer confidence in 0..=100.
    pub confidence: u8,
    #[serde(rename = "status")]
    pub tier: Tier,
    /// Human-readable findings, in presentation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indicators: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl StageResult {
    pub fn new(category: Category, confidence: u8, tier: Tier) -> Self {
        Self {
            category,
            confidence: confidence.min(100),
            tier,
            indicators: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indicators = indicators.into_iter().map(Into::into).collect();
        self
    }

    pub fn passed(&self) -> bool {
        self.tier.passed()
    }
}

/// Aggregated verdict over all *produced* stage results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub confidence: u8,
    #[serde(rename = "status")]
    pub tier: Tier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_exact() {
        let t = ThresholdPolicy::default();
        assert_eq!(t.tier_for(70), Tier::Authentic);
        assert_eq!(t.tier_for(69), Tier::Suspicious);
        assert_eq!(t.tier_for(40), Tier::Suspicious);
        assert_eq!(t.tier_for(39), Tier::Fraudulent);
        assert_eq!(t.tier_for(100), Tier::Authentic);
        assert_eq!(t.tier_for(0), Tier::Fraudulent);
    }

    #[test]
    fn suspicious_counts_as_passed() {
        assert!(Tier::Authentic.passed());
        assert!(Tier::Suspicious.passed());
        assert!(!Tier::Fraudulent.passed());
    }

    #[test]
    fn serialize_stage_result_shape() {
        let r = StageResult::new(Category::Voice, 82, Tier::Authentic)
            .with_indicators(["Natural speech patterns detected"]);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["type"], serde_json::json!("voice"));
        assert_eq!(v["confidence"], serde_json::json!(82));
        assert_eq!(v["status"], serde_json::json!("authentic"));
        assert!(v["indicators"].is_array());
        assert!(v["timestamp"].is_string());
    }

    #[test]
    fn confidence_is_clamped_to_100() {
        let r = StageResult::new(Category::Text, 200, Tier::Authentic);
        assert_eq!(r.confidence, 100);
    }
}
