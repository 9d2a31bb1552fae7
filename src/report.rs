//! Plaintext authenticity report: cosmetic artifact, not a wire contract.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::assessment::{OverallAssessment, StageResult};

const RULE_HEAVY: &str = "============================================================";
const RULE_LIGHT: &str = "------------------------------------------------------------";

/// "IG-" + base-36 millisecond timestamp + 5 random alphanumerics.
pub fn generate_report_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::rng();
    let suffix: String = (0..5)
        .map(|_| {
            let idx = rng.random_range(0..36u32);
            char::from_digit(idx, 36).unwrap_or('0').to_ascii_uppercase()
        })
        .collect();
    format!("IG-{}-{}", to_base36(millis), suffix)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        let digit = (n % 36) as u32;
        out.push(char::from_digit(digit, 36).unwrap_or('0').to_ascii_uppercase());
        n /= 36;
    }
    out.iter().rev().collect()
}

/// Render the downloadable report: id, timestamp, overall score/tier and a
/// section per produced result with its indicator bullets.
pub fn generate_report(
    overall: &OverallAssessment,
    results: &[StageResult],
    generated_at: DateTime<Utc>,
    report_id: &str,
) -> String {
    let mut report = format!(
        "INSUREGUARD AI - AUTHENTICITY REPORT\n{RULE_HEAVY}\n\n\
         Generated: {}\nReport ID: {report_id}\n\n\
         OVERALL ASSESSMENT\n{RULE_LIGHT}\n\
         Confidence Score: {}%\nStatus: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        overall.confidence,
        tier_upper(overall.tier),
    );

    for result in results {
        report.push_str(&format!(
            "\n{} ANALYSIS\n{RULE_LIGHT}\nStatus: {}\nConfidence: {}%\n\nKey Findings:\n",
            result.category.as_str().to_uppercase(),
            tier_upper(result.tier),
            result.confidence,
        ));
        for indicator in &result.indicators {
            report.push_str(&format!("  - {indicator}\n"));
        }
        report.push('\n');
    }

    report.push_str(&format!(
        "\n{RULE_HEAVY}\n\
         DISCLAIMER: This report is generated by AI and should be used\n\
         as one factor in decision-making, not as the sole determinant.\n\
         Manual review is recommended for all claims.\n"
    ));

    report
}

fn tier_upper(tier: crate::assessment::Tier) -> String {
    tier.as_str().to_uppercase()
}
