//! Amount threshold gate
//!
//! Parses the locale-formatted amount strings produced by the classifier
//! ("50.000", "$1.200.000") and compares them against a configured ceiling
//! in minor currency units. The gate is deliberately fail-open: a missing,
//! blank, or unparseable amount never silences a message.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Amount announcement policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountPolicy {
    /// Whether the threshold is enforced at all
    pub enabled: bool,
    /// Maximum announced amount, in minor currency units
    pub threshold_minor_units: i64,
}

impl Default for AmountPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold_minor_units: 0,
        }
    }
}

impl AmountPolicy {
    /// Enabled policy with the given ceiling
    pub fn with_threshold(threshold_minor_units: i64) -> Self {
        Self {
            enabled: true,
            threshold_minor_units: threshold_minor_units.max(0),
        }
    }
}

/// Should a message with this amount text be announced?
///
/// Rules (in order):
/// - Policy disabled -> always true
/// - No amount / blank amount -> true
/// - Strip every non-digit character, parse the rest as minor units;
///   parse failure (no digits, overflow) -> true (fail open)
/// - Otherwise `parsed <= threshold`
///
/// Stripping non-digits also drops any sign, so the comparison is on the
/// absolute value by construction.
pub fn permits(policy: &AmountPolicy, amount_text: Option<&str>) -> bool {
    if !policy.enabled {
        return true;
    }
    let Some(text) = amount_text else {
        return true;
    };

    match parse_minor_units(text) {
        Some(amount) => {
            let allowed = amount <= policy.threshold_minor_units;
            if !allowed {
                debug!(
                    amount,
                    threshold = policy.threshold_minor_units,
                    "Amount above threshold, suppressing announcement"
                );
            }
            allowed
        }
        None => true,
    }
}

/// Parse a formatted amount string into minor units.
///
/// "50.000" -> 50000, "$ 1.200.000" -> 1200000. Returns `None` for
/// blank input, input without digits, or values that overflow i64.
pub fn parse_minor_units(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok()
}
