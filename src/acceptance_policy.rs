use crate::scoring_client::interface::ClassificationResult;
use rust_decimal::{Decimal, RoundingStrategy};

pub const UNKNOWN_SCIENTIFIC_NAME: &str = "Unknown";
pub const MIN_CONFIDENCE_PERCENT: f64 = 50.0;

/// Decides whether a successful response is a confident identification.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptancePolicy {
    /// Results at or below this percentage are unrecognized.
    pub min_confidence: f64,
    pub unknown_name: String,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            min_confidence: MIN_CONFIDENCE_PERCENT,
            unknown_name: UNKNOWN_SCIENTIFIC_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Confident(ClassificationResult),
    Unrecognized,
}

impl AcceptancePolicy {
    pub fn classify(&self, result: &ClassificationResult) -> Outcome {
        if result.scientific_name == self.unknown_name {
            return Outcome::Unrecognized;
        }

        // NaN never clears the threshold.
        if !(result.confidence_percent > self.min_confidence) {
            return Outcome::Unrecognized;
        }

        Outcome::Confident(result.clone())
    }
}

pub fn classify_outcome(result: &ClassificationResult) -> Outcome {
    AcceptancePolicy::default().classify(result)
}

/// Rounds the exact binary value of `value` to `places` decimals, ties to even.
pub fn round_half_even(value: f64, places: u32) -> Option<Decimal> {
    let mut rounded = Decimal::from_f64_retain(value)?
        .round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(places);
    Some(rounded)
}

/// Display form of a confidence percentage, e.g. `87.3%`.
pub fn format_confidence(confidence_percent: f64) -> String {
    match round_half_even(confidence_percent, 1) {
        Some(rounded) => format!("{}%", rounded),
        None => format!("{:.1}%", confidence_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(scientific_name: &str, confidence_percent: f64) -> ClassificationResult {
        ClassificationResult {
            confidence_percent,
            chinese_name: "洋金花".to_string(),
            scientific_name: scientific_name.to_string(),
            category: "Flowers".to_string(),
            source: None,
            traits: None,
            taste: None,
            efficacy: "平喘止咳".to_string(),
        }
    }

    #[test]
    fn test_confident_above_threshold() {
        let r = result("Datura metel", 87.3);

        assert_eq!(classify_outcome(&r), Outcome::Confident(r.clone()));
    }

    #[test]
    fn test_threshold_boundary_is_unrecognized() {
        assert_eq!(
            classify_outcome(&result("Datura metel", 50.0)),
            Outcome::Unrecognized
        );
        assert!(matches!(
            classify_outcome(&result("Datura metel", 50.0001)),
            Outcome::Confident(_)
        ));
    }

    #[test]
    fn test_low_confidence_is_unrecognized() {
        assert_eq!(
            classify_outcome(&result("Datura metel", 30.0)),
            Outcome::Unrecognized
        );
    }

    #[test]
    fn test_unknown_name_is_unrecognized_at_any_confidence() {
        assert_eq!(
            classify_outcome(&result("Unknown", 99.9)),
            Outcome::Unrecognized
        );
    }

    #[test]
    fn test_nan_confidence_is_unrecognized() {
        assert_eq!(
            classify_outcome(&result("Datura metel", f64::NAN)),
            Outcome::Unrecognized
        );
    }

    #[test]
    fn test_threshold_uses_unrounded_value() {
        // Displays as 50.0% but is still above the threshold.
        let r = result("Datura metel", 50.04);

        assert!(matches!(classify_outcome(&r), Outcome::Confident(_)));
        assert_eq!(format_confidence(r.confidence_percent), "50.0%");
    }

    #[test]
    fn test_custom_policy_threshold() {
        let policy = AcceptancePolicy {
            min_confidence: 90.0,
            ..AcceptancePolicy::default()
        };

        assert_eq!(
            policy.classify(&result("Datura metel", 87.3)),
            Outcome::Unrecognized
        );
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(87.3), "87.3%");
        assert_eq!(format_confidence(100.0), "100.0%");
        assert_eq!(format_confidence(0.0), "0.0%");
    }

    #[test]
    fn test_rounding_is_half_even_on_exact_binary_value() {
        // 49.95 is stored slightly above the midpoint.
        assert_eq!(format_confidence(49.95), "50.0%");
        // 12.25 and 12.75 are exact midpoints.
        assert_eq!(format_confidence(12.25), "12.2%");
        assert_eq!(format_confidence(12.75), "12.8%");
        // 12.35 is stored slightly below the midpoint.
        assert_eq!(format_confidence(12.35), "12.3%");
    }
}
