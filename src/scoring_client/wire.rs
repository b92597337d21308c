//! Request framing and response parsing for the scoring endpoint.

use crate::config::BodyFraming;
use crate::image_codec::interface::EncodedPayload;
use crate::scoring_client::interface::{ClassificationResult, ScoringError};
use serde::Deserialize;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Response object as the service sends it. Field names are the service's.
#[derive(Debug, Deserialize)]
pub struct ScoreResponse {
    #[serde(rename = "Confidence")]
    pub confidence: WireNumber,
    #[serde(rename = "Chinese name")]
    pub chinese_name: String,
    #[serde(rename = "Scientific Name")]
    pub scientific_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Source")]
    pub source: Option<String>,
    #[serde(rename = "Traits")]
    pub traits: Option<String>,
    #[serde(rename = "Taste")]
    pub taste: Option<String>,
    pub efficacy: String,
}

/// `Confidence` is documented as decimal text; some deployments send a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Text(String),
    Number(f64),
}

impl WireNumber {
    fn to_f64(&self) -> Result<f64, ScoringError> {
        let value = match self {
            WireNumber::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                ScoringError::Service(format!("confidence is not a number: {:?}", text))
            })?,
            WireNumber::Number(number) => *number,
        };

        if !value.is_finite() {
            return Err(ScoringError::Service(format!(
                "confidence is not finite: {}",
                value
            )));
        }

        Ok(value)
    }
}

impl TryFrom<ScoreResponse> for ClassificationResult {
    type Error = ScoringError;

    fn try_from(response: ScoreResponse) -> Result<Self, Self::Error> {
        Ok(ClassificationResult {
            confidence_percent: response.confidence.to_f64()?,
            chinese_name: response.chinese_name,
            scientific_name: response.scientific_name,
            category: response.category,
            source: response.source,
            traits: response.traits,
            taste: response.taste,
            efficacy: response.efficacy,
        })
    }
}

pub fn frame_body(payload: &EncodedPayload, framing: BodyFraming) -> String {
    match framing {
        BodyFraming::Raw => payload.as_str().to_string(),
        BodyFraming::JsonString => serde_json::Value::String(payload.as_str().to_string()).to_string(),
    }
}

pub fn parse_score_body(status: u16, body: &str) -> Result<ClassificationResult, ScoringError> {
    if !(200..300).contains(&status) {
        return Err(ScoringError::Service(format!(
            "HTTP {}: {}",
            status,
            excerpt(body)
        )));
    }

    let response: ScoreResponse = serde_json::from_str(body)
        .map_err(|e| ScoringError::Service(format!("malformed response body: {}", e)))?;

    ClassificationResult::try_from(response)
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push('…');
    cut
}
