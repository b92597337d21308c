use crate::image_codec::interface::EncodedPayload;
use async_trait::async_trait;
use thiserror::Error;

/// A herb identification returned by the scoring service.
///
/// Older deployments omit `source`, `traits` and `taste`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub confidence_percent: f64,
    pub chinese_name: String,
    pub scientific_name: String,
    pub category: String,
    pub source: Option<String>,
    pub traits: Option<String>,
    pub taste: Option<String>,
    pub efficacy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("network error: {0}")]
    Network(String),

    #[error("service error: {0}")]
    Service(String),
}

#[async_trait]
pub trait ScoringClient: Send + Sync {
    /// Sends one payload and waits for the service's answer. Never retries.
    async fn score(&self, payload: &EncodedPayload) -> Result<ClassificationResult, ScoringError>;
}
