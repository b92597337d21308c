use crate::acceptance_policy::AcceptancePolicy;
use chrono::Offset;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFraming {
    /// The whole POST body is the base64 text.
    #[default]
    Raw,
    /// The base64 text is sent as a JSON string literal.
    JsonString,
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub base_url: String,
    pub score_path: String,
    pub bearer_token: String,
    pub deployment: String,
    pub body_framing: BodyFraming,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct CodecConfig {
    pub resize: Option<(u32, u32)>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub codec: CodecConfig,
    pub policy: AcceptancePolicy,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_url: "https://chinese-herbs-ml-xohnw.eastus2.inference.ml.azure.com".to_string(),
            score_path: "score".to_string(),
            bearer_token: String::new(),
            deployment: "herbs-detect-server".to_string(),
            body_framing: BodyFraming::Raw,
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ScoringConfig {
    pub fn score_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.score_path.trim_start_matches('/')
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            codec: CodecConfig::default(),
            policy: AcceptancePolicy::default(),
            logger_timezone: utc(),
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}
