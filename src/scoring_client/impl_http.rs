use crate::config::ScoringConfig;
use crate::image_codec::interface::EncodedPayload;
use crate::library::logger::interface::Logger;
use crate::scoring_client::interface::{ClassificationResult, ScoringClient, ScoringError};
use crate::scoring_client::wire::{frame_body, parse_score_body};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;

const USER_AGENT: &str = concat!("herb-scan/", env!("CARGO_PKG_VERSION"));
const DEPLOYMENT_HEADER: &str = "azureml-model-deployment";

pub struct ScoringClientHttp {
    http_client: reqwest::Client,
    config: ScoringConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ScoringClientHttp {
    pub fn new(
        config: ScoringConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ScoringError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ScoringError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            logger: logger.with_namespace("scoring_client").with_namespace("http"),
        })
    }
}

fn to_scoring_error(error: reqwest::Error) -> ScoringError {
    if error.is_builder() {
        return ScoringError::Service(format!("invalid request: {}", error));
    }
    ScoringError::Network(error.to_string())
}

#[async_trait]
impl ScoringClient for ScoringClientHttp {
    async fn score(&self, payload: &EncodedPayload) -> Result<ClassificationResult, ScoringError> {
        let url = self.config.score_url();
        let body = frame_body(payload, self.config.body_framing);

        let _ = self
            .logger
            .info(&format!("POST {} ({} byte body)", url, body.len()));

        let mut request = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(DEPLOYMENT_HEADER, &self.config.deployment)
            .body(body);

        if !self.config.bearer_token.is_empty() {
            request = request.bearer_auth(&self.config.bearer_token);
        }

        let response = request.send().await.map_err(to_scoring_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(to_scoring_error)?;

        let _ = self.logger.info(&format!("HTTP {} ({} bytes)", status, text.len()));

        parse_score_body(status, &text)
    }
}
