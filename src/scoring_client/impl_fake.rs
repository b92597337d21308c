use crate::image_codec::interface::EncodedPayload;
use crate::library::logger::interface::Logger;
use crate::scoring_client::interface::{ClassificationResult, ScoringClient, ScoringError};
use async_trait::async_trait;
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

const CATALOGUE: &[(&str, &str, &str, &str)] = &[
    ("洋金花", "Daturae Flos", "Flowers", "平喘止咳，解痙定痛。"),
    ("金銀花", "Lonicerae Japonicae Flos", "Flowers", "清熱解毒，疏散風熱。"),
    ("枸杞子", "Lycii Fructus", "Fruits", "滋補肝腎，益精明目。"),
    ("甘草", "Glycyrrhizae Radix", "Roots", "補脾益氣，清熱解毒。"),
    ("未知", "Unknown", "Unknown", ""),
];

pub struct FakeResponse {
    pub delay: Duration,
    pub result: Result<ClassificationResult, ScoringError>,
}

/// Replays scripted responses in order, then answers with random herbs.
pub struct ScoringClientFake {
    logger: Arc<dyn Logger + Send + Sync>,
    script: Mutex<VecDeque<FakeResponse>>,
    received: Mutex<Vec<EncodedPayload>>,
}

impl ScoringClientFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("scoring_client").with_namespace("fake"),
            script: Mutex::new(VecDeque::new()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, result: Result<ClassificationResult, ScoringError>) {
        self.push_delayed(Duration::ZERO, result);
    }

    pub fn push_delayed(
        &self,
        delay: Duration,
        result: Result<ClassificationResult, ScoringError>,
    ) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(FakeResponse { delay, result });
    }

    /// Every payload `score` was called with, in call order.
    pub fn received(&self) -> Vec<EncodedPayload> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_scripted(&self) -> Option<FakeResponse> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

fn random_result() -> Result<ClassificationResult, ScoringError> {
    let mut rng = rand::rng();

    let index_dist =
        Uniform::new(0, CATALOGUE.len()).map_err(|e| ScoringError::Service(e.to_string()))?;
    let confidence_dist =
        Uniform::new(0.0, 100.0).map_err(|e| ScoringError::Service(e.to_string()))?;

    let (chinese_name, scientific_name, category, efficacy) = CATALOGUE[index_dist.sample(&mut rng)];

    Ok(ClassificationResult {
        confidence_percent: confidence_dist.sample(&mut rng),
        chinese_name: chinese_name.to_string(),
        scientific_name: scientific_name.to_string(),
        category: category.to_string(),
        source: None,
        traits: None,
        taste: None,
        efficacy: efficacy.to_string(),
    })
}

#[async_trait]
impl ScoringClient for ScoringClientFake {
    async fn score(&self, payload: &EncodedPayload) -> Result<ClassificationResult, ScoringError> {
        let _ = self
            .logger
            .info(&format!("Scoring {} byte payload...", payload.len()));

        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.clone());

        let result = match self.next_scripted() {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                scripted.result
            }
            None => random_result(),
        };

        let _ = self.logger.info(&format!("Scored: {:?}", result));

        result
    }
}
