use crate::classifier::core::RequestState;
use crate::classifier::main::Classifier;
use crate::config::Config;
use crate::image_codec::impl_fake::ImageCodecFake;
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::scoring_client::impl_fake::ScoringClientFake;
use crate::scoring_client::interface::ClassificationResult;
use std::sync::Arc;
use std::time::Duration;

pub struct Fixture {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub image_codec: Arc<ImageCodecFake>,
    pub scoring_client: Arc<ScoringClientFake>,
    pub classifier: Classifier,
}

impl Fixture {
    pub fn new() -> Self {
        let config = Config::default();
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let image_codec = Arc::new(ImageCodecFake::new(logger.clone()));
        let scoring_client = Arc::new(ScoringClientFake::new(logger.clone()));
        let classifier = Classifier::new(
            logger.clone(),
            image_codec.clone(),
            scoring_client.clone(),
        );

        Self {
            config,
            logger,
            image_codec,
            scoring_client,
            classifier,
        }
    }

    pub async fn settled(&self) -> RequestState {
        tokio::time::timeout(Duration::from_secs(5), self.classifier.settled())
            .await
            .expect("classifier did not settle")
    }

    /// Waits until the scoring client has seen `count` requests.
    pub async fn wait_for_score_calls(&self, count: usize) {
        let waiting = async {
            while self.scoring_client.received().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .expect("scoring client was not called");
    }
}

pub fn herb(scientific_name: &str, confidence_percent: f64) -> ClassificationResult {
    ClassificationResult {
        confidence_percent,
        chinese_name: "洋金花".to_string(),
        scientific_name: scientific_name.to_string(),
        category: "Flowers".to_string(),
        source: None,
        traits: None,
        taste: None,
        efficacy: "平喘止咳，解痙定痛。".to_string(),
    }
}
