use crate::classifier::core::{Effect, FailureReason, Msg};
use crate::classifier::main::Classifier;
use std::sync::Arc;

impl Classifier {
    pub(super) async fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!(
            "Running effect: {}",
            effect.to_display_string()
        ));

        match effect {
            Effect::Encode { generation, image } => {
                let image_codec = Arc::clone(&self.image_codec);
                let encoded = tokio::task::spawn_blocking(move || image_codec.encode(&image)).await;

                let result = match encoded {
                    Ok(result) => result.map_err(FailureReason::from),
                    Err(join_error) => Err(FailureReason::Decode(format!(
                        "encoder stopped: {}",
                        join_error
                    ))),
                };

                if let Err(reason) = &result {
                    let _ = self.logger.error(&format!("Encoding failed: {}", reason));
                }

                self.dispatch(Msg::EncodeDone { generation, result }, false);
            }

            Effect::Score {
                generation,
                payload,
            } => {
                let result = self
                    .scoring_client
                    .score(&payload)
                    .await
                    .map_err(FailureReason::from);

                if let Err(reason) = &result {
                    let _ = self.logger.error(&format!("Scoring failed: {}", reason));
                }

                self.dispatch(Msg::ScoreDone { generation, result }, false);
            }
        }
    }
}
