use crate::acceptance_policy::{format_confidence, AcceptancePolicy, Outcome};
use crate::classifier::core::RequestState;
use crate::device_display::interface::DeviceDisplay;
use crate::scoring_client::interface::ClassificationResult;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    policy: AcceptancePolicy,
}

impl Render {
    pub fn new(
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        policy: AcceptancePolicy,
    ) -> Self {
        Self {
            device_display,
            policy,
        }
    }

    pub fn render(&self, state: &RequestState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut device_display = self
            .device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        device_display.clear()?;
        for (index, line) in lines(&self.policy, state).iter().enumerate() {
            device_display.write_line(index, line)?;
        }
        device_display.flush()?;

        Ok(())
    }
}

pub fn lines(policy: &AcceptancePolicy, state: &RequestState) -> Vec<String> {
    match state {
        RequestState::Idle => vec!["Select a photo of a herb to identify.".to_string()],
        RequestState::Pending => vec!["Identifying herb...".to_string()],
        RequestState::Success(result) => match policy.classify(result) {
            Outcome::Confident(result) => herb_info_lines(&result),
            Outcome::Unrecognized => vec![
                "The object is not in the current knowledge base.".to_string(),
                "Please try again with another item.".to_string(),
            ],
        },
        RequestState::Error(reason) => {
            let hint = if reason.is_retryable() {
                "Retry to send the same photo again, or pick another one."
            } else {
                "Please pick another photo."
            };
            vec![
                format!("Failed to identify herb ({}).", reason.kind()),
                hint.to_string(),
            ]
        }
    }
}

fn herb_info_lines(result: &ClassificationResult) -> Vec<String> {
    let mut lines = vec![
        format!("Confidence: {}", format_confidence(result.confidence_percent)),
        format!("Chinese name: {}", result.chinese_name),
        format!("Scientific name: {}", result.scientific_name),
        format!("Category: {}", result.category),
    ];

    let optional = [
        ("Source", &result.source),
        ("Traits", &result.traits),
        ("Taste", &result.taste),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{}: {}", label, value));
        }
    }

    lines.push(format!("Efficacy: {}", result.efficacy));
    lines
}
