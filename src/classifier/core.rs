use crate::image_codec::interface::{DecodeError, EncodedPayload, ImageReference};
use crate::scoring_client::interface::{ClassificationResult, ScoringError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Success(ClassificationResult),
    Error(FailureReason),
}

impl RequestState {
    /// Success and Error stay put until the caller submits or retries.
    pub fn is_settled(&self) -> bool {
        matches!(self, RequestState::Success(_) | RequestState::Error(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Pending => "pending",
            RequestState::Success(_) => "success",
            RequestState::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Decode(String),
    Network(String),
    Service(String),
}

impl FailureReason {
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::Decode(_) => "decode",
            FailureReason::Network(_) => "network",
            FailureReason::Service(_) => "service",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FailureReason::Decode(message)
            | FailureReason::Network(message)
            | FailureReason::Service(message) => message,
        }
    }

    /// A decode failure needs a new image; the other failures can be replayed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FailureReason::Decode(_))
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl From<ScoringError> for FailureReason {
    fn from(error: ScoringError) -> Self {
        match error {
            ScoringError::Network(message) => FailureReason::Network(message),
            ScoringError::Service(message) => FailureReason::Service(message),
        }
    }
}

impl From<DecodeError> for FailureReason {
    fn from(error: DecodeError) -> Self {
        FailureReason::Decode(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub state: RequestState,
    /// Bumped by every submit and retry. Completions tagged with an older
    /// generation belong to a superseded attempt.
    pub generation: u64,
    pub last_payload: Option<EncodedPayload>,
    pub torn_down: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    SubmitRequested(ImageReference),
    EncodeDone {
        generation: u64,
        result: Result<EncodedPayload, FailureReason>,
    },
    RetryRequested,
    ScoreDone {
        generation: u64,
        result: Result<ClassificationResult, FailureReason>,
    },
    TornDown,
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::EncodeDone {
                generation,
                result: Ok(payload),
            } => format!(
                "EncodeDone {{ generation: {}, payload: {} bytes }}",
                generation,
                payload.len()
            ),
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Encode {
        generation: u64,
        image: ImageReference,
    },
    Score {
        generation: u64,
        payload: EncodedPayload,
    },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::Score {
                generation,
                payload,
            } => format!(
                "Score {{ generation: {}, payload: {} bytes }}",
                generation,
                payload.len()
            ),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![])
}

pub fn transition(model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    if model.torn_down {
        return (model, vec![]);
    }

    match msg {
        Msg::TornDown => (
            Model {
                torn_down: true,
                ..model
            },
            vec![],
        ),

        // Last submitted wins: whatever was in flight is superseded.
        Msg::SubmitRequested(image) => {
            let generation = model.generation + 1;
            (
                Model {
                    state: RequestState::Idle,
                    generation,
                    last_payload: None,
                    ..model
                },
                vec![Effect::Encode { generation, image }],
            )
        }

        Msg::EncodeDone { generation, result } => {
            if generation != model.generation || model.state != RequestState::Idle {
                return (model, vec![]);
            }

            match result {
                Ok(payload) => (
                    Model {
                        state: RequestState::Pending,
                        last_payload: Some(payload.clone()),
                        ..model
                    },
                    vec![Effect::Score {
                        generation,
                        payload,
                    }],
                ),
                Err(reason) => (
                    Model {
                        state: RequestState::Error(reason),
                        last_payload: None,
                        ..model
                    },
                    vec![],
                ),
            }
        }

        Msg::RetryRequested => match (&model.state, &model.last_payload) {
            (RequestState::Error(_), Some(payload)) => {
                let generation = model.generation + 1;
                let payload = payload.clone();
                (
                    Model {
                        state: RequestState::Pending,
                        generation,
                        ..model
                    },
                    vec![Effect::Score {
                        generation,
                        payload,
                    }],
                )
            }
            _ => (model, vec![]),
        },

        Msg::ScoreDone { generation, result } => {
            if generation != model.generation || model.state != RequestState::Pending {
                return (model, vec![]);
            }

            let state = match result {
                Ok(classification) => RequestState::Success(classification),
                Err(reason) => RequestState::Error(reason),
            };

            (Model { state, ..model }, vec![])
        }
    }
}
