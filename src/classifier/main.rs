use crate::classifier::core::{init, transition, Effect, Model, Msg, RequestState};
use crate::image_codec::interface::{ImageCodec, ImageReference};
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::scoring_client::interface::ScoringClient;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("retry is only available after a failed request (current state: {0})")]
    RetryRejected(&'static str),

    #[error("classifier has been shut down")]
    ShutDown,
}

/// Drives one classification attempt at a time for a single screen or session.
///
/// Cheap to clone; clones share the same state. Must be used from within a
/// tokio runtime because effects run on spawned tasks.
#[derive(Clone)]
pub struct Classifier {
    pub(super) machine: Arc<StateMachine<Model, Msg, Effect, RequestState>>,
    pub(super) logger: Arc<dyn Logger + Send + Sync>,
    pub(super) image_codec: Arc<dyn ImageCodec + Send + Sync>,
    pub(super) scoring_client: Arc<dyn ScoringClient + Send + Sync>,
    in_flight: Arc<Mutex<Option<JoinHandle<()>>>>,
    torn_down: Arc<watch::Sender<bool>>,
}

impl Classifier {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        image_codec: Arc<dyn ImageCodec + Send + Sync>,
        scoring_client: Arc<dyn ScoringClient + Send + Sync>,
    ) -> Self {
        let (model, _) = init();
        let machine = StateMachine::new(model, transition, |model: &Model| model.state.clone());

        Self {
            machine: Arc::new(machine),
            logger: logger.with_namespace("classifier"),
            image_codec,
            scoring_client,
            in_flight: Arc::new(Mutex::new(None)),
            torn_down: Arc::new(watch::channel(false).0),
        }
    }

    /// Encodes `image` and scores it, superseding any attempt still in flight.
    pub fn submit(&self, image: ImageReference) -> Result<(), ClassifierError> {
        if self.machine.model().torn_down {
            return Err(ClassifierError::ShutDown);
        }
        self.dispatch(Msg::SubmitRequested(image), true);
        Ok(())
    }

    /// Replays the last payload after a retryable failure.
    pub fn retry(&self) -> Result<(), ClassifierError> {
        if self.machine.model().torn_down {
            return Err(ClassifierError::ShutDown);
        }
        if self.dispatch(Msg::RetryRequested, false) {
            return Ok(());
        }
        Err(ClassifierError::RetryRejected(self.current_state().name()))
    }

    pub fn current_state(&self) -> RequestState {
        self.machine.view()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.machine.subscribe()
    }

    /// Waits until the state is Success or Error and returns it.
    ///
    /// After `shutdown` the state is frozen, so this returns the last snapshot
    /// instead, which may still be Idle or Pending.
    pub async fn settled(&self) -> RequestState {
        let mut states = self.subscribe();
        let mut torn_down = self.torn_down.subscribe();

        tokio::select! {
            settled = states.wait_for(RequestState::is_settled) => match settled {
                Ok(state) => state.clone(),
                Err(_) => self.current_state(),
            },
            _ = torn_down.wait_for(|torn_down| *torn_down) => self.current_state(),
        }
    }

    /// Abandons in-flight work. Nothing changes the state afterwards.
    pub fn shutdown(&self) {
        self.dispatch(Msg::TornDown, true);
        self.torn_down.send_replace(true);
    }

    /// Applies `msg` and spawns its effects. Returns whether any effect was spawned.
    ///
    /// The in-flight lock is held across the transition so a superseding submit
    /// and a completing task cannot interleave their spawns.
    pub(super) fn dispatch(&self, msg: Msg, supersede: bool) -> bool {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if supersede {
            if let Some(handle) = in_flight.take() {
                handle.abort();
            }
        }

        let _ = self
            .logger
            .info(&format!("msg: {}", msg.to_display_string()));

        let effects = self.machine.dispatch(msg);

        let _ = self.logger.info(&format!(
            "state: {}, effects: [{}]",
            self.machine.view().name(),
            effects
                .iter()
                .map(Effect::to_display_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));

        let spawned = !effects.is_empty();

        for effect in effects {
            let self_clone = self.clone();
            *in_flight = Some(tokio::spawn(async move {
                self_clone.run_effect(effect).await;
            }));
        }

        spawned
    }
}
