use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

type TransitionFn<TModel, TMsg, TEffect> =
    Box<dyn Fn(TModel, TMsg) -> (TModel, Vec<TEffect>) + Send + Sync>;
type RenderFn<TModel, TView> = Box<dyn Fn(&TModel) -> TView + Send + Sync>;

/// Holds a model and only lets it change through `transition_fn`.
///
/// Every accepted message produces a new model and the effects the caller must
/// run. The view rendered from the new model is published to subscribers
/// whenever it differs from the previous one.
pub struct StateMachine<TModel, TMsg, TEffect, TView> {
    model: Mutex<TModel>,
    transition_fn: TransitionFn<TModel, TMsg, TEffect>,
    render_fn: RenderFn<TModel, TView>,
    view_sender: watch::Sender<TView>,
}

impl<TModel, TMsg, TEffect, TView> StateMachine<TModel, TMsg, TEffect, TView>
where
    TModel: Clone + Send,
    TView: Clone + PartialEq + Send + Sync,
{
    pub fn new<T, R>(init: TModel, transition_fn: T, render_fn: R) -> Self
    where
        T: Fn(TModel, TMsg) -> (TModel, Vec<TEffect>) + Send + Sync + 'static,
        R: Fn(&TModel) -> TView + Send + Sync + 'static,
    {
        let (view_sender, _) = watch::channel(render_fn(&init));

        Self {
            model: Mutex::new(init),
            transition_fn: Box::new(transition_fn),
            render_fn: Box::new(render_fn),
            view_sender,
        }
    }

    pub fn dispatch(&self, msg: TMsg) -> Vec<TEffect> {
        let mut model = self.lock();
        let (new_model, effects) = (self.transition_fn)(model.clone(), msg);
        let view = (self.render_fn)(&new_model);
        *model = new_model;

        // Published under the model lock so subscribers see views in transition order.
        self.view_sender.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });

        effects
    }

    pub fn model(&self) -> TModel {
        self.lock().clone()
    }

    pub fn view(&self) -> TView {
        self.view_sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TView> {
        self.view_sender.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, TModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> StateMachine<u32, u32, String, bool> {
        StateMachine::new(
            0,
            |count: u32, step: u32| {
                let next = count + step;
                (next, vec![format!("moved to {}", next)])
            },
            |count: &u32| count % 2 == 0,
        )
    }

    #[test]
    fn test_dispatch_applies_transition_and_returns_effects() {
        let machine = counter();

        let effects = machine.dispatch(3);

        assert_eq!(machine.model(), 3);
        assert_eq!(effects, vec!["moved to 3".to_string()]);
        assert!(!machine.view());
    }

    #[test]
    fn test_subscribers_only_see_changed_views() {
        let machine = counter();
        let mut receiver = machine.subscribe();

        machine.dispatch(2);
        assert!(!receiver.has_changed().unwrap());

        machine.dispatch(1);
        assert!(receiver.has_changed().unwrap());
        assert!(!*receiver.borrow_and_update());
    }
}
