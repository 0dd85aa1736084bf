use std::sync::mpsc::{channel, Receiver};

use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::reducers::app_reducer::reduce;
use crate::state::AppState;

/// Store - holds application state and manages the Redux loop
pub struct Store {
    state: AppState,
    middleware: Vec<Box<dyn Middleware>>,
    dispatcher: Dispatcher,
    action_rx: Receiver<Action>,
}

impl Store {
    pub fn new(initial_state: AppState) -> Self {
        let (action_tx, action_rx) = channel();
        Self {
            state: initial_state,
            middleware: Vec::new(),
            dispatcher: Dispatcher::new(action_tx),
            action_rx,
        }
    }

    /// Add middleware to the store; they run in insertion order
    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Process an action, then everything it caused
    pub fn dispatch(&mut self, action: Action) {
        self.process(action);
        self.process_pending();
    }

    /// Process actions queued by middleware or background tasks
    pub fn process_pending(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            self.process(action);
        }
    }

    /// Run one action through the middleware chain and, unless consumed,
    /// the root reducer
    fn process(&mut self, action: Action) {
        for middleware in &mut self.middleware {
            if !middleware.handle(&action, &self.state, &self.dispatcher) {
                return;
            }
        }

        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, &action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{CommandPaletteAction, GlobalAction};

    /// Consumes Quit and turns it into opening the palette
    struct Redirect;

    impl Middleware for Redirect {
        fn handle(&mut self, action: &Action, _state: &AppState, dispatcher: &Dispatcher) -> bool {
            if let Action::Global(GlobalAction::Quit) = action {
                dispatcher.dispatch(Action::CommandPalette(CommandPaletteAction::Open));
                return false;
            }
            true
        }
    }

    #[test]
    fn test_consumed_action_skips_reducer() {
        let mut store = Store::new(AppState::default());
        store.add_middleware(Box::new(Redirect));

        store.dispatch(Action::Global(GlobalAction::Quit));

        assert!(store.state().running);
        assert!(store.state().command_palette.is_open());
    }

    #[test]
    fn test_actions_from_other_threads_are_processed_on_demand() {
        let mut store = Store::new(AppState::default());
        let dispatcher = store.dispatcher().clone();

        std::thread::spawn(move || dispatcher.dispatch(Action::Global(GlobalAction::Quit)))
            .join()
            .unwrap();
        assert!(store.state().running);

        store.process_pending();
        assert!(!store.state().running);
    }
}
