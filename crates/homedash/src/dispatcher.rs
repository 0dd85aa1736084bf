//! Dispatcher for middleware action dispatch
//!
//! Middleware and background tasks never touch state directly. They send
//! follow-up actions through the dispatcher; the store picks them up and
//! runs each one through the full middleware chain from the beginning.

use crate::actions::Action;
use std::sync::mpsc::Sender;

/// Cloneable handle for sending actions back into the store
#[derive(Debug, Clone)]
pub struct Dispatcher {
    action_tx: Sender<Action>,
}

impl Dispatcher {
    pub fn new(action_tx: Sender<Action>) -> Self {
        Self { action_tx }
    }

    /// Queue an action; it is processed after the current one completes
    pub fn dispatch(&self, action: Action) {
        if let Err(e) = self.action_tx.send(action) {
            // Only happens during shutdown, once the store is gone
            log::warn!("Dispatcher: failed to send action: {}", e);
        }
    }
}
