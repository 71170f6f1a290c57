//! Queue of [`ChatEvent`]s from the [`Conversation`](crate::conversation::Conversation)
//! to the egui frame loop.
//!
//! The conversation pushes turn and session events as they happen; the app
//! takes the whole batch at the top of each frame and folds it into `UiState`.
//! Everything runs on the browser's one thread, so a shared `RefCell` is enough.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use chat_types::event::ChatEvent;

/// Handle to the shared queue. Clones push to and drain from the same queue.
#[derive(Clone, Default)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<ChatEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: ChatEvent) {
        log::trace!("event: {:?}", event);
        self.queue.borrow_mut().push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<ChatEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }
}
