//! Engine → presentation notifications
//!
//! The engine calls `on_state_change` after every mutation and
//! `on_screen_change` when a session starts or ends. A screen change is always
//! preceded by the state change it depends on.

use std::cell::RefCell;
use std::rc::Rc;

use super::state::{GameScreen, GameState};

/// Receives engine notifications
pub trait GameObserver {
    fn on_state_change(&mut self, state: &GameState);
    fn on_screen_change(&mut self, screen: GameScreen);
}

/// Ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl GameObserver for NullObserver {
    fn on_state_change(&mut self, _state: &GameState) {}
    fn on_screen_change(&mut self, _screen: GameScreen) {}
}

/// A recorded notification
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    State(GameState),
    Screen(GameScreen),
}

/// Queues notifications for later draining. Clones share the queue, so one
/// handle can go into the engine while another is polled by the UI loop.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    queue: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Most recent state snapshot, if any
    pub fn last_state(&self) -> Option<GameState> {
        self.queue.borrow().iter().rev().find_map(|n| match n {
            Notification::State(state) => Some(state.clone()),
            Notification::Screen(_) => None,
        })
    }

    /// Screens in the order they were announced
    pub fn screens(&self) -> Vec<GameScreen> {
        self.queue
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notification::Screen(screen) => Some(*screen),
                Notification::State(_) => None,
            })
            .collect()
    }
}

impl GameObserver for RecordingObserver {
    fn on_state_change(&mut self, state: &GameState) {
        self.queue
            .borrow_mut()
            .push(Notification::State(state.clone()));
    }

    fn on_screen_change(&mut self, screen: GameScreen) {
        self.queue.borrow_mut().push(Notification::Screen(screen));
    }
}
