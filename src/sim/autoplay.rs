//! Idle/demo mode: a bot that cooks whatever is ordered

use super::engine::GameEngine;
use super::state::GameState;

/// One player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Add(&'static str),
    Serve,
}

/// Picks the first missing ingredient, serves once the pan is complete.
///
/// `think_ticks` makes it wait that many extra calls between actions, so a
/// demo at one action per tick looks less robotic.
#[derive(Debug, Clone, Default)]
pub struct Autoplay {
    think_ticks: u32,
    cooldown: u32,
}

impl Autoplay {
    pub fn new(think_ticks: u32) -> Self {
        Self {
            think_ticks,
            cooldown: 0,
        }
    }

    /// Decide what to do next, if anything
    pub fn next_action(&mut self, state: &GameState) -> Option<PlayerAction> {
        if !state.is_active() || state.current_order.is_none() {
            return None;
        }
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }
        self.cooldown = self.think_ticks;

        match state.missing_ingredients().first() {
            Some(&id) => Some(PlayerAction::Add(id)),
            None => Some(PlayerAction::Serve),
        }
    }

    /// Decide and carry out one action. Returns whether it took effect.
    pub fn step(&mut self, engine: &mut GameEngine) -> bool {
        match self.next_action(&engine.state()) {
            Some(PlayerAction::Add(id)) => engine.add_ingredient(id),
            Some(PlayerAction::Serve) => engine.serve_dish(),
            None => false,
        }
    }
}
