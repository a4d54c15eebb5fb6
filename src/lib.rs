//! Kitchen Rush - a time-management cooking game
//!
//! Core modules:
//! - `catalog`: Ingredients, recipes and lookups
//! - `sim`: Session engine (orders, timers, scoring, win/loss)
//! - `highscores`: Top-10 leaderboard
//! - `persistence`: Storage backends and the save envelope
//! - `platform`: Browser/native clock and tick driver
//! - `config`: Game balance constants

pub mod catalog;
pub mod config;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;

pub use catalog::{Catalog, Category, Difficulty, Ingredient, Language, Recipe};
pub use config::GameConfig;
pub use highscores::{HighScoreEntry, HighScoreStore};
pub use sim::{GameEngine, GameObserver, GameScreen, GameState, SessionPhase};

/// Timing constants
pub mod consts {
    /// Length of one session tick (seconds)
    pub const TICK_SECONDS: f64 = 1.0;
    /// Longest frame the tick clock will account for (hidden tab, debugger)
    pub const MAX_FRAME_DT: f64 = 3.0;
    /// Maximum ticks delivered per clock advance
    pub const MAX_TICKS_PER_ADVANCE: u32 = 3;
}
