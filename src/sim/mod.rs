//! Game session simulation
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform concerns:
//! - One-second ticks only, delivered by the caller
//! - Seeded RNG only
//! - Presentation sees cloned snapshots, never live state

pub mod autoplay;
pub mod engine;
pub mod observer;
pub mod scoring;
pub mod state;

pub use autoplay::{Autoplay, PlayerAction};
pub use engine::GameEngine;
pub use observer::{GameObserver, Notification, NullObserver, RecordingObserver};
pub use scoring::{dish_score, time_bonus};
pub use state::{GameScreen, GameState, Order, OrderProgress, SessionOutcome, SessionPhase};
