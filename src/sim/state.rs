//! Session state and core gameplay types
//!
//! Everything the presentation layer needs to render a frame lives in
//! [`GameState`]; it only ever sees clones of it.

use serde::Serialize;

use crate::catalog::Recipe;
use crate::config::GameConfig;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No session started yet
    Inactive,
    /// Clock running, orders coming in
    Active,
    /// Clock stopped, state kept
    Paused,
    /// Session over; `start_game` begins a new one
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionOutcome {
    /// An order ran out of time with ingredients still missing
    OrderExpired,
    /// The session clock hit zero
    OutOfTime,
    /// Served the dish at the last level
    Completed,
    /// The player quit
    Abandoned,
}

/// Screens the presentation layer can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameScreen {
    MainMenu,
    Game,
    HighScores,
    Instructions,
    GameOver,
}

impl GameScreen {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameScreen::MainMenu => "main-menu",
            GameScreen::Game => "game",
            GameScreen::HighScores => "high-scores",
            GameScreen::Instructions => "instructions",
            GameScreen::GameOver => "game-over",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "main-menu" => Some(GameScreen::MainMenu),
            "game" => Some(GameScreen::Game),
            "high-scores" => Some(GameScreen::HighScores),
            "instructions" => Some(GameScreen::Instructions),
            "game-over" => Some(GameScreen::GameOver),
            _ => None,
        }
    }
}

/// A customer's order: a recipe on a countdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub recipe: Recipe,
    /// Seconds left before the customer gives up
    pub time_left: u32,
    /// Seconds the order started with
    pub max_time: u32,
}

impl Order {
    pub fn new(id: String, recipe: Recipe) -> Self {
        let time_limit = recipe.time_limit;
        Self {
            id,
            recipe,
            time_left: time_limit,
            max_time: time_limit,
        }
    }

    /// Remaining share of the order's time (1.0 = untouched)
    pub fn time_fraction(&self) -> f64 {
        if self.max_time == 0 {
            return 0.0;
        }
        self.time_left as f64 / self.max_time as f64
    }
}

/// How many of the order's ingredients are in the pan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrderProgress {
    pub current: usize,
    pub total: usize,
}

impl OrderProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.current == self.total
    }
}

/// Complete session state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub score: u64,
    /// Starts at 1, +1 per dish served
    pub level: u32,
    /// Session clock (seconds)
    pub time_left: u32,
    pub current_order: Option<Order>,
    /// Pan contents, in the order they were added (duplicates allowed)
    pub cooking: Vec<String>,
    pub phase: SessionPhase,
    /// Set once the session has ended
    pub outcome: Option<SessionOutcome>,
    /// Unix ms when the session started (0 before the first start)
    pub started_at_ms: f64,
}

impl GameState {
    /// Fresh, not-yet-started state
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            level: 1,
            time_left: config.initial_time,
            current_order: None,
            cooking: Vec::new(),
            phase: SessionPhase::Inactive,
            outcome: None,
            started_at_ms: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// True when the pan covers every ingredient of the current order
    pub fn can_serve(&self) -> bool {
        self.current_order
            .as_ref()
            .is_some_and(|order| order.recipe.is_satisfied_by(&self.cooking))
    }

    pub fn order_progress(&self) -> OrderProgress {
        match &self.current_order {
            Some(order) => OrderProgress {
                current: order.recipe.covered_by(&self.cooking),
                total: order.recipe.ingredients.len(),
            },
            None => OrderProgress::default(),
        }
    }

    /// Required ingredients not yet in the pan
    pub fn missing_ingredients(&self) -> Vec<&'static str> {
        match &self.current_order {
            Some(order) => order
                .recipe
                .ingredients
                .iter()
                .copied()
                .filter(|required| !self.cooking.iter().any(|id| id.as_str() == *required))
                .collect(),
            None => Vec::new(),
        }
    }
}
