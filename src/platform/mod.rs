//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - The fixed-cadence tick driver
//! - Storage (see `persistence::storage`)

pub mod time;

pub use time::{TickClock, now_ms};
