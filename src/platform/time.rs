//! Wall clock and fixed-interval tick driver

use crate::consts::{MAX_FRAME_DT, MAX_TICKS_PER_ADVANCE, TICK_SECONDS};

/// Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Converts elapsed frame time into whole session ticks.
///
/// The caller feeds real elapsed seconds and runs `GameEngine::tick` once per
/// returned tick, in order. Long stalls (hidden tab, debugger) are clamped so
/// the game never fast-forwards through a pile of missed seconds.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: f64,
    accumulator: f64,
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(TICK_SECONDS)
    }
}

impl TickClock {
    pub fn new(interval: f64) -> Self {
        Self {
            interval: interval.max(f64::EPSILON),
            accumulator: 0.0,
        }
    }

    /// Add `dt` seconds; returns how many ticks are now due
    pub fn advance(&mut self, dt: f64) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= self.interval && ticks < MAX_TICKS_PER_ADVANCE {
            self.accumulator -= self.interval;
            ticks += 1;
        }
        // Anything the cap left behind is dropped, not carried forward
        if ticks == MAX_TICKS_PER_ADVANCE {
            self.accumulator = self.accumulator.min(self.interval);
        }
        ticks
    }

    /// Forget partial progress (on pause/resume/start)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
