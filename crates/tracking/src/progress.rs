//! # Progress
//!
//! Time-driven progress along a [`SimulationPlan`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::geo::GeoPoint;
use crate::plan::{SimulationPlan, round_secs};

/// Fraction of the approach completed and the seconds left on the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub t: f64,
    pub remaining_seconds: u64,
}

impl ProgressState {
    /// Progress before the first tick.
    #[must_use]
    pub const fn initial(countdown_secs: u64) -> Self {
        Self { t: 0.0, remaining_seconds: countdown_secs }
    }

    /// Progress after `elapsed` on `plan`.
    #[must_use]
    pub fn at(elapsed: Duration, plan: &SimulationPlan) -> Self {
        let elapsed = elapsed.as_secs_f64();

        #[allow(clippy::cast_precision_loss)]
        let duration = plan.duration_seconds as f64;

        let t = if duration > 0.0 { (elapsed / duration).clamp(0.0, 1.0) } else { 1.0 };
        Self { t, remaining_seconds: round_secs(duration - elapsed) }
    }

    /// Whether the courier has reached pickup.
    #[must_use]
    pub fn arrived(&self) -> bool {
        self.t >= 1.0
    }
}

/// Progress at `now` for a session that started at `start`.
///
/// A `now` earlier than `start` counts as no time elapsed.
#[must_use]
pub fn tick(start: Instant, now: Instant, plan: &SimulationPlan) -> ProgressState {
    ProgressState::at(now.saturating_duration_since(start), plan)
}

/// Interpolated courier position at fraction `t` of the approach. At
/// `t >= 1` this is exactly the pickup.
#[must_use]
pub fn current_position(plan: &SimulationPlan, t: f64) -> GeoPoint {
    if t >= 1.0 {
        return plan.pickup;
    }
    plan.start_position.lerp(&plan.pickup, t)
}
