//! # Simulation Plan
//!
//! Derives where the simulated courier starts and how long the approach to
//! pickup takes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Distance of the synthetic start position from pickup.
pub const APPROACH_OFFSET_KM: f64 = 1.0;

/// Bearing of the synthetic start position from pickup (southeast).
pub const APPROACH_BEARING_DEG: f64 = 135.0;

/// Effective courier speed.
pub const APPROACH_KM_PER_MINUTE: f64 = 1.0;

/// Shortest approach the animation will ever run for.
pub const MIN_APPROACH_SECS: u64 = 60;

/// ETA hint assumed when neither the caller nor the saved booking supply one.
pub const DEFAULT_ETA_MINUTES: f64 = 10.0;

/// Tick cadence for a running session.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Slowest tick cadence a session accepts.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Tunables for the tracking simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub offset_km: f64,
    pub bearing_deg: f64,
    pub km_per_minute: f64,
    pub min_duration_secs: u64,
    pub default_eta_minutes: f64,
    pub tick_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            offset_km: APPROACH_OFFSET_KM,
            bearing_deg: APPROACH_BEARING_DEG,
            km_per_minute: APPROACH_KM_PER_MINUTE,
            min_duration_secs: MIN_APPROACH_SECS,
            default_eta_minutes: DEFAULT_ETA_MINUTES,
            tick_interval: TICK_INTERVAL,
        }
    }
}

/// Start position and approach duration for one pickup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPlan {
    pub start_position: GeoPoint,
    pub pickup: GeoPoint,
    pub duration_seconds: u64,
}

impl SimulationConfig {
    /// The cadence a session ticks at. A zero interval falls back to
    /// [`TICK_INTERVAL`] and anything slower than [`MAX_TICK_INTERVAL`] is
    /// capped.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        if self.tick_interval.is_zero() {
            return TICK_INTERVAL;
        }
        self.tick_interval.min(MAX_TICK_INTERVAL)
    }

    /// Derive the plan for `pickup`. Pure and deterministic.
    #[must_use]
    pub fn plan(&self, pickup: GeoPoint) -> SimulationPlan {
        let start_position = pickup.offset(self.offset_km, self.bearing_deg);
        let distance_km = start_position.distance_km(&pickup);
        let travel_secs = round_secs(distance_km / self.km_per_minute * 60.0);

        SimulationPlan {
            start_position,
            pickup,
            duration_seconds: travel_secs.max(self.min_duration_secs),
        }
    }

    /// The countdown a session opens with: the larger of the ETA hint and the
    /// time the animation needs. Invalid or missing hints fall back to the
    /// default ETA.
    #[must_use]
    pub fn effective_duration(&self, eta_hint_minutes: Option<f64>, plan_duration: u64) -> u64 {
        let minutes = eta_hint_minutes
            .filter(|eta| eta.is_finite() && *eta > 0.0)
            .unwrap_or(self.default_eta_minutes);
        round_secs(minutes * 60.0).max(plan_duration)
    }
}

/// Derive a plan using the default configuration.
#[must_use]
pub fn derive_plan(pickup: GeoPoint) -> SimulationPlan {
    SimulationConfig::default().plan(pickup)
}

/// Opening countdown using the default configuration.
#[must_use]
pub fn effective_duration(eta_hint_minutes: Option<f64>, plan_duration: u64) -> u64 {
    SimulationConfig::default().effective_duration(eta_hint_minutes, plan_duration)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn round_secs(secs: f64) -> u64 {
    if secs.is_nan() || secs <= 0.0 {
        return 0;
    }
    secs.round() as u64
}
