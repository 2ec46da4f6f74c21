//! # Tracking Session
//!
//! An owned, timer-driven simulation of a courier approaching pickup. The
//! session owns its driver task: stopping or dropping the session cancels
//! the timer, so no tick can land after the host has torn the view down.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::geo::GeoPoint;
use crate::plan::{SimulationConfig, SimulationPlan};
use crate::progress::{ProgressState, current_position, tick};
use crate::resolve::TrackingRequest;

/// Lifecycle of a tracking session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    /// No pickup has resolved yet.
    #[default]
    Uninitialized,
    Running,
    Arrived,
}

impl SessionState {
    /// Status line shown next to the courier.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "Waiting for pickup",
            Self::Running => "En route to pickup",
            Self::Arrived => "Arrived",
        }
    }
}

/// What subscribers see on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: SessionState,
    pub progress: ProgressState,
    pub position: GeoPoint,
}

impl Snapshot {
    fn new(plan: &SimulationPlan, progress: ProgressState) -> Self {
        let state = if progress.arrived() { SessionState::Arrived } else { SessionState::Running };
        Self { state, progress, position: current_position(plan, progress.t) }
    }
}

/// A running (or finished) simulation for one pickup.
#[derive(Debug)]
pub struct TrackingSession {
    request: TrackingRequest,
    plan: SimulationPlan,
    countdown_secs: u64,
    updates: watch::Receiver<Snapshot>,
    driver: Option<JoinHandle<()>>,
}

impl TrackingSession {
    /// Derive the plan for `request` and start the tick driver.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(request: TrackingRequest, config: &SimulationConfig) -> Self {
        let plan = config.plan(request.pickup);
        let countdown_secs =
            config.effective_duration(request.eta_hint_minutes, plan.duration_seconds);

        let initial = Snapshot {
            state: SessionState::Running,
            progress: ProgressState::initial(countdown_secs),
            position: plan.start_position,
        };
        let period = config.tick_period();
        if period != config.tick_interval {
            warn!(
                requested = ?config.tick_interval,
                period = ?period,
                "tick interval out of range, adjusted"
            );
        }

        let (tx, updates) = watch::channel(initial);
        let driver = tokio::spawn(drive(plan, Instant::now(), period, tx));

        info!(
            monotonic_counter.tracking_sessions_started = 1,
            lat = request.pickup.lat,
            lng = request.pickup.lng,
            duration_secs = plan.duration_seconds,
            countdown_secs,
            "tracking session started"
        );

        Self { request, plan, countdown_secs, updates, driver: Some(driver) }
    }

    /// Restart with `request` if its pickup differs from the current one.
    /// Returns whether a new simulation was started.
    pub fn update(&mut self, request: TrackingRequest, config: &SimulationConfig) -> bool {
        if request.pickup == self.request.pickup {
            self.request.dropoff = request.dropoff;
            return false;
        }
        debug!("pickup changed, restarting simulation");
        *self = Self::start(request, config);
        true
    }

    /// Cancel the driver. The last snapshot stays readable.
    pub fn stop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
            debug!(state = ?self.snapshot().state, "tracking session stopped");
        }
    }

    /// Whether the tick driver is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.driver.as_ref().is_some_and(|driver| !driver.is_finished())
    }

    /// Latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        *self.updates.borrow()
    }

    /// Receive every snapshot the driver publishes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.clone()
    }

    #[must_use]
    pub const fn request(&self) -> &TrackingRequest {
        &self.request
    }

    #[must_use]
    pub const fn plan(&self) -> &SimulationPlan {
        &self.plan
    }

    /// Countdown shown before the first tick.
    #[must_use]
    pub const fn countdown_secs(&self) -> u64 {
        self.countdown_secs
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn drive(
    plan: SimulationPlan, start: Instant, period: Duration, tx: watch::Sender<Snapshot>,
) {
    let mut interval = time::interval_at(start + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let snapshot = Snapshot::new(&plan, tick(start, Instant::now(), &plan));
        tx.send_replace(snapshot);

        if snapshot.state == SessionState::Arrived {
            info!(monotonic_counter.tracking_arrivals = 1, "courier arrived at pickup");
            return;
        }
    }
}
