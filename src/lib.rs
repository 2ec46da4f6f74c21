//! # Coolie
//!
//! Host wiring for porter booking and live tracking: settings from the
//! environment, an in-memory store, and the page-level entry points.

mod config;
mod provider;

use fare::FareInput;
use platform::{Result, StateStore, Time};
use tracing::{info, warn};
use tracking::{
    Booking, BookingStore, ResolvedSession, SavedBookingRecord, SessionParams, SessionState,
    TrackingSession, TrackingView, save_booking,
};

pub use crate::config::Config;
pub use crate::provider::AppContext;

/// Ways out of the tracking page when no pickup could be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    BackToConfirmation,
    StartBooking,
}

impl Recovery {
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::BackToConfirmation => "/confirmation",
            Self::StartBooking => "/book",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BackToConfirmation => "Back to confirmation",
            Self::StartBooking => "Start a booking",
        }
    }
}

/// What the tracking page shows.
#[derive(Debug)]
pub enum TrackingOutcome {
    Tracking { resolved: ResolvedSession, session: TrackingSession },
    CoordinatesMissing { recovery: [Recovery; 2] },
}

impl TrackingOutcome {
    #[must_use]
    pub fn state(&self) -> SessionState {
        match self {
            Self::Tracking { session, .. } => session.snapshot().state,
            Self::CoordinatesMissing { .. } => SessionState::Uninitialized,
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&TrackingSession> {
        match self {
            Self::Tracking { session, .. } => Some(session),
            Self::CoordinatesMissing { .. } => None,
        }
    }

    /// The page content for the latest snapshot.
    #[must_use]
    pub fn view(&self) -> Option<TrackingView> {
        match self {
            Self::Tracking { resolved, session } => {
                Some(TrackingView::new(resolved, &session.snapshot()))
            }
            Self::CoordinatesMissing { .. } => None,
        }
    }
}

/// Complete a booking: remember it as the last booking so tracking can fall
/// back to it. Never fails; a store that rejects the write is logged.
pub async fn book<P>(booking: &Booking, provider: &P, config: &Config) -> SavedBookingRecord
where
    P: StateStore + Time + Clone,
{
    let store = BookingStore::new(provider.clone(), config.store_key.as_str());
    let record = save_booking(&store, booking, provider).await;
    info!(monotonic_counter.bookings_completed = 1, created_at = record.created_at, "booking completed");
    record
}

/// Open the tracking page for `params`, falling back to the last booking for
/// anything the caller left out.
///
/// Starts the simulation when a pickup resolves, so it must be called from
/// within a tokio runtime.
pub async fn track<P>(params: &SessionParams, provider: &P, config: &Config) -> TrackingOutcome
where
    P: StateStore + Clone,
{
    let store = BookingStore::new(provider.clone(), config.store_key.as_str());
    let saved = store.get().await;

    let Some(resolved) = tracking::resolve(params, saved.as_ref()) else {
        warn!(monotonic_counter.tracking_coordinates_missing = 1, "no pickup coordinates");
        return TrackingOutcome::CoordinatesMissing {
            recovery: [Recovery::BackToConfirmation, Recovery::StartBooking],
        };
    };

    let session = TrackingSession::start(resolved.request, &config.simulation);
    TrackingOutcome::Tracking { resolved, session }
}

/// Upfront fare for the calculator, at the configured rates.
///
/// # Errors
///
/// Returns [`platform::Error::BadRequest`] when weight or distance is not a
/// finite number.
pub fn estimate_fare(input: &FareInput, config: &Config) -> Result<u64> {
    let fare = config.pricing.estimate(input)?;
    info!(monotonic_counter.fare_estimates = 1, fare, coolies = input.coolies, "fare estimated");
    Ok(fare)
}
