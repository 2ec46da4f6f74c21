//! Booking and tracking through the host entry points.

use std::time::Duration;

use coolie::{AppContext, Config, Recovery, TrackingOutcome};
use fare::{FareInput, Pricing};
use pretty_assertions::assert_eq;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};
use tracking::{
    Booking, GeoPoint, LAST_BOOKING_KEY, SessionParams, SessionState, SimulationConfig,
};

fn config() -> Config {
    Config {
        store_key: LAST_BOOKING_KEY.to_string(),
        simulation: SimulationConfig::default(),
        pricing: Pricing::default(),
    }
}

fn init_tracing() {
    let _ = Registry::default().with(EnvFilter::new("debug")).with(fmt::layer()).try_init();
}

fn delhi_booking() -> Booking {
    Booking {
        pickup: GeoPoint::new(28.6139, 77.209),
        dropoff: Some(GeoPoint::new(28.5562, 77.1)),
        pickup_label: Some("New Delhi Station".to_string()),
        drop_label: Some("Terminal 3".to_string()),
        name: Some("Mohan Lal".to_string()),
        eta: Some("8".to_string()),
    }
}

#[tokio::test(start_paused = true)]
async fn missing_pickup_offers_recovery() {
    init_tracing();
    let provider = AppContext::new();

    let outcome = coolie::track(&SessionParams::default(), &provider, &config()).await;

    let TrackingOutcome::CoordinatesMissing { recovery } = &outcome else {
        panic!("expected missing coordinates, got {outcome:?}");
    };
    assert_eq!(*recovery, [Recovery::BackToConfirmation, Recovery::StartBooking]);
    assert_eq!((*recovery).map(Recovery::route), ["/confirmation", "/book"]);
    assert_eq!(outcome.state(), SessionState::Uninitialized);
    assert!(outcome.session().is_none());
    assert!(outcome.view().is_none());
}

#[tokio::test(start_paused = true)]
async fn caller_eta_sets_countdown() {
    init_tracing();
    let provider = AppContext::new();
    let params = SessionParams::from_query("?px=72.8777&py=19.076&eta=4&name=Ravi+Kumar");

    let outcome = coolie::track(&params, &provider, &config()).await;

    let view = outcome.view().expect("should be tracking");
    assert_eq!(view.eta_label, "4:00");
    assert_eq!(view.status, "En route to pickup");
    assert_eq!(view.name, "Ravi Kumar");
    assert_eq!(view.initials, "RK");
    assert_eq!(view.pickup_label, "Pickup Location");
    assert_eq!(view.frame.pickup, GeoPoint::new(19.076, 72.8777));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let view = outcome.view().expect("should be tracking");
    assert_eq!(view.eta_label, "0:59");
}

#[tokio::test(start_paused = true)]
async fn booking_feeds_tracking() {
    init_tracing();
    let provider = AppContext::new();

    let record = coolie::book(&delhi_booking(), &provider, &config()).await;
    assert!(record.created_at > 0);

    let outcome = coolie::track(&SessionParams::default(), &provider, &config()).await;
    let TrackingOutcome::Tracking { resolved, session } = &outcome else {
        panic!("expected tracking, got {outcome:?}");
    };
    assert_eq!(resolved.request.pickup, GeoPoint::new(28.6139, 77.209));
    assert_eq!(resolved.request.dropoff, Some(GeoPoint::new(28.5562, 77.1)));
    assert_eq!(resolved.name, "Mohan Lal");
    assert_eq!(resolved.pickup_label, "Pickup Location");
    assert_eq!(session.countdown_secs(), 480);
    assert!(session.is_running());
}

#[tokio::test(start_paused = true)]
async fn caller_wins_over_saved() {
    init_tracing();
    let provider = AppContext::new();
    coolie::book(&delhi_booking(), &provider, &config()).await;

    let params = SessionParams::from_query("px=72.8777&py=19.076&pt=Mumbai%20Central");
    let outcome = coolie::track(&params, &provider, &config()).await;

    let view = outcome.view().expect("should be tracking");
    assert_eq!(view.frame.pickup, GeoPoint::new(19.076, 72.8777));
    assert_eq!(view.pickup_label, "Mumbai Central");
    assert_eq!(view.name, "Mohan Lal");
    assert_eq!(view.eta_label, "8:00");
}

#[tokio::test(start_paused = true)]
async fn arrives_and_stops() {
    init_tracing();
    let provider = AppContext::new();
    let params = SessionParams::from_query("px=72.8777&py=19.076");

    let outcome = coolie::track(&params, &provider, &config()).await;
    assert_eq!(outcome.state(), SessionState::Running);

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(outcome.state(), SessionState::Arrived);

    let view = outcome.view().expect("should be tracking");
    assert_eq!(view.status, "Arrived");
    assert_eq!(view.eta_label, "0:00");
    assert_eq!(view.frame.current_position, view.frame.pickup);
    assert!(!outcome.session().is_some_and(tracking::TrackingSession::is_running));
}

#[tokio::test(start_paused = true)]
async fn zero_tick_setting_still_arrives() {
    init_tracing();
    let config = Config::from_lookup(|key| (key == "TRACKING_TICK_MS").then(|| "0".to_string()));
    assert_eq!(config.simulation.tick_interval, Duration::from_secs(1));

    let provider = AppContext::new();
    let params = SessionParams::from_query("px=72.8777&py=19.076");
    let outcome = coolie::track(&params, &provider, &config).await;

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(outcome.state(), SessionState::Arrived);
}

#[test]
fn fare_uses_configured_rates() {
    let input = FareInput::default();
    assert_eq!(coolie::estimate_fare(&input, &config()).unwrap(), 255);

    let config = Config::from_lookup(|key| (key == "FARE_BASE").then(|| "100".to_string()));
    assert_eq!(coolie::estimate_fare(&input, &config).unwrap(), 305);

    let two = FareInput { coolies: 2, ..FareInput::default() };
    assert_eq!(coolie::estimate_fare(&two, &config).unwrap(), 488);

    let bad = FareInput { distance_m: f64::INFINITY, ..FareInput::default() };
    let err = coolie::estimate_fare(&bad, &config).unwrap_err();
    assert_eq!(err.code(), "bad_request");
}
