//! View model handed to the tracking page and its map surface.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::resolve::ResolvedSession;
use crate::session::Snapshot;

/// Map centre when nothing has resolved (New Delhi).
pub const FALLBACK_CENTER: GeoPoint = GeoPoint::new(28.6139, 77.209);

/// Everything a map surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub center: GeoPoint,
    pub pickup: GeoPoint,
    pub dropoff: Option<GeoPoint>,
    pub current_position: GeoPoint,
    pub pickup_label: Option<String>,
    pub dropoff_label: Option<String>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(resolved: &ResolvedSession, snapshot: &Snapshot) -> Self {
        let request = &resolved.request;
        Self {
            center: map_center(Some(request.pickup), request.dropoff),
            pickup: request.pickup,
            dropoff: request.dropoff,
            current_position: snapshot.position,
            pickup_label: Some(resolved.pickup_label.clone()),
            dropoff_label: Some(resolved.dropoff_label.clone()),
        }
    }
}

/// Text and map content of the tracking page at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub name: String,
    pub initials: String,
    pub status: String,
    pub eta_label: String,
    pub pickup_label: String,
    pub dropoff_label: String,
    pub frame: RenderFrame,
}

impl TrackingView {
    #[must_use]
    pub fn new(resolved: &ResolvedSession, snapshot: &Snapshot) -> Self {
        Self {
            name: resolved.name.clone(),
            initials: initials(&resolved.name),
            status: snapshot.state.label().to_string(),
            eta_label: format_eta(snapshot.progress.remaining_seconds),
            pickup_label: resolved.pickup_label.clone(),
            dropoff_label: resolved.dropoff_label.clone(),
            frame: RenderFrame::new(resolved, snapshot),
        }
    }
}

/// Midpoint of pickup and drop-off, else pickup, else the fallback centre.
#[must_use]
pub fn map_center(pickup: Option<GeoPoint>, dropoff: Option<GeoPoint>) -> GeoPoint {
    match (pickup, dropoff) {
        (Some(pickup), Some(dropoff)) => pickup.midpoint(&dropoff),
        (Some(pickup), None) => pickup,
        _ => FALLBACK_CENTER,
    }
}

/// Countdown as `m:ss`.
#[must_use]
pub fn format_eta(remaining_secs: u64) -> String {
    format!("{}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// First character of each space-separated word.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split(' ').filter_map(|word| word.chars().next()).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::progress::ProgressState;
    use crate::resolve::TrackingRequest;
    use crate::session::SessionState;

    #[test]
    fn eta_format() {
        assert_eq!(format_eta(0), "0:00");
        assert_eq!(format_eta(59), "0:59");
        assert_eq!(format_eta(600), "10:00");
        assert_eq!(format_eta(125), "2:05");
    }

    #[test]
    fn name_initials() {
        assert_eq!(initials("Assigned Coolie"), "AC");
        assert_eq!(initials("Ravi  Kumar"), "RK");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn centre() {
        let pickup = GeoPoint::new(19.0, 72.0);
        let dropoff = GeoPoint::new(20.0, 73.0);
        assert_eq!(map_center(Some(pickup), Some(dropoff)), GeoPoint::new(19.5, 72.5));
        assert_eq!(map_center(Some(pickup), None), pickup);
        assert_eq!(map_center(None, None), FALLBACK_CENTER);
    }

    #[test]
    fn view_from_snapshot() {
        let resolved = ResolvedSession {
            request: TrackingRequest {
                pickup: GeoPoint::new(19.0, 72.0),
                dropoff: None,
                eta_hint_minutes: None,
            },
            pickup_label: "Gate 2".to_string(),
            dropoff_label: "Taxi stand".to_string(),
            name: "Assigned Coolie".to_string(),
        };
        let snapshot = Snapshot {
            state: SessionState::Arrived,
            progress: ProgressState { t: 1.0, remaining_seconds: 0 },
            position: GeoPoint::new(19.0, 72.0),
        };

        let view = TrackingView::new(&resolved, &snapshot);
        assert_eq!(view.status, "Arrived");
        assert_eq!(view.eta_label, "0:00");
        assert_eq!(view.initials, "AC");
        assert_eq!(view.frame.center, resolved.request.pickup);
        assert_eq!(view.frame.pickup_label.as_deref(), Some("Gate 2"));
    }
}
