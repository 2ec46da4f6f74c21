//! # Resolve
//!
//! Builds a [`TrackingRequest`] from caller parameters, falling back to the
//! last saved booking field by field.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::booking::SavedBookingRecord;
use crate::geo::GeoPoint;

pub const DEFAULT_PICKUP_LABEL: &str = "Pickup Location";
pub const DEFAULT_DROPOFF_LABEL: &str = "Drop-off Location";
pub const DEFAULT_COURIER_NAME: &str = "Assigned Coolie";

/// Raw session-start parameters. Every value is an optional string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub px: Option<String>,
    pub py: Option<String>,
    pub dx: Option<String>,
    pub dy: Option<String>,
    pub pt: Option<String>,
    pub dt: Option<String>,
    pub name: Option<String>,
    pub eta: Option<String>,
}

impl SessionParams {
    /// Parse a `key=value&...` query string. A leading `?` is ignored and
    /// values are form-decoded (`+` is a space).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Build from already-decoded key/value pairs. Unknown keys are skipped.
    /// A key given more than once is ambiguous and counts as absent.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        let mut seen = HashSet::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            let Some(slot) = params.slot(key) else {
                continue;
            };
            if seen.insert(key.to_string()) {
                *slot = Some(value.into());
            } else {
                debug!(key, "ignoring repeated parameter");
                *slot = None;
            }
        }
        params
    }

    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "px" => Some(&mut self.px),
            "py" => Some(&mut self.py),
            "dx" => Some(&mut self.dx),
            "dy" => Some(&mut self.dy),
            "pt" => Some(&mut self.pt),
            "dt" => Some(&mut self.dt),
            "name" => Some(&mut self.name),
            "eta" => Some(&mut self.eta),
            _ => None,
        }
    }
}

/// Inputs to one tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRequest {
    pub pickup: GeoPoint,
    pub dropoff: Option<GeoPoint>,
    pub eta_hint_minutes: Option<f64>,
}

/// A [`TrackingRequest`] together with the display fields resolved
/// alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSession {
    pub request: TrackingRequest,
    pub pickup_label: String,
    pub dropoff_label: String,
    pub name: String,
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Caller,
    Saved,
}

/// Resolve a whole session. `None` means no pickup could be found and the
/// caller must show the coordinates-missing state.
#[must_use]
pub fn resolve(
    params: &SessionParams, saved: Option<&SavedBookingRecord>,
) -> Option<ResolvedSession> {
    let Some((pickup, source)) = resolve_pickup(params, saved) else {
        debug!("no pickup coordinates found");
        return None;
    };
    debug!(source = ?source, lat = pickup.lat, lng = pickup.lng, "resolved pickup");

    let dropoff = resolve_dropoff(params, saved).map(|(point, _)| point);
    let request = TrackingRequest { pickup, dropoff, eta_hint_minutes: resolve_eta(params, saved) };

    Some(ResolvedSession {
        request,
        pickup_label: params.pt.clone().unwrap_or_else(|| DEFAULT_PICKUP_LABEL.to_string()),
        dropoff_label: params.dt.clone().unwrap_or_else(|| DEFAULT_DROPOFF_LABEL.to_string()),
        name: resolve_name(params, saved),
    })
}

/// Pickup from the caller's `px`/`py`, else the saved booking.
#[must_use]
pub fn resolve_pickup(
    params: &SessionParams, saved: Option<&SavedBookingRecord>,
) -> Option<(GeoPoint, Source)> {
    if let Some(point) = parse_point(params.px.as_deref(), params.py.as_deref()) {
        return Some((point, Source::Caller));
    }
    saved.map(|record| (record.pickup(), Source::Saved))
}

/// Drop-off from the caller's `dx`/`dy`, else the saved booking.
#[must_use]
pub fn resolve_dropoff(
    params: &SessionParams, saved: Option<&SavedBookingRecord>,
) -> Option<(GeoPoint, Source)> {
    if let Some(point) = parse_point(params.dx.as_deref(), params.dy.as_deref()) {
        return Some((point, Source::Caller));
    }
    saved.and_then(SavedBookingRecord::dropoff).map(|point| (point, Source::Saved))
}

/// Courier display name: caller, then saved booking, then the default.
#[must_use]
pub fn resolve_name(params: &SessionParams, saved: Option<&SavedBookingRecord>) -> String {
    params
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| saved.and_then(|record| record.name.as_deref()).filter(|name| !name.is_empty()))
        .unwrap_or(DEFAULT_COURIER_NAME)
        .to_string()
}

/// ETA hint in minutes. Only positive finite numbers count; `None` lets the
/// simulation apply its default.
#[must_use]
pub fn resolve_eta(params: &SessionParams, saved: Option<&SavedBookingRecord>) -> Option<f64> {
    let positive = |raw: Option<&str>| parse_number(raw?).filter(|eta| *eta > 0.0);
    positive(params.eta.as_deref())
        .or_else(|| positive(saved.and_then(|record| record.eta.as_deref())))
}

/// Longitude/latitude strings to a point. Both must be present, non-empty
/// and finite.
#[must_use]
pub fn parse_point(lng: Option<&str>, lat: Option<&str>) -> Option<GeoPoint> {
    let lng = lng.filter(|s| !s.is_empty())?;
    let lat = lat.filter(|s| !s.is_empty())?;
    Some(GeoPoint { lat: parse_number(lat)?, lng: parse_number(lng)? })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}
