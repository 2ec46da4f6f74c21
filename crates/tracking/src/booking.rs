//! # Booking
//!
//! The last completed booking, persisted under a single key so a later
//! tracking session can fall back to it.

use platform::{Result, StateStore, Time, storage_error};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::geo::GeoPoint;

/// Default persistence key for the last booking.
pub const LAST_BOOKING_KEY: &str = "coolieconnect:lastBooking";

/// A completed booking, as handed over by the booking flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Booking {
    pub pickup: GeoPoint,
    pub dropoff: Option<GeoPoint>,
    pub pickup_label: Option<String>,
    pub drop_label: Option<String>,
    pub name: Option<String>,
    pub eta: Option<String>,
}

impl Booking {
    /// Query string for the tracking page, using the same keys
    /// [`SessionParams`](crate::SessionParams) reads.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut pairs = vec![
            ("px", self.pickup.lng.to_string()),
            ("py", self.pickup.lat.to_string()),
        ];
        if let Some(dropoff) = self.dropoff {
            pairs.push(("dx", dropoff.lng.to_string()));
            pairs.push(("dy", dropoff.lat.to_string()));
        }
        let optional = [
            ("pt", &self.pickup_label),
            ("dt", &self.drop_label),
            ("name", &self.name),
            ("eta", &self.eta),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// The persisted form of a [`Booking`].
///
/// `px`/`py` are pickup longitude/latitude and `dx`/`dy` the drop-off.
/// A payload without numeric `px` and `py` does not deserialize and is
/// treated as no record at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBookingRecord {
    pub px: f64,
    pub py: f64,
    #[serde(default)]
    pub dx: Option<f64>,
    #[serde(default)]
    pub dy: Option<f64>,
    #[serde(default)]
    pub pickup_label: Option<String>,
    #[serde(default)]
    pub drop_label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub eta: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl SavedBookingRecord {
    /// Build the record for `booking`, stamped at `created_at` (epoch millis).
    #[must_use]
    pub fn new(booking: &Booking, created_at: i64) -> Self {
        Self {
            px: booking.pickup.lng,
            py: booking.pickup.lat,
            dx: booking.dropoff.map(|p| p.lng),
            dy: booking.dropoff.map(|p| p.lat),
            pickup_label: booking.pickup_label.clone(),
            drop_label: booking.drop_label.clone(),
            name: booking.name.clone(),
            eta: booking.eta.clone(),
            created_at,
        }
    }

    #[must_use]
    pub const fn pickup(&self) -> GeoPoint {
        GeoPoint { lat: self.py, lng: self.px }
    }

    /// Drop-off, present only when both coordinates were saved.
    #[must_use]
    pub fn dropoff(&self) -> Option<GeoPoint> {
        Some(GeoPoint { lat: self.dy?, lng: self.dx? })
    }
}

// Older writers stored `eta` as a number.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Persistence port for the last booking, backed by a [`StateStore`].
#[derive(Debug, Clone)]
pub struct BookingStore<S> {
    store: S,
    key: String,
}

impl<S: StateStore> BookingStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The saved booking, if a well-formed one exists.
    ///
    /// Read failures and malformed payloads are logged and reported as no
    /// record.
    pub async fn get(&self) -> Option<SavedBookingRecord> {
        let bytes = match self.store.get(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %self.key, "no saved booking");
                return None;
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read saved booking");
                return None;
            }
        };

        match serde_json::from_slice::<SavedBookingRecord>(&bytes) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(key = %self.key, error = %err, "ignoring malformed saved booking");
                None
            }
        }
    }

    /// Overwrite the saved booking.
    ///
    /// # Errors
    ///
    /// Returns [`platform::Error::Storage`] when the underlying store rejects
    /// the write.
    pub async fn set(&self, record: &SavedBookingRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.store
            .set(&self.key, &bytes)
            .await
            .map_err(|err| storage_error!("failed to save booking under {}: {err:#}", self.key))
    }
}

/// Persist `booking` as the last booking.
///
/// Storage failures never fail the booking: they are logged and the record
/// is returned regardless.
pub async fn save_booking<S: StateStore>(
    store: &BookingStore<S>, booking: &Booking, clock: &impl Time,
) -> SavedBookingRecord {
    let record = SavedBookingRecord::new(booking, clock.now().timestamp_millis());

    if let Err(err) = store.set(&record).await {
        warn!(monotonic_counter.booking_store_failures = 1, error = %err, "booking not saved");
    }
    record
}
