//! # Tracking
//!
//! Simulated live tracking for a booked porter. There is no location feed:
//! the courier's position is a straight-line animation from a synthetic
//! start point to pickup, with a countdown derived from the same geometry.

pub mod booking;
pub mod geo;
pub mod plan;
pub mod progress;
pub mod resolve;
pub mod session;
pub mod surface;
pub mod view;
pub mod viewport;

pub use platform::{Error, Result};

pub use self::booking::{Booking, BookingStore, LAST_BOOKING_KEY, SavedBookingRecord, save_booking};
pub use self::geo::{GeoPoint, haversine, offset_from_point};
pub use self::plan::{SimulationConfig, SimulationPlan, derive_plan, effective_duration};
pub use self::progress::{ProgressState, current_position, tick};
pub use self::resolve::{ResolvedSession, SessionParams, TrackingRequest, resolve};
pub use self::session::{SessionState, Snapshot, TrackingSession};
pub use self::surface::{GeoJsonSurface, MapSurface, follow};
pub use self::view::{RenderFrame, TrackingView};
pub use self::viewport::Viewport;
