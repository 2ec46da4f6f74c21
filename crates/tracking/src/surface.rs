//! # Map Surface
//!
//! The rendering collaborator. A surface receives a [`RenderFrame`] on every
//! tick and draws pickup, drop-off and mover markers joined by a path.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use platform::Result;
use tokio::sync::watch;
use tracing::debug;

use crate::geo::GeoPoint;
use crate::resolve::ResolvedSession;
use crate::session::{SessionState, Snapshot};
use crate::view::RenderFrame;

/// Something that can draw a tracking frame.
pub trait MapSurface {
    /// Draw `frame`, replacing whatever was drawn before.
    ///
    /// # Errors
    ///
    /// Returns an error when the surface cannot draw.
    fn render(&mut self, frame: &RenderFrame) -> Result<()>;
}

/// Renders frames as a GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonSurface {
    latest: Option<GeoJson>,
    frames: usize,
}

impl GeoJsonSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently rendered frame.
    #[must_use]
    pub const fn latest(&self) -> Option<&GeoJson> {
        self.latest.as_ref()
    }

    /// How many frames have been rendered.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }
}

impl MapSurface for GeoJsonSurface {
    fn render(&mut self, frame: &RenderFrame) -> Result<()> {
        self.latest = Some(GeoJson::FeatureCollection(feature_collection(frame)));
        self.frames += 1;
        Ok(())
    }
}

/// Markers and path for `frame`.
#[must_use]
pub fn feature_collection(frame: &RenderFrame) -> FeatureCollection {
    let mut features = vec![marker("pickup", frame.pickup, frame.pickup_label.as_deref())];
    if let Some(dropoff) = frame.dropoff {
        features.push(marker("dropoff", dropoff, frame.dropoff_label.as_deref()));
    }
    features.push(marker("mover", frame.current_position, None));

    let mut path = vec![position(frame.current_position), position(frame.pickup)];
    if let Some(dropoff) = frame.dropoff {
        path.push(position(dropoff));
    }
    let mut feature = feature(Value::LineString(path));
    feature.set_property("kind", "path");
    features.push(feature);

    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// Render every snapshot the session publishes until the courier arrives or
/// the session goes away. Returns the last snapshot rendered.
///
/// # Errors
///
/// Returns the first error raised by the surface.
pub async fn follow<M: MapSurface>(
    mut updates: watch::Receiver<Snapshot>, resolved: &ResolvedSession, surface: &mut M,
) -> Result<Snapshot> {
    loop {
        let snapshot = *updates.borrow_and_update();
        surface.render(&RenderFrame::new(resolved, &snapshot))?;

        if snapshot.state == SessionState::Arrived {
            return Ok(snapshot);
        }
        if updates.changed().await.is_err() {
            debug!("session closed before arrival");
            return Ok(snapshot);
        }
    }
}

fn marker(kind: &str, point: GeoPoint, label: Option<&str>) -> Feature {
    let mut feature = feature(Value::Point(position(point)));
    feature.set_property("kind", kind);
    if let Some(label) = label {
        feature.set_property("label", label);
    }
    feature
}

fn feature(value: Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry { bbox: None, value, foreign_members: None }),
        id: None,
        properties: None,
        foreign_members: None,
    }
}

fn position(point: GeoPoint) -> Vec<f64> {
    vec![point.lng, point.lat]
}
