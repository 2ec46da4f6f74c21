//! # Fare
//!
//! Upfront fare estimate from luggage, distance and crew size. The final
//! fare is confirmed at pickup once the porter has weighed the luggage.

use platform::{Result, bad_request};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-unit rates, in rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub base: f64,
    pub per_bag: f64,
    pub per_kg: f64,
    pub per_100m: f64,
    /// Surcharge for each porter beyond the first, as a fraction of the fare.
    pub extra_coolie_factor: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self { base: 50.0, per_bag: 20.0, per_kg: 5.0, per_100m: 10.0, extra_coolie_factor: 0.6 }
    }
}

/// What the customer enters in the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareInput {
    pub bags: i64,
    pub weight_kg: f64,
    pub distance_m: f64,
    pub coolies: i64,
}

impl Default for FareInput {
    fn default() -> Self {
        Self { bags: 2, weight_kg: 25.0, distance_m: 400.0, coolies: 1 }
    }
}

impl FareInput {
    /// Clamp to the ranges the form allows: no negative quantities and at
    /// least one porter.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            bags: self.bags.max(0),
            weight_kg: self.weight_kg.max(0.0),
            distance_m: self.distance_m.max(0.0),
            coolies: self.coolies.max(1),
        }
    }
}

impl Pricing {
    /// Estimated fare in whole rupees, rounded up.
    ///
    /// Distance is charged per started 100 m.
    ///
    /// # Errors
    ///
    /// Returns [`platform::Error::BadRequest`] when weight or distance is not
    /// a finite number.
    pub fn estimate(&self, input: &FareInput) -> Result<u64> {
        if !input.weight_kg.is_finite() || !input.distance_m.is_finite() {
            return Err(bad_request!(
                "weight and distance must be finite, got {} kg and {} m",
                input.weight_kg,
                input.distance_m
            ));
        }
        let input = input.clamped();

        #[allow(clippy::cast_precision_loss)]
        let (bags, extra_coolies) = (input.bags as f64, (input.coolies - 1) as f64);

        let distance_units = (input.distance_m / 100.0).ceil();
        let fare = self.base
            + bags * self.per_bag
            + input.weight_kg * self.per_kg
            + distance_units * self.per_100m;
        let adjusted = (fare * extra_coolies.mul_add(self.extra_coolie_factor, 1.0)).ceil();

        debug!(fare, adjusted, coolies = input.coolies, "fare estimated");

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total = adjusted.max(0.0) as u64;
        Ok(total)
    }
}

/// Estimate with the default rates.
///
/// # Errors
///
/// See [`Pricing::estimate`].
pub fn estimate(input: &FareInput) -> Result<u64> {
    Pricing::default().estimate(input)
}
