use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use fare::Pricing;
use tracking::plan::MAX_TICK_INTERVAL;
use tracking::{LAST_BOOKING_KEY, SimulationConfig};

/// Host settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_key: String,
    pub simulation: SimulationConfig,
    pub pricing: Pricing,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Config {
    /// Read every setting from the process environment, falling back to the
    /// built-in default for anything unset or invalid.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read every setting through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let settings = Settings(lookup);
        let simulation = SimulationConfig::default();
        let pricing = Pricing::default();

        Self {
            store_key: settings.lookup("BOOKING_STORE_KEY").unwrap_or_else(|| {
                tracing::trace!("BOOKING_STORE_KEY not set, using default: {LAST_BOOKING_KEY}");
                LAST_BOOKING_KEY.to_string()
            }),
            simulation: SimulationConfig {
                tick_interval: settings.tick("TRACKING_TICK_MS", simulation.tick_interval),
                offset_km: settings.float("APPROACH_OFFSET_KM", simulation.offset_km),
                bearing_deg: settings.float("APPROACH_BEARING_DEG", simulation.bearing_deg),
                km_per_minute: settings.positive("APPROACH_KM_PER_MINUTE", simulation.km_per_minute),
                min_duration_secs: settings.unsigned("APPROACH_MIN_SECS", simulation.min_duration_secs),
                default_eta_minutes: settings
                    .positive("DEFAULT_ETA_MINUTES", simulation.default_eta_minutes),
            },
            pricing: Pricing {
                base: settings.float("FARE_BASE", pricing.base),
                per_bag: settings.float("FARE_PER_BAG", pricing.per_bag),
                per_kg: settings.float("FARE_PER_KG", pricing.per_kg),
                per_100m: settings.float("FARE_PER_100M", pricing.per_100m),
                extra_coolie_factor: settings
                    .float("FARE_EXTRA_COOLIE_FACTOR", pricing.extra_coolie_factor),
            },
        }
    }
}

struct Settings<F>(F);

impl<F: Fn(&str) -> Option<String>> Settings<F> {
    fn lookup(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn float(&self, key: &str, default: f64) -> f64 {
        self.parse(key, default).filter(|value: &f64| value.is_finite()).unwrap_or(default)
    }

    fn positive(&self, key: &str, default: f64) -> f64 {
        let value = self.float(key, default);
        if value > 0.0 {
            return value;
        }
        tracing::warn!(key, value, "setting must be positive, using default: {default}");
        default
    }

    fn unsigned(&self, key: &str, default: u64) -> u64 {
        self.parse(key, default).unwrap_or(default)
    }

    /// Tick cadence in milliseconds, between 1 ms and [`MAX_TICK_INTERVAL`].
    fn tick(&self, key: &str, default: Duration) -> Duration {
        let default_ms = u64::try_from(default.as_millis()).unwrap_or(1000);
        let max_ms = u64::try_from(MAX_TICK_INTERVAL.as_millis()).unwrap_or(60_000);

        let millis = self.unsigned(key, default_ms);
        if (1..=max_ms).contains(&millis) {
            return Duration::from_millis(millis);
        }
        tracing::warn!(key, millis, max_ms, "tick out of range, using default: {default_ms}");
        default
    }

    fn parse<T: FromStr + Display>(&self, key: &str, default: T) -> Option<T> {
        let Some(value) = self.lookup(key) else {
            tracing::trace!("{key} not set, using default: {default}");
            return None;
        };
        let parsed = value.trim().parse().ok();
        if parsed.is_none() {
            tracing::warn!(key, value, "invalid setting, using default: {default}");
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_vars(&[]);
        assert_eq!(config.store_key, LAST_BOOKING_KEY);
        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.pricing, Pricing::default());
    }

    #[test]
    fn overrides() {
        let config = from_vars(&[
            ("BOOKING_STORE_KEY", "coolie:test"),
            ("TRACKING_TICK_MS", "250"),
            ("APPROACH_OFFSET_KM", " 2.5 "),
            ("FARE_PER_BAG", "30"),
        ]);
        assert_eq!(config.store_key, "coolie:test");
        assert_eq!(config.simulation.tick_interval, Duration::from_millis(250));
        assert!((config.simulation.offset_km - 2.5).abs() < f64::EPSILON);
        assert!((config.pricing.per_bag - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_tick_uses_default() {
        let config = from_vars(&[("TRACKING_TICK_MS", "0")]);
        assert_eq!(config.simulation.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn huge_tick_uses_default() {
        let config = from_vars(&[("TRACKING_TICK_MS", "18446744073709551615")]);
        assert_eq!(config.simulation.tick_interval, Duration::from_secs(1));

        let config = from_vars(&[("TRACKING_TICK_MS", "60000")]);
        assert_eq!(config.simulation.tick_interval, MAX_TICK_INTERVAL);
    }

    #[test]
    fn invalid_values_use_default() {
        let config = from_vars(&[
            ("TRACKING_TICK_MS", "fast"),
            ("APPROACH_KM_PER_MINUTE", "0"),
            ("DEFAULT_ETA_MINUTES", "-3"),
            ("FARE_BASE", "NaN"),
        ]);
        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.pricing, Pricing::default());
    }
}
