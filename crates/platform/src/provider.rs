//! # Provider
//!
//! Provider defines external data interfaces for the crate.

use anyhow::Result;
use chrono::{DateTime, Utc};

/// The `StateStore` trait defines the behavior for storing and retrieving
/// client-side state such as the last booking.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    fn set(&self, key: &str, value: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

/// The `Time` trait supplies the current wall-clock time.
pub trait Time: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
