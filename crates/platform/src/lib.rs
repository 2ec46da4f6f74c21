//! # Platform Core
//!
//! Core modules shared by the booking and tracking crates.

mod error;
mod provider;

pub use crate::error::*;
pub use crate::provider::*;
