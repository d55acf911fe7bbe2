//! `pillbox-core` — shared types and configuration for the pillbox backend.
//!
//! Everything here is plain data: the day/time/color enumerations that key the
//! weekly medication grid, the [`types::PlanEntry`] record the store and codec
//! exchange, and the figment-backed [`config::PillboxConfig`].

pub mod config;
pub mod error;
pub mod types;

pub use error::{CoreError, Result};
pub use types::{PillColor, PlanEntry, TimeOfDay, Weekday};
