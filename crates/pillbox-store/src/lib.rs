//! `pillbox-store` — SQLite persistence for users, pill types, and weekly plans.
//!
//! Storage is sparse: only slots a caregiver actually filled in get a row.
//! The total 7×4×4 view is reconstructed by `pillbox-codec`. One shared
//! [`rusqlite::Connection`] behind a mutex serves the whole process.

pub mod db;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::PlanStore;
pub use types::User;
