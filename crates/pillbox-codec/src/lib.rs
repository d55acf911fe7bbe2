//! `pillbox-codec` — stateless transforms between the sparse relational plan
//! rows and the total nested day→time→color→quantity grid, plus the payloads
//! published to the device relay.
//!
//! Nothing here touches storage or the network; every function is a pure
//! mapping over [`pillbox_core::types::PlanEntry`] values.

pub mod form;
pub mod grid;
pub mod payload;

pub use form::entries_from_form;
pub use grid::ScheduleGrid;
pub use payload::{daily_payload, schedule_payload, DailyPayload, SchedulePayload};
