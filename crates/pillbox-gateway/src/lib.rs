//! `pillbox-gateway` — the caregiver-facing HTTP surface and process wiring.

pub mod app;
pub mod error;
pub mod http;
