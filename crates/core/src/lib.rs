//! # Swimbook Core
//!
//! Domain types and the pure scheduling logic shared by the database and API
//! crates. Nothing in here performs I/O.
//!
//! - [`conflict`]: overlap checks between lesson schedules
//! - [`waitlist`]: position bookkeeping for per-lesson waitlists
//! - [`coverage`]: instructor coverage reassignment checks

pub mod conflict;
pub mod coverage;
pub mod errors;
pub mod models;
pub mod waitlist;
