//! Input/output helpers.
//!
//! - daily report exports (CSV/JSON) and JSON reload (`export`)

pub mod export;

pub use export::*;
