//! `meter-footprint` library crate.
//!
//! The binary (`footprint`) is a thin wrapper around this library so that:
//!
//! - the daily aggregation core is testable without network access
//! - provider clients, reporting and exports stay independently reusable

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
