//! # Domain Models
//!
//! Pure configuration types and constants shared by every Rosetta crate.
//! Keep it lean: no I/O and no heavy logic, only data and simple helpers.

pub mod config;
pub mod constants;
