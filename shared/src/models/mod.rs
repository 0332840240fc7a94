//! Data models for freshness checks.
//!
//! This module contains the validated check input and the check outcome.

pub mod check;
pub mod interval;

pub use check::{CheckOutcome, CheckRequest, Status};
pub use interval::{Seconds, ValidationError};
