//! Configuration module for Freshcheck.
//!
//! This module contains the search store connection settings.

pub mod store;

pub use store::{StoreConfig, DEFAULT_STORE_URL, STORE_URL_ENV};
