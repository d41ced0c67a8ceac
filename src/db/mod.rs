//! Database module for Freshness Warden.
//!
//! Provides SQLite storage for sources and their check log.

mod models;
mod store;

pub use models::*;
pub use store::*;
