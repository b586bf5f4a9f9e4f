//! # platter_core
//!
//! Core domain logic for Platter.

pub mod db;
pub mod migrate;
pub mod recommend;
pub mod restaurants;
pub mod sessions;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
