//! Canonical result schema
//!
//! Defines the provider-agnostic shapes every adapter produces, plus the
//! normalization helpers adapters share.

pub mod normalize;
mod types;

pub use types::*;
