//! HTTP networking module
//!
//! Provides the HTTP client used to reach upstream search providers.

mod client;

pub use client::HttpClient;
