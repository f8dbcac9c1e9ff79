//! RSearch: a search aggregation and normalization server
//!
//! Accepts a canonical query, dispatches it to one configured backend
//! (Serper or DuckDuckGo), and reshapes the backend's response into a single
//! provider-agnostic schema served as JSON and as server-rendered pages.

pub mod config;
pub mod controller;
pub mod engines;
pub mod error;
pub mod network;
pub mod query;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use controller::{Dispatcher, QueryController};
pub use engines::Provider;
pub use error::SearchError;
pub use query::{CanonicalQuery, ResultKind};
pub use results::SearchResponse;
pub use search::Aggregator;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
