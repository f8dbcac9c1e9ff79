//! Search provider module
//!
//! Defines the Provider trait and the adapters for each upstream backend.

mod loader;
mod traits;

// Provider implementations
pub mod duckduckgo;
pub mod serper;

pub use loader::ProviderLoader;
pub use traits::*;
