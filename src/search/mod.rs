//! Search orchestration module
//!
//! Dispatches a canonical query to the configured provider, stamps
//! provenance, and maps adapter failures to the uniform error contract.

mod executor;

pub use executor::Aggregator;
