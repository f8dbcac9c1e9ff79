//! Web server module
//!
//! JSON API and server-rendered pages on top of the aggregator.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::{bind_listener, create_router};
pub use state::AppState;
pub use templates::Templates;
