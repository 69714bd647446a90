//! Web layer for the route matcher.
//!
//! Provides JSON endpoints for listing lines, searching neighborhoods and
//! matching routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
