//! Web layer for the transfer planner.
//!
//! Serves the taskpane: stop completion, connection search, transfer
//! planning around a meeting, and appointment drafts.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
