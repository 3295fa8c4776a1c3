//! API layer - HTTP endpoints

pub mod executions;
pub mod health;
pub mod models;
pub mod router;
pub mod state;
pub mod types;
pub mod workflows;

pub use router::create_router;
pub use state::AppState;
