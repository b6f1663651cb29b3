//! HTTP API: router, shared state, handlers, and error mapping.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
