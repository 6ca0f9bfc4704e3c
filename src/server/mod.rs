//! HTTP service exposing `/health`, `/predict` and `/resolve`.

mod error;
pub mod handlers;
mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::{AppState, build_router, run};
