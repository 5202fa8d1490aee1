//! HTTP transport around the resolution engine

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ChatRequest, ChatResponse, StatusResponse};
pub use routes::build_router;
