//! HTTP API module: dashboard, ingest, query and operational endpoints.

pub mod dashboard;
pub mod handlers;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use routes::{create_router, create_router_with_limit};
pub use server::{bind_listener, serve};
