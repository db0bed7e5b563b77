//! HTTP/JSON surface of the recipe service.

pub mod extract;
pub mod handlers;
pub mod response;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
