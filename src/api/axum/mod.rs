mod error;
mod handlers;
mod middleware;
mod routes;

pub use error::AppError;
pub use middleware::{ApiJson, RequestCaller, extract_bearer_token};
pub use routes::{AppState, SharedRng, invitation_routes};
