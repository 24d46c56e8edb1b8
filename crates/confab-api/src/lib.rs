pub mod auth;
pub mod connections;
pub mod conversations;
mod convert;
pub mod error;
pub mod events;
pub mod middleware;
pub mod notifications;
pub mod publications;
pub mod users;

pub use error::ApiError;

/// Unauthenticated liveness check.
pub async fn hello_world() -> &'static str {
    "hello"
}
