//! # Quill API Server
//!
//! HTTP surface of the blog: routes, the authentication gate, error
//! mapping and application wiring.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

pub use handlers::configure_routes;
pub use middleware::auth::AuthGate;
pub use state::AppState;
