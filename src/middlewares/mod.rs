pub mod admin_guard;
pub mod session_auth;

pub use admin_guard::{admin_guard_middleware, cleanup_guard_middleware};
pub use session_auth::session_auth_middleware;
