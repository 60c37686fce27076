pub mod cleanup;
pub mod middleware;
pub mod password;
pub mod session;

pub use middleware::{cookie_value, RequireAdmin, Viewer};
pub use password::verify_admin_password;
pub use session::{generate_session_token, hash_session_token, SessionManager, SESSION_COOKIE};
