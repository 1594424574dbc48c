//! Authentication: JWT issuance and validation, password hashing, and the
//! bearer-token middleware protecting the authenticated route tree.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use middleware::{auth_middleware, AuthState};
pub use models::AuthContext;
