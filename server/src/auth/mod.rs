//! Authentication
//!
//! Bearer-token validation and the authenticated-caller extractor. Token
//! issuance (registration/login) is owned by the user directory; this
//! service only validates tokens it is handed.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult};
pub use middleware::{require_auth, AuthUser};
