pub mod cookie;
pub mod credentials;
pub mod error;
pub mod password;
pub mod session;

pub use cookie::{expired_session_cookie, read_session_token, session_cookie};
pub use credentials::{CredentialVerifier, normalize_email};
pub use password::{compute_password_hash, verify_password_hash};
pub use session::{Session, SessionStore};
