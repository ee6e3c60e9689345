//! Auth handlers and supporting modules.
//!
//! Coordinates the session core: token issuance/verification (`token`),
//! fingerprint persistence (`storage`), the register/login/refresh/logout
//! endpoints (`session`), and the bearer gate (`principal`).
//!
//! ## Rotation
//!
//! Every successful `/auth/refresh` revokes the presented token's fingerprint
//! and inserts the replacement in a single transaction. A replayed refresh
//! token is rejected because its fingerprint is already revoked; under two
//! concurrent refreshes of the same token, exactly one wins.

pub(crate) mod principal;
pub(crate) mod roles;
pub(crate) mod session;
mod state;
mod storage;
pub(crate) mod token;
pub(crate) mod types;
mod utils;

pub use principal::{Principal, require_auth, require_role};
pub use roles::Role;
pub use state::{AuthConfig, AuthState};
