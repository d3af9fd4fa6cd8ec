//! `gstbill-auth`: session payloads and access-token inspection.
//!
//! Transport-agnostic: nothing here talks HTTP or touches storage.

pub mod claims;
pub mod session;

pub use claims::{ClaimsError, JwtClaims, decode_claims, is_token_valid};
pub use session::{Credentials, RefreshRequest, RegisterRequest, TokenPair, User};
