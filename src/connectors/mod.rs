pub mod errors;
pub mod identity;

pub use errors::VerificationError;
pub use identity::{IdentityClient, TokenVerifier};
