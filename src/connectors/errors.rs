use thiserror::Error;

/// Reasons a bearer token was rejected. Kept for operator logging and tests
/// only; every outward surface collapses these into one uniform
/// unauthorized signal.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("malformed token")]
    Malformed,
    #[error("unexpected signing algorithm")]
    Algorithm,
    #[error("unknown signing key")]
    UnknownKey,
    #[error("token rejected")]
    Invalid,
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),
}
