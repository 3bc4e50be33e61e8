use thiserror::Error;

/// Reasons an init-data payload is rejected.
///
/// Every kind is a client-input fault: never retried, never fatal to the
/// process. Callers must not expose the kind to the client, see
/// [`Rejection`](super::Rejection).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthError {
    /// The payload is empty.
    #[error("init data is empty")]
    MalformedInput,
    /// No `hash` field, or an empty one.
    #[error("init data has no hash")]
    MissingHash,
    /// The computed signature does not match the received `hash`.
    #[error("init data signature mismatch")]
    InvalidSignature,
    /// Signed correctly, but no `user` field.
    #[error("init data has no user")]
    MissingUser,
    /// `user` is not a JSON object with an integer `id`.
    #[error("init data user is malformed")]
    MalformedUser,
}

impl AuthError {
    /// Stable label for log records.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MalformedInput => "malformed_input",
            AuthError::MissingHash => "missing_hash",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::MissingUser => "missing_user",
            AuthError::MalformedUser => "malformed_user",
        }
    }

    pub fn is_security_event(&self) -> bool {
        matches!(self, AuthError::InvalidSignature)
    }
}
