//! Service errors and their HTTP statuses

use medchain_core::MedchainError;
use medchain_messages::ErrorReply;
use medchain_signature::CoSignError;

/// Errors raised while handling a sign request or loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Neither a public nor a private key was supplied
    #[error("No public/private key pair was given")]
    MissingKeyPair,

    /// The request has no action info or no action
    #[error("No action was provided to sign")]
    MissingAction,

    /// The request body is not a valid sign request
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The transaction string does not decode
    #[error("Malformed transaction: {0}")]
    MalformedTransaction(String),

    /// Co-signing rejected the request
    #[error(transparent)]
    CoSign(#[from] CoSignError),

    /// The reply could not be encoded
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// HTTP status reported for this error
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::MissingKeyPair
            | ServiceError::MissingAction
            | ServiceError::MalformedRequest(_)
            | ServiceError::MalformedTransaction(_) => 400,
            ServiceError::CoSign(err) => match err {
                CoSignError::IdentityNotInRoster { .. } => 403,
                CoSignError::Signing(_) | CoSignError::Encoding(_) => 500,
                _ => 400,
            },
            ServiceError::Encoding(_) | ServiceError::Configuration(_) | ServiceError::Io(_) => {
                500
            }
        }
    }

    /// Error body sent with [`ServiceError::status`]
    pub fn to_reply(&self) -> ErrorReply {
        ErrorReply {
            status: self.status(),
            message: self.to_string(),
        }
    }
}

impl From<ServiceError> for MedchainError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::CoSign(inner) => inner.into(),
            ServiceError::MissingKeyPair
            | ServiceError::MissingAction
            | ServiceError::MalformedRequest(_)
            | ServiceError::Configuration(_) => MedchainError::invalid(err.to_string()),
            ServiceError::MalformedTransaction(_) | ServiceError::Encoding(_) => {
                MedchainError::serialization(err.to_string())
            }
            ServiceError::Io(_) => MedchainError::internal(err.to_string()),
        }
    }
}
