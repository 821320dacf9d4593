//! Sign request handling
//!
//! Validates a sign request, loads the caller's key pair (or the configured
//! local signer when the request carries none), fills its slot in every
//! instruction and returns the re-encoded transaction. Transport is left to
//! the caller: [`SigningService::handle_sign_body`] maps a raw request body
//! to a status code and JSON body.

use crate::config::AdminConfig;
use crate::errors::ServiceError;
use medchain_core::ClientTransaction;
use medchain_messages::{from_json, to_json, SignReply, SignRequest};
use medchain_signature::{check_digests, sign_transaction, Ed25519Signer, Signer};
use tracing::{debug, info, warn};

/// Status and JSON body of a handled request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body
    pub body: Vec<u8>,
}

impl HandlerResponse {
    /// Whether the status is a success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Co-signing service for one admin
#[derive(Debug, Clone, Default)]
pub struct SigningService {
    verify_digests: bool,
    local_signer: Option<Ed25519Signer>,
}

impl SigningService {
    /// Create a service that signs digests as supplied
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service from configuration, loading the `[signer]` section
    pub fn from_config(config: &AdminConfig) -> Result<Self, ServiceError> {
        let local_signer = config.signer()?;
        if let Some(signer) = &local_signer {
            info!(signer = %signer.identity(), "Loaded local signer");
        }
        Ok(Self {
            verify_digests: config.verify_digests,
            local_signer,
        })
    }

    /// Recompute digests from the transaction and reject mismatches
    pub fn with_digest_check(mut self, enabled: bool) -> Self {
        self.verify_digests = enabled;
        self
    }

    /// Sign the action of a request.
    ///
    /// The request's key pair is used when present; a request without one is
    /// signed by the local signer, and fails with
    /// [`ServiceError::MissingKeyPair`] when there is none.
    pub fn process_sign_request(&self, request: &SignRequest) -> Result<SignReply, ServiceError> {
        let request_signer;
        let signer = if request.public_key.is_empty() && request.private_key.is_empty() {
            self.local_signer
                .as_ref()
                .ok_or(ServiceError::MissingKeyPair)?
        } else {
            request_signer = Ed25519Signer::from_hex(&request.public_key, &request.private_key)?;
            &request_signer
        };
        let action_info = request
            .action_info
            .as_ref()
            .ok_or(ServiceError::MissingAction)?;
        let action = action_info
            .action
            .as_ref()
            .ok_or(ServiceError::MissingAction)?;

        let mut transaction = ClientTransaction::from_base64(&action.transaction)
            .map_err(|e| ServiceError::MalformedTransaction(e.to_string()))?;

        if self.verify_digests {
            check_digests(&transaction, &action.instruction_digests)?;
        }
        sign_transaction(
            &mut transaction,
            &action.instruction_digests,
            &action.signers,
            signer,
        )?;

        let signed_transaction = transaction
            .to_base64()
            .map_err(|e| ServiceError::Encoding(e.to_string()))?;
        let signer_id = signer.identity().to_string();
        info!(
            signer = %signer_id,
            action = %action_info.id,
            instructions = transaction.len(),
            "Signed action"
        );

        Ok(SignReply {
            signer_id,
            action_info: action_info.clone(),
            old_transaction: action.transaction.clone(),
            signed_transaction,
        })
    }

    /// Handle a raw JSON sign request body
    pub fn handle_sign_body(&self, body: &[u8]) -> HandlerResponse {
        debug!(bytes = body.len(), "Handling sign request");
        let result = from_json::<SignRequest>(body)
            .map_err(|e| ServiceError::MalformedRequest(e.to_string()))
            .and_then(|request| self.process_sign_request(&request))
            .and_then(|reply| to_json(&reply).map_err(|e| ServiceError::Encoding(e.to_string())));

        match result {
            Ok(body) => HandlerResponse { status: 200, body },
            Err(err) => {
                warn!(status = err.status(), error = %err, "Sign request rejected");
                let reply = err.to_reply();
                let body = to_json(&reply).unwrap_or_else(|_| reply.message.into_bytes());
                HandlerResponse {
                    status: reply.status,
                    body,
                }
            }
        }
    }
}
