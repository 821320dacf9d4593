//! MedChain Admin
//!
//! Admin-side tooling for the co-signing protocol: the sign request handler
//! each admin runs, the mapping of its failures to HTTP statuses, and the
//! configuration shared with the `medchain-admin` binary.

#![forbid(unsafe_code)]

/// Admin configuration
pub mod config;

/// Service errors
pub mod errors;

/// Sign request handling
pub mod service;

pub use config::{AdminConfig, KeyFile, SignerConfig};
pub use errors::ServiceError;
pub use service::{HandlerResponse, SigningService};
