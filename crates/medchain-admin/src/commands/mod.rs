// Command modules for the admin CLI

/// Scripted ledger scenario
pub mod demo;

/// Key pair generation
pub mod keygen;

/// Merging signed replies
pub mod merge;

/// Proposal building
pub mod prepare;

/// Signing a request file
pub mod sign;
