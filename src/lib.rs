//! Meta Custom Audiences Destination Connector Library
//!
//! This library uploads hashed user identifiers (emails) to the Meta Custom
//! Audience API: it transforms input rows into SHA-256 email digests,
//! submits them in one call per batch, and reports per-row success/failure
//! counts.
//!
//! # Modules
//!
//! - `audience_client`: Audience API client and the `AudienceService` seam.
//! - `config`: Configuration management.
//! - `destination`: The destination connector itself.
//! - `errors`: Error handling types.
//! - `hashing`: Per-row email normalization and hashing.
//! - `models`: Input rows, run results, and schema descriptors.

pub mod audience_client;
pub mod config;
pub mod destination;
pub mod errors;
pub mod hashing;
pub mod models;

pub use destination::Destination;
