//! Authorization for the signing workflow
//!
//! Provides:
//! - The closed set of registry claims
//! - The connected actor and its capability check

pub mod claims;

pub use claims::{parse_claims, Actor, Claim, SIGNING_CLAIMS};
