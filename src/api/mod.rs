//! Registry API access
//!
//! Endpoint descriptors plus the HTTP client executing them.

pub mod client;
pub mod endpoint;

pub use client::{ApiClientConfig, RegistryApiClient};
pub use endpoint::{
    Api, ApiEndpoint, DualDigitalCertificates, Method, PATCH_COMPOSE_FINAL_DOCUMENT_DUAL_DIGITAL,
};
