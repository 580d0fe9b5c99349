//! acte-signing - finish-and-sign workflow for civil-registry acts
//!
//! After an agent appends mentions to an act, the act must be signed.
//! This crate decides whether the agent may sign and in which mode, drives
//! the confirmation and signing interaction, and talks to the registry
//! back end for dual-digital signatures.
//!
//! ## Modules
//!
//! - **auth**: registry claims and the connected actor
//! - **eligibility**: may-sign, signing mode and mention precondition
//! - **workflow**: the IDLE / CONFIRMING / COMPLETED state machine
//! - **signing**: dual-digital signing surface, certificates, blackout window
//! - **api**: endpoint descriptors and HTTP client
//! - **logging**: tracing setup and signing audit trail

pub mod api;
pub mod auth;
pub mod config;
pub mod eligibility;
pub mod logging;
pub mod notify;
pub mod signing;
pub mod types;
pub mod workflow;

pub use config::Args;
pub use eligibility::{Eligibility, SigningMode};
pub use types::{Result, SigningError};
pub use workflow::{SigningWorkflow, WorkflowState};
