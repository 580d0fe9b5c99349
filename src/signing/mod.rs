//! Signing surfaces backed by the registry API
//!
//! The workflow only sees [`SigningSurface`](crate::workflow::SigningSurface).
//! This module provides the dual-digital implementation together with the
//! certificate sources and the blackout window it depends on.

pub mod certificates;
pub mod dual_digital;
pub mod window;

pub use certificates::{CertificateSource, FileCertificates, StaticCertificates};
pub use dual_digital::{DualDigitalSigner, FinalDocumentComposer};
pub use window::SigningWindow;
