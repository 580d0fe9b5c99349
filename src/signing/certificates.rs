//! Certificate sources for dual-digital signing
//!
//! The issuer certificate belongs to the signing officer, the entity
//! certificate to the registry office. How they are obtained is up to the
//! deployment: smart-card bridge, HSM, or plain files.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::api::DualDigitalCertificates;
use crate::types::{Result, SigningError};

#[async_trait]
pub trait CertificateSource: Send + Sync {
    async fn certificates(&self) -> Result<DualDigitalCertificates>;
}

/// Certificates known up front
#[derive(Debug, Clone)]
pub struct StaticCertificates(pub DualDigitalCertificates);

#[async_trait]
impl CertificateSource for StaticCertificates {
    async fn certificates(&self) -> Result<DualDigitalCertificates> {
        Ok(self.0.clone())
    }
}

/// Reads both certificates from disk on every request
#[derive(Debug, Clone)]
pub struct FileCertificates {
    pub issuer_path: PathBuf,
    pub entity_path: PathBuf,
}

impl FileCertificates {
    pub fn new(issuer_path: impl Into<PathBuf>, entity_path: impl Into<PathBuf>) -> Self {
        Self {
            issuer_path: issuer_path.into(),
            entity_path: entity_path.into(),
        }
    }
}

#[async_trait]
impl CertificateSource for FileCertificates {
    async fn certificates(&self) -> Result<DualDigitalCertificates> {
        Ok(DualDigitalCertificates {
            issuer_certificate: read_certificate(&self.issuer_path).await?,
            entity_certificate: read_certificate(&self.entity_path).await?,
        })
    }
}

/// Read a certificate file, keeping only the base64 body of a PEM block
async fn read_certificate(path: &Path) -> Result<String> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SigningError::Certificate(format!("{}: {}", path.display(), e)))?;

    let body: String = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect();

    if body.is_empty() {
        return Err(SigningError::Certificate(format!(
            "{}: empty certificate",
            path.display()
        )));
    }

    debug!(path = %path.display(), len = body.len(), "Loaded certificate");
    Ok(body)
}
