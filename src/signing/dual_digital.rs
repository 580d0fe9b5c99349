//! Dual-digital signing surface
//!
//! Composes the final act document on the registry back end from the
//! issuer and entity certificates. Every failure (blackout window,
//! certificate, transport, HTTP status) reports `false`; the workflow makes
//! no distinction between them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{DualDigitalCertificates, RegistryApiClient};
use crate::eligibility::SigningMode;
use crate::types::Result;
use crate::workflow::{CompletionHandle, SigningRequest, SigningSurface};

use super::certificates::CertificateSource;
use super::window::SigningWindow;

/// Back-end call producing the final signed document
#[async_trait]
pub trait FinalDocumentComposer: Send + Sync {
    async fn compose_final_document(
        &self,
        act_id: Uuid,
        certificates: &DualDigitalCertificates,
    ) -> Result<String>;
}

#[async_trait]
impl FinalDocumentComposer for RegistryApiClient {
    async fn compose_final_document(
        &self,
        act_id: Uuid,
        certificates: &DualDigitalCertificates,
    ) -> Result<String> {
        RegistryApiClient::compose_final_document(self, act_id, certificates).await
    }
}

/// Signing surface for dual-digital requests
pub struct DualDigitalSigner {
    composer: Arc<dyn FinalDocumentComposer>,
    certificates: Arc<dyn CertificateSource>,
    blackout: Option<SigningWindow>,
    /// Handles standard-update requests, if configured
    fallback: Option<Arc<dyn SigningSurface>>,
    clock: fn() -> DateTime<Utc>,
}

impl DualDigitalSigner {
    pub fn new(
        composer: Arc<dyn FinalDocumentComposer>,
        certificates: Arc<dyn CertificateSource>,
    ) -> Self {
        Self {
            composer,
            certificates,
            blackout: None,
            fallback: None,
            clock: Utc::now,
        }
    }

    /// Refuse signing inside `window`
    pub fn with_blackout(mut self, window: SigningWindow) -> Self {
        self.blackout = Some(window);
        self
    }

    /// Delegate standard-update requests to `surface`
    pub fn with_fallback(mut self, surface: Arc<dyn SigningSurface>) -> Self {
        self.fallback = Some(surface);
        self
    }

    /// Read the current instant from `clock` instead of the system clock
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    async fn sign_dual_digital(&self, request: &SigningRequest) -> bool {
        if let Some(window) = self.blackout {
            if window.is_blocked_at((self.clock)()) {
                warn!(
                    act_id = %request.act_id,
                    start = %window.start(),
                    end = %window.end(),
                    "Signing refused during blackout window"
                );
                return false;
            }
        }

        let certificates = match self.certificates.certificates().await {
            Ok(c) => c,
            Err(e) => {
                warn!(act_id = %request.act_id, error = %e, "Certificates unavailable");
                return false;
            }
        };

        match self
            .composer
            .compose_final_document(request.act_id, &certificates)
            .await
        {
            Ok(document) => {
                info!(
                    act_id = %request.act_id,
                    document_len = document.len(),
                    "Final dual-digital document composed"
                );
                true
            }
            Err(e) => {
                warn!(act_id = %request.act_id, error = %e, "Final document composition failed");
                false
            }
        }
    }
}

#[async_trait]
impl SigningSurface for DualDigitalSigner {
    async fn sign(&self, request: SigningRequest, completion: CompletionHandle) {
        match request.mode {
            SigningMode::DualDigital => {
                let success = self.sign_dual_digital(&request).await;
                completion.report(success);
            }
            SigningMode::StandardUpdate => match &self.fallback {
                Some(surface) => surface.sign(request, completion).await,
                None => {
                    warn!(act_id = %request.act_id, "No signer configured for standard updates");
                    completion.report(false);
                }
            },
        }
    }
}
