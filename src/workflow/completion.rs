//! Single-outcome completion signal
//!
//! The signing surface reports its result through a [`CompletionHandle`].
//! Reporting consumes the handle, so a surface cannot answer twice; a
//! handle dropped without reporting reads as a failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::eligibility::SigningMode;

/// What the confirmation surface is asked to sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningRequest {
    pub mode: SigningMode,
    pub act_id: Uuid,
    pub request_id: Uuid,
}

/// Sender half given to the signing surface
#[derive(Debug)]
pub struct CompletionHandle {
    tx: oneshot::Sender<bool>,
}

impl CompletionHandle {
    /// Report the signing outcome
    pub fn report(self, success: bool) {
        // Receiver gone means the interaction was abandoned
        let _ = self.tx.send(success);
    }
}

/// Receiver half held by the workflow
#[derive(Debug)]
pub struct PendingOutcome {
    rx: oneshot::Receiver<bool>,
}

impl PendingOutcome {
    /// Wait for the surface to report
    pub async fn wait(self) -> bool {
        self.rx.await.unwrap_or(false)
    }
}

pub fn completion_channel() -> (CompletionHandle, PendingOutcome) {
    let (tx, rx) = oneshot::channel();
    (CompletionHandle { tx }, PendingOutcome { rx })
}

/// The external confirmation surface performing the signature.
///
/// Certificate exchange and document composition happen behind this trait.
/// Implementations must eventually call [`CompletionHandle::report`] or
/// drop the handle.
#[async_trait]
pub trait SigningSurface: Send + Sync {
    async fn sign(&self, request: SigningRequest, completion: CompletionHandle);
}
