//! Signing audit trail
//!
//! One JSONL line per workflow outcome, so every signature attempt on an
//! act can be traced to the agent who made it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::eligibility::SigningMode;

/// What happened to the signing attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SigningEventKind {
    /// Confirmation surface opened
    Started,
    /// Refused before opening (missing mention)
    Rejected,
    /// Signer reported success
    Signed,
    /// Signer reported failure
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: SigningEventKind,
    pub actor_id: String,
    pub act_id: Uuid,
    pub request_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SigningMode>,
}

impl SigningEvent {
    pub fn new(kind: SigningEventKind, actor_id: &str, act_id: Uuid, request_id: Uuid) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            actor_id: actor_id.to_string(),
            act_id,
            request_id,
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: SigningMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Convert to JSONL line
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Appends signing events to a JSONL file. Without a file it does nothing.
#[derive(Clone, Default)]
pub struct AuditLogger {
    inner: Arc<Mutex<Option<BufWriter<File>>>>,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or create) the audit file in append mode
    pub async fn init_file(&self, path: PathBuf) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        *self.inner.lock().await = Some(BufWriter::new(file));

        info!("Signing audit log initialized to {}", path.display());
        Ok(())
    }

    pub async fn log(&self, event: SigningEvent) {
        let jsonl = match event.to_jsonl() {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize signing event: {}", e);
                return;
            }
        };

        let mut inner = self.inner.lock().await;

        if let Some(ref mut writer) = *inner {
            if let Err(e) = writeln!(writer, "{}", jsonl) {
                error!("Failed to write signing event: {}", e);
            }
            if let Err(e) = writer.flush() {
                error!("Failed to flush signing audit log: {}", e);
            }
        }
    }
}
