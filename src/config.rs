//! Configuration for acte-signing
//!
//! CLI arguments and environment variable handling using clap.

use chrono::{FixedOffset, Local, Offset};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::api::ApiClientConfig;
use crate::auth::{parse_claims, Claim};
use crate::signing::SigningWindow;

/// Finish and sign a civil-registry act after a mention update
#[derive(Parser, Debug, Clone)]
#[command(name = "acte-signing")]
#[command(about = "Finish-and-sign workflow for civil-registry act updates")]
pub struct Args {
    /// Base URL of the registry back end
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:8080")]
    pub api_base_url: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Start of the daily signing blackout (HH:MM)
    #[arg(long, env = "SIGNING_BLACKOUT_START")]
    pub blackout_start: Option<String>,

    /// End of the daily signing blackout (HH:MM)
    #[arg(long, env = "SIGNING_BLACKOUT_END")]
    pub blackout_end: Option<String>,

    /// UTC offset of the registry office the blackout is read in (+01:00);
    /// defaults to the host's current offset
    #[arg(long, env = "SIGNING_BLACKOUT_UTC_OFFSET")]
    pub blackout_utc_offset: Option<String>,

    /// JSONL file receiving one line per signing outcome
    #[arg(long, env = "AUDIT_LOG")]
    pub audit_log: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,

    /// Interaction inputs
    #[command(flatten)]
    pub interaction: InteractionArgs,
}

/// The state a finish-and-sign interaction starts from
#[derive(Parser, Debug, Clone)]
pub struct InteractionArgs {
    /// Connected agent identifier
    #[arg(long, env = "ACTOR_ID", default_value = "anonymous")]
    pub actor_id: String,

    /// Comma-separated claims granted to the agent
    #[arg(long, env = "ACTOR_CLAIMS", default_value = "")]
    pub claims: String,

    /// Act being updated
    #[arg(long)]
    pub act_id: Uuid,

    /// Request that triggered the update
    #[arg(long)]
    pub request_id: Uuid,

    /// Act is held electronically
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub act_electronic: bool,

    /// Act qualifies for the integration formula
    #[arg(long, default_value = "false")]
    pub act_integration_eligible: bool,

    /// Caller asserts integration eligibility and signing rights
    #[arg(long, default_value = "false")]
    pub eligible: bool,

    /// Number of manually appended mentions
    #[arg(long, default_value = "0")]
    pub mentions: usize,

    /// A mention is still being typed
    #[arg(long, default_value = "false")]
    pub mention_entry_in_progress: bool,

    /// The mention update has been saved
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub update_performed: bool,

    /// Run the signature, not just the evaluation
    #[arg(long, default_value = "false")]
    pub sign: bool,

    /// Issuer certificate file (PEM or base64)
    #[arg(long, env = "ISSUER_CERTIFICATE")]
    pub issuer_certificate: Option<PathBuf>,

    /// Registry office certificate file (PEM or base64)
    #[arg(long, env = "ENTITY_CERTIFICATE")]
    pub entity_certificate: Option<PathBuf>,
}

impl Args {
    pub fn api_client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api_base_url.clone(),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    /// Blackout window, if both ends are configured
    pub fn blackout_window(&self) -> Result<Option<SigningWindow>, String> {
        match (&self.blackout_start, &self.blackout_end) {
            (Some(start), Some(end)) => {
                let window = SigningWindow::parse(start, end).map_err(|e| e.to_string())?;
                Ok(Some(window.with_offset(self.blackout_offset()?)))
            }
            (None, None) => Ok(None),
            _ => Err(
                "SIGNING_BLACKOUT_START and SIGNING_BLACKOUT_END must be set together".to_string(),
            ),
        }
    }

    fn blackout_offset(&self) -> Result<FixedOffset, String> {
        match &self.blackout_utc_offset {
            Some(value) => value
                .parse::<FixedOffset>()
                .map_err(|e| format!("SIGNING_BLACKOUT_UTC_OFFSET '{}': {}", value, e)),
            None => Ok(Local::now().offset().fix()),
        }
    }

    pub fn claims(&self) -> Result<Vec<Claim>, String> {
        parse_claims(&self.interaction.claims)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        self.claims()?;
        self.blackout_window()?;

        let interaction = &self.interaction;
        if interaction.sign
            && (interaction.issuer_certificate.is_none() || interaction.entity_certificate.is_none())
        {
            return Err("--sign requires --issuer-certificate and --entity-certificate".to_string());
        }

        Ok(())
    }
}
