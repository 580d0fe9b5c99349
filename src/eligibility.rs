//! Signing eligibility
//!
//! Pure decisions taken before the confirmation surface may open:
//! whether the actor may sign at all, which signing mode applies, and
//! whether the mode's mention precondition is met.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

use crate::auth::{Actor, SIGNING_CLAIMS};

/// How the updated act is signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningMode {
    /// Regular mention-update signature
    #[serde(rename = "MISE_A_JOUR")]
    StandardUpdate,
    /// Final document composed from issuer and entity certificates
    #[serde(rename = "DOUBLE_NUMERIQUE")]
    DualDigital,
}

impl fmt::Display for SigningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningMode::StandardUpdate => write!(f, "STANDARD_UPDATE"),
            SigningMode::DualDigital => write!(f, "DUAL_DIGITAL"),
        }
    }
}

/// Lifecycle of a mention on the act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MentionStatus {
    Draft,
    Signed,
}

/// A mention appended to an act during an update session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub id: Uuid,
    /// Mention type label (marriage, divorce, ...)
    pub kind: String,
    pub status: MentionStatus,
}

impl Mention {
    pub fn draft(kind: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            status: MentionStatus::Draft,
        }
    }
}

/// The civil-registry record being amended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Act {
    pub id: Uuid,

    /// Whether the act is held electronically
    pub electronic: bool,

    /// Externally computed eligibility for the integration formula
    pub integration_formula_eligible: bool,
}

impl Act {
    pub fn new(id: Uuid, electronic: bool, integration_formula_eligible: bool) -> Self {
        Self {
            id,
            electronic,
            integration_formula_eligible,
        }
    }
}

/// Decides whether an act qualifies for the integration formula.
///
/// The computation lives outside this crate; callers inject it.
pub trait IntegrationFormulaPredicate {
    fn is_integration_formula_eligible(&self, act: &Act) -> bool;
}

/// Reads the eligibility already computed on the act
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecomputedEligibility;

impl IntegrationFormulaPredicate for PrecomputedEligibility {
    fn is_integration_formula_eligible(&self, act: &Act) -> bool {
        act.integration_formula_eligible
    }
}

impl<F> IntegrationFormulaPredicate for F
where
    F: Fn(&Act) -> bool,
{
    fn is_integration_formula_eligible(&self, act: &Act) -> bool {
        self(act)
    }
}

/// True iff the actor holds both signing claims
pub fn can_initiate_signing(actor: &Actor) -> bool {
    actor.has_all(&SIGNING_CLAIMS)
}

/// Pick the signing mode.
///
/// Dual-digital only when the caller asserts eligibility, an act is loaded
/// and the external predicate agrees. A missing act falls back to the
/// standard update.
pub fn select_signing_mode<P>(caller_flag: bool, act: Option<&Act>, predicate: &P) -> SigningMode
where
    P: IntegrationFormulaPredicate + ?Sized,
{
    match act {
        Some(act) if caller_flag && predicate.is_integration_formula_eligible(act) => {
            SigningMode::DualDigital
        }
        _ => SigningMode::StandardUpdate,
    }
}

/// Dual-digital signing needs at least one manually appended mention.
pub fn may_proceed(requires_at_least_one_mention: bool, mention_count: usize) -> bool {
    !requires_at_least_one_mention || mention_count > 0
}

/// Everything the caller knows when the control is rendered
#[derive(Debug, Clone, Copy)]
pub struct SigningInputs<'a> {
    pub actor: &'a Actor,
    pub mentions: &'a [Mention],
    /// "Act is integration-formula eligible and actor holds the rights"
    pub eligible_flag: bool,
    pub act: Option<&'a Act>,
}

/// Combined result of the three eligibility checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub may_sign: bool,
    pub mode: SigningMode,
    /// Mention precondition against the mentions known at evaluation
    pub may_proceed: bool,
    /// At least one manually appended mention is needed before signing
    pub requires_mention: bool,
}

impl Eligibility {
    pub fn evaluate<P>(inputs: &SigningInputs<'_>, predicate: &P) -> Self
    where
        P: IntegrationFormulaPredicate + ?Sized,
    {
        let eligibility = Self {
            may_sign: can_initiate_signing(inputs.actor),
            mode: select_signing_mode(inputs.eligible_flag, inputs.act, predicate),
            may_proceed: may_proceed(inputs.eligible_flag, inputs.mentions.len()),
            requires_mention: inputs.eligible_flag,
        };

        debug!(
            actor = %inputs.actor.id,
            mentions = inputs.mentions.len(),
            eligible_flag = inputs.eligible_flag,
            may_sign = eligibility.may_sign,
            mode = %eligibility.mode,
            may_proceed = eligibility.may_proceed,
            "Evaluated signing eligibility"
        );

        eligibility
    }

    /// Re-check the mention precondition against the current mention count
    pub fn may_proceed_with(&self, mention_count: usize) -> bool {
        may_proceed(self.requires_mention, mention_count)
    }
}
