//! Granted rights and the capability check for signing
//!
//! A connected agent carries a set of claims; an operation is allowed only
//! when every claim it requires is present.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Rights an agent can be granted on the civil registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Claim {
    /// Sign mentions appended to an act
    SignMention,
    /// Update an act (append or amend mentions)
    UpdateAct,
    /// Deliver copies and extracts
    Deliver,
    /// Consult archived registers
    ConsultArchives,
}

/// Claims required to offer the finish-and-sign control
pub const SIGNING_CLAIMS: [Claim; 2] = [Claim::SignMention, Claim::UpdateAct];

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Claim::SignMention => write!(f, "SIGN_MENTION"),
            Claim::UpdateAct => write!(f, "UPDATE_ACT"),
            Claim::Deliver => write!(f, "DELIVER"),
            Claim::ConsultArchives => write!(f, "CONSULT_ARCHIVES"),
        }
    }
}

impl FromStr for Claim {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "SIGN_MENTION" => Ok(Claim::SignMention),
            "UPDATE_ACT" => Ok(Claim::UpdateAct),
            "DELIVER" => Ok(Claim::Deliver),
            "CONSULT_ARCHIVES" => Ok(Claim::ConsultArchives),
            other => Err(format!("unknown claim: {}", other)),
        }
    }
}

/// The connected agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Actor {
    /// Agent identifier
    pub id: String,

    /// Granted claims
    claims: HashSet<Claim>,
}

impl Actor {
    pub fn new(id: impl Into<String>, claims: impl IntoIterator<Item = Claim>) -> Self {
        Self {
            id: id.into(),
            claims: claims.into_iter().collect(),
        }
    }

    /// Grant an additional claim
    pub fn grant(&mut self, claim: Claim) {
        self.claims.insert(claim);
    }

    pub fn has(&self, claim: Claim) -> bool {
        self.claims.contains(&claim)
    }

    /// True iff every claim in `required` is granted.
    ///
    /// An empty requirement is always satisfied.
    pub fn has_all<'a>(&self, required: impl IntoIterator<Item = &'a Claim>) -> bool {
        required.into_iter().all(|claim| self.claims.contains(claim))
    }

    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }
}

/// Parse a comma-separated claim list such as `"SIGN_MENTION,UPDATE_ACT"`
pub fn parse_claims(list: &str) -> Result<Vec<Claim>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Claim::from_str)
        .collect()
}
