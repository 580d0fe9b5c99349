//! Mention-update session context
//!
//! The state shared by every control of an act update screen. The
//! signing workflow reads the identifiers, the mentions appended so far and
//! the "update performed" flag, and writes the signed flag, the active tab
//! and the navigation guard.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::eligibility::Mention;

/// Tabs of the update screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tab {
    /// The act view
    Act,
    /// Mention entry form
    Mentions,
    /// The originating request
    Request,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Act => write!(f, "ACT"),
            Tab::Mentions => write!(f, "MENTIONS"),
            Tab::Request => write!(f, "REQUEST"),
        }
    }
}

/// Guard preventing the user from leaving with unsigned changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationGuard {
    Armed,
    Released,
}

/// Reads the signing workflow performs on the session
pub trait SessionValues {
    fn act_id(&self) -> Uuid;

    fn request_id(&self) -> Uuid;

    fn update_performed(&self) -> bool;

    fn mention_entry_in_progress(&self) -> bool;

    /// Mentions appended to the act so far
    fn mention_count(&self) -> usize;
}

/// Writes the signing workflow performs on the session
pub trait SessionActions {
    /// Switch the active tab, optionally selecting an item in it
    fn change_tab(&mut self, tab: Tab, selection: Option<Uuid>);

    fn set_act_signed(&mut self, signed: bool);

    /// Stop blocking navigation away from the screen
    fn disable_navigation_guard(&mut self);
}

/// Context of one act update screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditSession {
    /// Act being updated
    pub act_id: Uuid,

    /// Request that triggered the update
    pub request_id: Uuid,

    /// Set by the surrounding workflow once the mention update was saved
    pub update_performed: bool,

    /// Whether a mention is currently being typed in the form
    pub mention_entry_in_progress: bool,

    mentions: Vec<Mention>,
    act_signed: bool,
    active_tab: Tab,
    selection: Option<Uuid>,
    navigation_guard: NavigationGuard,
}

impl EditSession {
    /// Create a session on the mention entry tab with the guard armed
    pub fn new(act_id: Uuid, request_id: Uuid) -> Self {
        Self {
            act_id,
            request_id,
            update_performed: false,
            mention_entry_in_progress: false,
            mentions: Vec::new(),
            act_signed: false,
            active_tab: Tab::Mentions,
            selection: None,
            navigation_guard: NavigationGuard::Armed,
        }
    }

    /// Mark the mention update as saved
    pub fn mark_update_performed(&mut self) {
        self.update_performed = true;
    }

    pub fn add_mention(&mut self, mention: Mention) {
        debug!(act_id = %self.act_id, mention_id = %mention.id, kind = %mention.kind, "Mention appended");
        self.mentions.push(mention);
    }

    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    pub fn is_act_signed(&self) -> bool {
        self.act_signed
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn selection(&self) -> Option<Uuid> {
        self.selection
    }

    pub fn navigation_guard(&self) -> NavigationGuard {
        self.navigation_guard
    }
}

impl SessionValues for EditSession {
    fn act_id(&self) -> Uuid {
        self.act_id
    }

    fn request_id(&self) -> Uuid {
        self.request_id
    }

    fn update_performed(&self) -> bool {
        self.update_performed
    }

    fn mention_entry_in_progress(&self) -> bool {
        self.mention_entry_in_progress
    }

    fn mention_count(&self) -> usize {
        self.mentions.len()
    }
}

impl SessionActions for EditSession {
    fn change_tab(&mut self, tab: Tab, selection: Option<Uuid>) {
        debug!(act_id = %self.act_id, from = %self.active_tab, to = %tab, "Changing tab");
        self.active_tab = tab;
        self.selection = selection;
    }

    fn set_act_signed(&mut self, signed: bool) {
        self.act_signed = signed;
    }

    fn disable_navigation_guard(&mut self) {
        if self.navigation_guard == NavigationGuard::Armed {
            info!(act_id = %self.act_id, "Navigation guard released");
        }
        self.navigation_guard = NavigationGuard::Released;
    }
}
