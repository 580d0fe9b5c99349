//! Finish-and-sign workflow
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Eligibility (actor claims, mentions, act)                    │
//! │                          │                                    │
//! │                          ▼                                    │
//! │  ┌──────────────────┐  request  ┌──────────────────────────┐  │
//! │  │ SigningWorkflow  │──────────▶│ SigningSurface           │  │
//! │  │ (state machine)  │◀──────────│ (external signer)        │  │
//! │  └────────┬─────────┘  outcome  └──────────────────────────┘  │
//! │           │ success only                                      │
//! │           ▼                                                   │
//! │  EditSession (tab, signed flag, navigation guard)             │
//! │  NotificationSink                                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod completion;
pub mod controller;
pub mod session;

pub use completion::{
    completion_channel, CompletionHandle, PendingOutcome, SigningRequest, SigningSurface,
};
pub use controller::{
    ControlState, SigningWorkflow, StartOutcome, WorkflowState, MISSING_MENTION_MESSAGE,
    SIGNED_MESSAGE,
};
pub use session::{EditSession, NavigationGuard, SessionActions, SessionValues, Tab};
