//! Finish-and-sign workflow controller
//!
//! One instance per user interaction:
//!
//! ```text
//!   IDLE ──start (may sign, may proceed)──▶ CONFIRMING ──success──▶ COMPLETED
//!    ▲  ╲                                       │
//!    │   ╲ start without a required mention      │ failure
//!    │    ╲──▶ error notification, stay IDLE     │
//!    └───────────────────────────────────────────┘
//! ```
//!
//! Session writes happen only on success, once each, in a fixed order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::eligibility::Eligibility;
use crate::notify::NotificationSink;

use super::completion::{completion_channel, SigningRequest, SigningSurface};
use super::session::{SessionActions, SessionValues, Tab};

/// Shown when dual-digital signing is attempted without any mention
pub const MISSING_MENTION_MESSAGE: &str =
    "At least one manually appended mention must be added before signing can proceed.";

/// Shown once the act is signed
pub const SIGNED_MESSAGE: &str = "The act was updated successfully.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Idle,
    Confirming,
    Completed,
}

/// How the finish-and-sign control is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Actor lacks the signing claims; nothing is shown
    Hidden,
    Disabled,
    Enabled,
}

/// Result of a start attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// No signing capability, nothing happens
    Hidden,
    /// Mention precondition failed, an error was notified
    Rejected,
    /// Confirmation surface opened for this request
    Confirming(SigningRequest),
    /// A surface is already open
    AlreadyOpen,
    AlreadyCompleted,
}

/// Drives one finish-and-sign interaction
pub struct SigningWorkflow<S, N> {
    session: S,
    notifier: N,
    eligibility: Eligibility,
    state: WorkflowState,
    pending: Option<SigningRequest>,
}

impl<S, N> SigningWorkflow<S, N>
where
    S: SessionValues + SessionActions,
    N: NotificationSink,
{
    pub fn new(session: S, notifier: N, eligibility: Eligibility) -> Self {
        Self {
            session,
            notifier,
            eligibility,
            state: WorkflowState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Whether the confirmation surface is currently shown
    pub fn is_surface_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Mention precondition against the session's current mentions
    fn may_proceed(&self) -> bool {
        self.eligibility.may_proceed_with(self.session.mention_count())
    }

    /// Render-time gate. Independent of the state machine.
    pub fn control_state(&self) -> ControlState {
        if !self.eligibility.may_sign {
            return ControlState::Hidden;
        }

        let disabled = self.session.mention_entry_in_progress()
            || !self.session.update_performed()
            || !self.may_proceed();

        if disabled {
            ControlState::Disabled
        } else {
            ControlState::Enabled
        }
    }

    /// User pressed "finish and sign"
    pub fn start(&mut self) -> StartOutcome {
        match self.state {
            WorkflowState::Confirming => return StartOutcome::AlreadyOpen,
            WorkflowState::Completed => return StartOutcome::AlreadyCompleted,
            WorkflowState::Idle => {}
        }

        if !self.eligibility.may_sign {
            debug!("Signing not offered: actor lacks signing claims");
            return StartOutcome::Hidden;
        }

        if !self.may_proceed() {
            warn!(
                act_id = %self.session.act_id(),
                "Signing refused: no manually appended mention"
            );
            self.notifier.error(MISSING_MENTION_MESSAGE);
            return StartOutcome::Rejected;
        }

        let request = SigningRequest {
            mode: self.eligibility.mode,
            act_id: self.session.act_id(),
            request_id: self.session.request_id(),
        };

        info!(
            act_id = %request.act_id,
            request_id = %request.request_id,
            mode = %request.mode,
            "Opening signing confirmation"
        );

        self.pending = Some(request);
        self.state = WorkflowState::Confirming;
        StartOutcome::Confirming(request)
    }

    /// Outcome reported by the confirmation surface.
    ///
    /// Ignored unless a surface is open.
    pub fn complete(&mut self, success: bool) -> WorkflowState {
        let Some(request) = self.pending.take() else {
            warn!(state = ?self.state, "Signing outcome received with no open surface");
            return self.state;
        };

        if !success {
            warn!(act_id = %request.act_id, mode = %request.mode, "Signing did not complete");
            self.state = WorkflowState::Idle;
            return self.state;
        }

        self.state = WorkflowState::Completed;

        self.session.change_tab(Tab::Act, None);
        self.session.set_act_signed(true);
        self.notifier.success(SIGNED_MESSAGE, true);
        self.session.disable_navigation_guard();

        info!(act_id = %request.act_id, mode = %request.mode, "Act signed");
        self.state
    }

    /// Hand the open request to `surface` and apply its outcome
    pub async fn confirm<F>(&mut self, surface: &F) -> WorkflowState
    where
        F: SigningSurface + ?Sized,
    {
        let Some(request) = self.pending else {
            return self.state;
        };

        let (handle, outcome) = completion_channel();
        surface.sign(request, handle).await;
        let success = outcome.wait().await;
        self.complete(success)
    }

    /// Start and, when the surface opens, confirm in one go
    pub async fn run<F>(&mut self, surface: &F) -> (StartOutcome, WorkflowState)
    where
        F: SigningSurface + ?Sized,
    {
        let started = self.start();
        let state = match started {
            StartOutcome::Confirming(_) => self.confirm(surface).await,
            _ => self.state,
        };
        (started, state)
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_parts(self) -> (S, N) {
        (self.session, self.notifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Actor, Claim, SIGNING_CLAIMS};
    use crate::eligibility::{Act, Mention, PrecomputedEligibility, SigningInputs, SigningMode};
    use crate::workflow::completion::CompletionHandle;
    use crate::workflow::session::EditSession;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Tab(Tab, Option<Uuid>),
        Signed(bool),
        Error(String),
        Success(String, bool),
        GuardDisabled,
    }

    type Journal = Rc<RefCell<Vec<Event>>>;

    struct RecordingSession {
        inner: EditSession,
        journal: Journal,
    }

    impl SessionValues for RecordingSession {
        fn act_id(&self) -> Uuid {
            self.inner.act_id
        }
        fn request_id(&self) -> Uuid {
            self.inner.request_id
        }
        fn update_performed(&self) -> bool {
            self.inner.update_performed
        }
        fn mention_entry_in_progress(&self) -> bool {
            self.inner.mention_entry_in_progress
        }
        fn mention_count(&self) -> usize {
            self.inner.mention_count()
        }
    }

    impl SessionActions for RecordingSession {
        fn change_tab(&mut self, tab: Tab, selection: Option<Uuid>) {
            self.journal.borrow_mut().push(Event::Tab(tab, selection));
            self.inner.change_tab(tab, selection);
        }
        fn set_act_signed(&mut self, signed: bool) {
            self.journal.borrow_mut().push(Event::Signed(signed));
            self.inner.set_act_signed(signed);
        }
        fn disable_navigation_guard(&mut self) {
            self.journal.borrow_mut().push(Event::GuardDisabled);
            self.inner.disable_navigation_guard();
        }
    }

    struct RecordingNotifier {
        journal: Journal,
    }

    impl NotificationSink for RecordingNotifier {
        fn error(&mut self, message: &str) {
            self.journal.borrow_mut().push(Event::Error(message.to_string()));
        }
        fn success(&mut self, message: &str, auto_dismiss: bool) {
            self.journal
                .borrow_mut()
                .push(Event::Success(message.to_string(), auto_dismiss));
        }
    }

    struct FixedSurface {
        success: bool,
    }

    #[async_trait]
    impl SigningSurface for FixedSurface {
        async fn sign(&self, _request: SigningRequest, completion: CompletionHandle) {
            completion.report(self.success);
        }
    }

    /// Drops the handle without answering
    struct SilentSurface;

    #[async_trait]
    impl SigningSurface for SilentSurface {
        async fn sign(&self, _request: SigningRequest, _completion: CompletionHandle) {}
    }

    struct Setup {
        claims: Vec<Claim>,
        eligible_flag: bool,
        act_eligible: Option<bool>,
        mentions: usize,
        update_performed: bool,
        entry_in_progress: bool,
    }

    impl Default for Setup {
        fn default() -> Self {
            Self {
                claims: SIGNING_CLAIMS.to_vec(),
                eligible_flag: false,
                act_eligible: Some(false),
                mentions: 0,
                update_performed: true,
                entry_in_progress: false,
            }
        }
    }

    fn workflow(setup: Setup) -> (SigningWorkflow<RecordingSession, RecordingNotifier>, Journal) {
        let actor = Actor::new("agent", setup.claims);
        let act = setup
            .act_eligible
            .map(|eligible| Act::new(Uuid::new_v4(), true, eligible));
        let mentions: Vec<Mention> = (0..setup.mentions).map(|_| Mention::draft("MARIAGE")).collect();

        let inputs = SigningInputs {
            actor: &actor,
            mentions: &mentions,
            eligible_flag: setup.eligible_flag,
            act: act.as_ref(),
        };
        let eligibility = Eligibility::evaluate(&inputs, &PrecomputedEligibility);

        let mut inner = EditSession::new(
            act.as_ref().map(|a| a.id).unwrap_or_else(Uuid::new_v4),
            Uuid::new_v4(),
        );
        inner.update_performed = setup.update_performed;
        inner.mention_entry_in_progress = setup.entry_in_progress;
        for mention in mentions {
            inner.add_mention(mention);
        }

        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let session = RecordingSession {
            inner,
            journal: journal.clone(),
        };
        let notifier = RecordingNotifier {
            journal: journal.clone(),
        };
        (SigningWorkflow::new(session, notifier, eligibility), journal)
    }

    #[test]
    fn test_missing_claim_hides_control() {
        for claims in [vec![Claim::SignMention], vec![Claim::UpdateAct], vec![]] {
            let (mut wf, journal) = workflow(Setup {
                claims,
                ..Default::default()
            });
            assert_eq!(wf.control_state(), ControlState::Hidden);
            assert_eq!(wf.start(), StartOutcome::Hidden);
            assert_eq!(wf.state(), WorkflowState::Idle);
            assert!(!wf.is_surface_open());
            assert!(journal.borrow().is_empty());
        }
    }

    #[test]
    fn test_required_mention_missing_rejects() {
        let (mut wf, journal) = workflow(Setup {
            eligible_flag: true,
            act_eligible: Some(true),
            mentions: 0,
            ..Default::default()
        });

        assert_eq!(wf.start(), StartOutcome::Rejected);
        assert_eq!(wf.state(), WorkflowState::Idle);
        assert!(!wf.is_surface_open());
        assert_eq!(
            *journal.borrow(),
            vec![Event::Error(MISSING_MENTION_MESSAGE.to_string())]
        );
    }

    #[test]
    fn test_mention_added_after_rejection_opens() {
        let (mut wf, journal) = workflow(Setup {
            eligible_flag: true,
            act_eligible: Some(true),
            mentions: 0,
            ..Default::default()
        });
        assert_eq!(wf.control_state(), ControlState::Disabled);
        assert_eq!(wf.start(), StartOutcome::Rejected);

        wf.session.inner.add_mention(Mention::draft("DIVORCE"));

        assert_eq!(wf.control_state(), ControlState::Enabled);
        match wf.start() {
            StartOutcome::Confirming(request) => assert_eq!(request.mode, SigningMode::DualDigital),
            other => panic!("expected confirming, got {:?}", other),
        }
        assert_eq!(wf.state(), WorkflowState::Confirming);
        assert_eq!(journal.borrow().len(), 1);
    }

    #[test]
    fn test_no_requirement_opens_without_mentions() {
        let (mut wf, journal) = workflow(Setup {
            eligible_flag: false,
            mentions: 0,
            ..Default::default()
        });

        match wf.start() {
            StartOutcome::Confirming(request) => {
                assert_eq!(request.mode, SigningMode::StandardUpdate);
                assert_eq!(request.act_id, wf.session().act_id());
            }
            other => panic!("expected confirming, got {:?}", other),
        }
        assert_eq!(wf.state(), WorkflowState::Confirming);
        assert!(wf.is_surface_open());
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn test_dual_digital_request_with_mention() {
        let (mut wf, _journal) = workflow(Setup {
            eligible_flag: true,
            act_eligible: Some(true),
            mentions: 1,
            ..Default::default()
        });

        match wf.start() {
            StartOutcome::Confirming(request) => assert_eq!(request.mode, SigningMode::DualDigital),
            other => panic!("expected confirming, got {:?}", other),
        }
    }

    #[test]
    fn test_second_start_while_open() {
        let (mut wf, _journal) = workflow(Setup::default());
        assert!(matches!(wf.start(), StartOutcome::Confirming(_)));
        assert_eq!(wf.start(), StartOutcome::AlreadyOpen);
    }

    #[test]
    fn test_success_effects_in_order() {
        let (mut wf, journal) = workflow(Setup::default());
        wf.start();

        assert_eq!(wf.complete(true), WorkflowState::Completed);
        assert!(!wf.is_surface_open());
        assert_eq!(
            *journal.borrow(),
            vec![
                Event::Tab(Tab::Act, None),
                Event::Signed(true),
                Event::Success(SIGNED_MESSAGE.to_string(), true),
                Event::GuardDisabled,
            ]
        );

        let session = &wf.session().inner;
        assert!(session.is_act_signed());
        assert_eq!(session.active_tab(), Tab::Act);

        // Terminal: nothing else happens
        assert_eq!(wf.start(), StartOutcome::AlreadyCompleted);
        assert_eq!(wf.complete(true), WorkflowState::Completed);
        assert_eq!(journal.borrow().len(), 4);
    }

    #[test]
    fn test_failure_returns_to_idle() {
        let (mut wf, journal) = workflow(Setup::default());
        wf.start();

        assert_eq!(wf.complete(false), WorkflowState::Idle);
        assert!(!wf.is_surface_open());
        assert!(journal.borrow().is_empty());
        assert!(!wf.session().inner.is_act_signed());
        assert_eq!(wf.session().inner.active_tab(), Tab::Mentions);

        // User may start again
        assert!(matches!(wf.start(), StartOutcome::Confirming(_)));
    }

    #[test]
    fn test_complete_without_open_surface_is_ignored() {
        let (mut wf, journal) = workflow(Setup::default());
        assert_eq!(wf.complete(true), WorkflowState::Idle);
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn test_control_state_gate() {
        let (wf, _) = workflow(Setup::default());
        assert_eq!(wf.control_state(), ControlState::Enabled);

        let (wf, _) = workflow(Setup {
            entry_in_progress: true,
            ..Default::default()
        });
        assert_eq!(wf.control_state(), ControlState::Disabled);

        let (wf, _) = workflow(Setup {
            update_performed: false,
            ..Default::default()
        });
        assert_eq!(wf.control_state(), ControlState::Disabled);

        let (wf, _) = workflow(Setup {
            eligible_flag: true,
            act_eligible: Some(true),
            mentions: 0,
            ..Default::default()
        });
        assert_eq!(wf.control_state(), ControlState::Disabled);
    }

    #[test]
    fn test_disabled_control_does_not_change_state() {
        let (wf, _) = workflow(Setup {
            update_performed: false,
            ..Default::default()
        });
        assert_eq!(wf.control_state(), ControlState::Disabled);
        assert_eq!(wf.state(), WorkflowState::Idle);
    }

    #[tokio::test]
    async fn test_run_success() {
        let (mut wf, journal) = workflow(Setup::default());
        let (started, state) = wf.run(&FixedSurface { success: true }).await;

        assert!(matches!(started, StartOutcome::Confirming(_)));
        assert_eq!(state, WorkflowState::Completed);
        assert_eq!(journal.borrow().len(), 4);
    }

    #[tokio::test]
    async fn test_run_failure_and_silent_surface() {
        let (mut wf, journal) = workflow(Setup::default());
        let (_, state) = wf.run(&FixedSurface { success: false }).await;
        assert_eq!(state, WorkflowState::Idle);

        let (_, state) = wf.run(&SilentSurface).await;
        assert_eq!(state, WorkflowState::Idle);
        assert!(journal.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_run_rejected_never_reaches_surface() {
        let (mut wf, journal) = workflow(Setup {
            eligible_flag: true,
            act_eligible: None,
            mentions: 0,
            ..Default::default()
        });
        let (started, state) = wf.run(&FixedSurface { success: true }).await;

        assert_eq!(started, StartOutcome::Rejected);
        assert_eq!(state, WorkflowState::Idle);
        assert_eq!(journal.borrow().len(), 1);
    }
}
