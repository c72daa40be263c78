//! Onboarding session state machine
//!
//! The session owns the wizard position, the collected profile and the
//! pairing sub-state of the first step. Device pairing and submission are
//! the only operations that suspend; each has a one-shot async form and a
//! two-phase `begin_*`/`complete_*` form for callers that drive their own
//! event loop. While either is outstanding the session reports `is_busy()`
//! and rejects every transition except field edits.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::device::{DeviceModel, DevicePairing, PairedDevice, PairingStatus};
use super::profile::{Field, UserProfile};
use super::steps::{StepFields, StepId, StepTransition, STEP_COUNT};
use super::submission::{ProfileSink, SubmissionReceipt};
use super::validation::ValidationErrors;
use crate::error::{OnboardingError, PairingError, SubmissionError};

/// Asynchronous operation the session is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOperation {
    Connect,
    Submit,
}

impl fmt::Display for PendingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PendingOperation::Connect => "device connection",
            PendingOperation::Submit => "submission",
        })
    }
}

/// Read-only view of a session for hosts that render it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub step: StepId,
    pub step_index: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub progress_percent: f64,
    pub selected_device: Option<&'static str>,
    pub pairing_status: PairingStatus,
    pub is_busy: bool,
    pub pending: Option<PendingOperation>,
    pub validation_errors: ValidationErrors,
    pub complete: bool,
}

/// A single run through the onboarding wizard
#[derive(Debug, Clone)]
pub struct OnboardingSession {
    session_id: Uuid,
    index: usize,
    profile: UserProfile,
    selected_device: Option<&'static DeviceModel>,
    connecting: Option<&'static DeviceModel>,
    pairing: PairingStatus,
    paired: Option<PairedDevice>,
    pending: Option<PendingOperation>,
    validation_errors: ValidationErrors,
    receipt: Option<SubmissionReceipt>,
}

impl Default for OnboardingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingSession {
    /// Start at the first step with an empty profile and an idle pairing
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        debug!(%session_id, "Onboarding session started");
        Self {
            session_id,
            index: 0,
            profile: UserProfile::default(),
            selected_device: None,
            connecting: None,
            pairing: PairingStatus::Idle,
            paired: None,
            pending: None,
            validation_errors: ValidationErrors::new(),
            receipt: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn current_step(&self) -> StepId {
        StepId::from_index(self.index).unwrap_or(StepId::MedicalHistory)
    }

    /// Form identifier of the current step, e.g. `"healthMetrics"`
    pub fn current_step_id(&self) -> &'static str {
        self.current_step().as_str()
    }

    pub fn pairing_status(&self) -> PairingStatus {
        self.pairing
    }

    pub fn selected_device(&self) -> Option<&'static DeviceModel> {
        self.selected_device
    }

    /// Device of the outstanding pairing, unaffected by later selections
    pub fn connecting_device(&self) -> Option<&'static DeviceModel> {
        self.connecting
    }

    pub fn paired_device(&self) -> Option<&PairedDevice> {
        self.paired.as_ref()
    }

    pub fn pending(&self) -> Option<PendingOperation> {
        self.pending
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Errors from the last refused `next()` or `submit()`, minus fields edited since
    pub fn validation_errors(&self) -> &ValidationErrors {
        &self.validation_errors
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.receipt.is_some()
    }

    /// Share of the wizard reached, counting the current step as visited
    pub fn progress_percent(&self) -> f64 {
        (self.index + 1) as f64 / STEP_COUNT as f64 * 100.0
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let step = self.current_step();
        SessionSnapshot {
            session_id: self.session_id,
            step,
            step_index: self.index,
            title: step.title(),
            description: step.description(),
            progress_percent: self.progress_percent(),
            selected_device: self.selected_device.map(|d| d.id),
            pairing_status: self.pairing,
            is_busy: self.is_busy(),
            pending: self.pending,
            validation_errors: self.validation_errors.clone(),
            complete: self.is_complete(),
        }
    }

    /// The fields of the current step only
    pub fn current_fields(&self) -> StepFields<'_> {
        match self.current_step() {
            StepId::Smartwatch => StepFields::Smartwatch {
                selected: self.selected_device,
                status: self.pairing,
            },
            StepId::Demographics => StepFields::Demographics(&self.profile.demographics),
            StepId::HealthMetrics => StepFields::HealthMetrics(&self.profile.health_metrics),
            StepId::MenstrualData => StepFields::MenstrualData(&self.profile.menstrual),
            StepId::Lifestyle => StepFields::Lifestyle(&self.profile.lifestyle),
            StepId::HealthGoals => StepFields::HealthGoals(&self.profile.goals),
            StepId::MedicalHistory => StepFields::MedicalHistory(&self.profile.medical_history),
        }
    }

    fn ensure_ready(&self) -> Result<(), OnboardingError> {
        if self.receipt.is_some() {
            return Err(OnboardingError::AlreadySubmitted);
        }
        match self.pending {
            Some(op) => Err(OnboardingError::Busy(op)),
            None => Ok(()),
        }
    }

    fn ensure_step(&self, step: StepId, operation: &'static str) -> Result<(), OnboardingError> {
        let current = self.current_step();
        if current != step {
            return Err(OnboardingError::WrongStep {
                operation,
                step: current,
            });
        }
        Ok(())
    }

    /// Choose the watch to pair. Allowed only on the smartwatch step, also
    /// while a pairing is outstanding; that pairing keeps its device.
    pub fn select_device(&mut self, device_id: &str) -> Result<(), OnboardingError> {
        if self.receipt.is_some() {
            return Err(OnboardingError::AlreadySubmitted);
        }
        self.ensure_step(StepId::Smartwatch, "select_device")?;
        let device = DeviceModel::find(device_id)
            .ok_or_else(|| OnboardingError::UnknownDevice(device_id.to_string()))?;

        debug!(session_id = %self.session_id, device = device.id, "Device selected");
        self.selected_device = Some(device);
        Ok(())
    }

    /// Store a form answer by field name
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), OnboardingError> {
        let field: Field = name.parse()?;
        self.set(field, value)
    }

    /// Store a form answer. Permitted on any step, also while busy.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> Result<(), OnboardingError> {
        if self.receipt.is_some() {
            return Err(OnboardingError::AlreadySubmitted);
        }
        self.profile.set(field, value);
        self.validation_errors.remove(field);
        debug!(session_id = %self.session_id, %field, "Field set");
        Ok(())
    }

    /// Mark pairing as started and return the device to pair
    pub fn begin_connect(&mut self) -> Result<&'static DeviceModel, OnboardingError> {
        self.ensure_ready()?;
        self.ensure_step(StepId::Smartwatch, "connect_device")?;
        if self.pairing != PairingStatus::Idle {
            return Err(OnboardingError::PairingNotIdle(self.pairing));
        }
        let device = self.selected_device.ok_or(OnboardingError::NoDeviceSelected)?;

        self.pairing = PairingStatus::Connecting;
        self.connecting = Some(device);
        self.pending = Some(PendingOperation::Connect);
        info!(session_id = %self.session_id, device = device.id, "Connecting device");
        Ok(device)
    }

    /// Settle an outstanding pairing.
    ///
    /// Success connects the device and moves on to demographics. Failure
    /// resets pairing to idle and keeps the smartwatch step.
    pub fn complete_connect(
        &mut self,
        outcome: Result<PairedDevice, PairingError>,
    ) -> Result<StepTransition, OnboardingError> {
        if self.pending != Some(PendingOperation::Connect) {
            return Err(OnboardingError::NothingPending(PendingOperation::Connect));
        }
        self.pending = None;
        self.connecting = None;

        match outcome {
            Ok(paired) => {
                info!(session_id = %self.session_id, device = %paired.device_id, "Device connected");
                self.pairing = PairingStatus::Connected;
                self.paired = Some(paired);
                Ok(self.advance())
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "Device connection failed");
                self.pairing = PairingStatus::Idle;
                Err(OnboardingError::DeviceConnection(e))
            }
        }
    }

    /// Pair the selected device and, on success, advance to the next step
    pub async fn connect_device<P>(&mut self, pairing: &P) -> Result<StepTransition, OnboardingError>
    where
        P: DevicePairing + ?Sized,
    {
        let device = self.begin_connect()?;
        let outcome = pairing.pair(device).await;
        self.complete_connect(outcome)
    }

    /// Move forward one step.
    ///
    /// Refused on the smartwatch step until a device is connected, and on
    /// the demographics step until every required field is filled. On the
    /// last step nothing moves; the caller is told to submit instead.
    pub fn next(&mut self) -> Result<StepTransition, OnboardingError> {
        self.ensure_ready()?;

        let step = self.current_step();
        match step {
            StepId::Smartwatch if self.pairing != PairingStatus::Connected => {
                return Err(OnboardingError::DeviceNotConnected);
            }
            StepId::Demographics => self.check_required()?,
            _ => {}
        }

        if step.is_last() {
            return Ok(StepTransition::ReadyToSubmit);
        }
        Ok(self.advance())
    }

    /// Move back one step; a no-op on the first step
    pub fn previous(&mut self) -> Result<StepTransition, OnboardingError> {
        self.ensure_ready()?;

        let from = self.current_step();
        if self.index == 0 {
            return Ok(StepTransition::Stayed(from));
        }
        self.index -= 1;
        let to = self.current_step();
        debug!(session_id = %self.session_id, %from, %to, "Step back");
        Ok(StepTransition::Retreated { from, to })
    }

    /// Mark submission as started. Allowed only on the last step.
    pub fn begin_submit(&mut self) -> Result<&UserProfile, OnboardingError> {
        self.ensure_ready()?;
        let last = StepId::from_index(STEP_COUNT - 1).unwrap_or(StepId::MedicalHistory);
        self.ensure_step(last, "submit")?;
        self.check_required()?;

        self.pending = Some(PendingOperation::Submit);
        info!(session_id = %self.session_id, "Submitting onboarding");
        Ok(&self.profile)
    }

    /// Settle an outstanding submission. Success ends the session for good.
    pub fn complete_submit(
        &mut self,
        outcome: Result<SubmissionReceipt, SubmissionError>,
    ) -> Result<SubmissionReceipt, OnboardingError> {
        if self.pending != Some(PendingOperation::Submit) {
            return Err(OnboardingError::NothingPending(PendingOperation::Submit));
        }
        self.pending = None;

        match outcome {
            Ok(receipt) => {
                info!(
                    session_id = %self.session_id,
                    submission_id = %receipt.submission_id,
                    "Onboarding submitted"
                );
                self.receipt = Some(receipt.clone());
                Ok(receipt)
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "Submission failed");
                Err(OnboardingError::Submission(e))
            }
        }
    }

    /// Hand the profile to `sink` and end the session on success
    pub async fn submit<S>(&mut self, sink: &S) -> Result<SubmissionReceipt, OnboardingError>
    where
        S: ProfileSink + ?Sized,
    {
        let outcome = {
            let profile = self.begin_submit()?;
            sink.submit(profile).await
        };
        self.complete_submit(outcome)
    }

    fn check_required(&mut self) -> Result<(), OnboardingError> {
        let errors = ValidationErrors::check_required(&self.profile);
        if errors.is_empty() {
            return Ok(());
        }
        debug!(session_id = %self.session_id, %errors, "Required fields missing");
        self.validation_errors = errors.clone();
        Err(OnboardingError::Validation(errors))
    }

    fn advance(&mut self) -> StepTransition {
        let from = self.current_step();
        self.index = (self.index + 1).min(STEP_COUNT - 1);
        self.validation_errors.clear();
        let to = self.current_step();
        debug!(session_id = %self.session_id, %from, %to, "Step forward");
        StepTransition::Advanced { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::{SimulatedPairing, SimulatedSubmission};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProfileSink for CountingSink {
        async fn submit(&self, _profile: &UserProfile) -> Result<SubmissionReceipt, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SubmissionReceipt {
                submission_id: Uuid::new_v4(),
                submitted_at: chrono::Utc::now(),
            })
        }
    }

    fn fill_demographics(session: &mut OnboardingSession) {
        session.set_field("age", "28").unwrap();
        session.set_field("location", "Nairobi").unwrap();
        session.set_field("ethnicity", "black").unwrap();
    }

    async fn connected_session() -> OnboardingSession {
        let mut session = OnboardingSession::new();
        session.select_device("apple-watch").unwrap();
        session
            .connect_device(&SimulatedPairing::immediate())
            .await
            .unwrap();
        session
    }

    #[test]
    fn test_initial_state() {
        let session = OnboardingSession::new();

        assert_eq!(session.step_index(), 0);
        assert_eq!(session.current_step_id(), "smartwatch");
        assert_eq!(session.pairing_status(), PairingStatus::Idle);
        assert!(!session.is_busy());
        assert!(session.validation_errors().is_empty());
        assert_eq!(session.profile(), &UserProfile::default());
    }

    #[test]
    fn test_next_refused_until_connected() {
        let mut session = OnboardingSession::new();
        session.select_device("garmin-venu").unwrap();

        let err = session.next().unwrap_err();
        assert_eq!(err, OnboardingError::DeviceNotConnected);
        assert_eq!(session.step_index(), 0);
        assert_eq!(session.pairing_status(), PairingStatus::Idle);
    }

    #[test]
    fn test_previous_at_first_step_is_noop() {
        let mut session = OnboardingSession::new();

        let transition = session.previous().unwrap();
        assert_eq!(transition, StepTransition::Stayed(StepId::Smartwatch));
        assert_eq!(session.step_index(), 0);
    }

    #[test]
    fn test_connect_requires_selected_device() {
        let mut session = OnboardingSession::new();

        assert_eq!(
            session.begin_connect().unwrap_err(),
            OnboardingError::NoDeviceSelected
        );
        assert_eq!(session.pairing_status(), PairingStatus::Idle);
        assert!(matches!(
            session.select_device("tamagotchi"),
            Err(OnboardingError::UnknownDevice(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_success_advances_to_demographics() {
        let session = connected_session().await;

        assert_eq!(session.pairing_status(), PairingStatus::Connected);
        assert_eq!(session.current_step(), StepId::Demographics);
        assert_eq!(session.paired_device().unwrap().device_id, "apple-watch");
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_connect_failure_returns_to_idle() {
        let mut session = OnboardingSession::new();
        session.select_device("fitbit-sense").unwrap();

        let err = session
            .connect_device(&SimulatedPairing::immediate().failing("bluetooth off"))
            .await
            .unwrap_err();

        assert!(matches!(err, OnboardingError::DeviceConnection(_)));
        assert_eq!(session.pairing_status(), PairingStatus::Idle);
        assert_eq!(session.step_index(), 0);
        assert!(!session.is_busy());

        // Selection is offered again and a retry can succeed
        session.select_device("huawei-watch").unwrap();
        session
            .connect_device(&SimulatedPairing::immediate())
            .await
            .unwrap();
        assert_eq!(session.step_index(), 1);
    }

    #[test]
    fn test_busy_while_connecting_rejects_transitions() {
        let mut session = OnboardingSession::new();
        session.select_device("amazfit-gts").unwrap();
        let device = session.begin_connect().unwrap();
        assert_eq!(device.id, "amazfit-gts");

        assert!(session.is_busy());
        assert_eq!(session.pairing_status(), PairingStatus::Connecting);
        let busy = OnboardingError::Busy(PendingOperation::Connect);
        assert_eq!(session.begin_connect().unwrap_err(), busy);
        assert_eq!(session.next().unwrap_err(), busy);
        assert_eq!(session.previous().unwrap_err(), busy);

        // Selection and field edits stay available
        session.select_device("garmin-venu").unwrap();
        assert_eq!(session.selected_device().unwrap().id, "garmin-venu");
        assert_eq!(session.connecting_device().unwrap().id, "amazfit-gts");
        assert_eq!(session.pairing_status(), PairingStatus::Connecting);
        assert_eq!(session.current_step(), StepId::Smartwatch);
        session.set(Field::Age, "31").unwrap();

        let paired = PairedDevice {
            device_id: device.id.to_string(),
            paired_at: chrono::Utc::now(),
        };
        let transition = session.complete_connect(Ok(paired)).unwrap();
        assert_eq!(
            transition,
            StepTransition::Advanced {
                from: StepId::Smartwatch,
                to: StepId::Demographics
            }
        );
        assert!(!session.is_busy());
        assert!(session.connecting_device().is_none());
    }

    #[test]
    fn test_complete_without_pending_is_rejected() {
        let mut session = OnboardingSession::new();
        let err = session
            .complete_connect(Err(PairingError {
                device: "other".to_string(),
                reason: "late".to_string(),
            }))
            .unwrap_err();

        assert_eq!(err, OnboardingError::NothingPending(PendingOperation::Connect));
    }

    #[tokio::test]
    async fn test_demographics_requires_age() {
        let mut session = connected_session().await;
        session.set_field("age", "").unwrap();
        session.set_field("location", "Lima").unwrap();
        session.set_field("ethnicity", "hispanic").unwrap();

        let err = session.next().unwrap_err();

        assert_eq!(err.field_message(Field::Age), Some("Age is required"));
        assert_eq!(err.field_message(Field::Location), None);
        assert_eq!(session.step_index(), 1);
        assert!(session.validation_errors().contains(Field::Age));

        session.set_field("age", "29").unwrap();
        assert!(session.validation_errors().is_empty());
        session.next().unwrap();
        assert_eq!(session.current_step(), StepId::HealthMetrics);
    }

    #[tokio::test]
    async fn test_select_device_outside_first_step() {
        let mut session = connected_session().await;

        assert_eq!(
            session.select_device("other").unwrap_err(),
            OnboardingError::WrongStep {
                operation: "select_device",
                step: StepId::Demographics
            }
        );
    }

    #[tokio::test]
    async fn test_back_to_first_step_keeps_connection() {
        let mut session = connected_session().await;

        session.previous().unwrap();
        assert_eq!(session.current_step(), StepId::Smartwatch);
        assert_eq!(
            session.begin_connect().unwrap_err(),
            OnboardingError::PairingNotIdle(PairingStatus::Connected)
        );

        session.next().unwrap();
        assert_eq!(session.current_step(), StepId::Demographics);
    }

    #[tokio::test]
    async fn test_submit_only_on_last_step() {
        let mut session = connected_session().await;
        fill_demographics(&mut session);

        let err = session
            .submit(&SimulatedSubmission::immediate())
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::WrongStep { operation: "submit", .. }));
        assert!(!session.is_complete());
    }

    #[tokio::test]
    async fn test_current_fields_follow_step() {
        let mut session = connected_session().await;
        fill_demographics(&mut session);

        match session.current_fields() {
            StepFields::Demographics(d) => assert_eq!(d.location.as_deref(), Some("Nairobi")),
            other => panic!("unexpected fields for demographics: {other:?}"),
        }

        session.next().unwrap();
        session.next().unwrap();
        session.set_field("cycleLength", "30").unwrap();
        match session.current_fields() {
            StepFields::MenstrualData(m) => assert_eq!(m.cycle_length.as_deref(), Some("30")),
            other => panic!("unexpected fields for menstrual step: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_full_happy_path_completes_once() {
        let mut session = OnboardingSession::new();
        session.select_device("withings-scanwatch").unwrap();
        session
            .connect_device(&SimulatedPairing::immediate())
            .await
            .unwrap();
        assert_eq!(session.step_index(), 1);

        fill_demographics(&mut session);
        session.next().unwrap();
        assert_eq!(session.step_index(), 2);

        session.set_field("bmi", "22.5").unwrap();
        session.next().unwrap();
        session.set_field("cycleLength", "28").unwrap();
        session.set_field("lastPeriod", "2025-02-01").unwrap();
        session.next().unwrap();
        session.set_field("diet", "vegetarian").unwrap();
        session.next().unwrap();
        session.set_field("healthGoals", "fertility").unwrap();
        session.next().unwrap();
        assert_eq!(session.step_index(), 6);
        assert_eq!(session.progress_percent(), 100.0);

        assert_eq!(session.next().unwrap(), StepTransition::ReadyToSubmit);
        assert_eq!(session.step_index(), 6);

        let sink = CountingSink {
            calls: AtomicUsize::new(0),
        };
        let receipt = session.submit(&sink).await.unwrap();
        assert!(session.is_complete());
        assert_eq!(session.receipt(), Some(&receipt));

        assert_eq!(
            session.submit(&sink).await.unwrap_err(),
            OnboardingError::AlreadySubmitted
        );
        assert_eq!(session.next().unwrap_err(), OnboardingError::AlreadySubmitted);
        assert!(session.set_field("age", "30").is_err());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_can_be_retried() {
        let mut session = connected_session().await;
        fill_demographics(&mut session);
        while session.next().unwrap() != StepTransition::ReadyToSubmit {}

        let err = session
            .submit(&SimulatedSubmission::immediate().failing("server unavailable"))
            .await
            .unwrap_err();
        assert!(matches!(err, OnboardingError::Submission(_)));
        assert!(!session.is_busy());
        assert!(!session.is_complete());

        session
            .submit(&SimulatedSubmission::immediate())
            .await
            .unwrap();
        assert!(session.is_complete());
    }

    #[tokio::test]
    async fn test_submit_rechecks_required_fields() {
        let mut session = connected_session().await;
        fill_demographics(&mut session);
        while session.next().unwrap() != StepTransition::ReadyToSubmit {}
        session.set(Field::Location, "").unwrap();

        let err = session.begin_submit().unwrap_err();
        assert_eq!(err.field_message(Field::Location), Some("Location is required"));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_busy_while_submitting() {
        let mut session = connected_session().await;
        fill_demographics(&mut session);
        while session.next().unwrap() != StepTransition::ReadyToSubmit {}

        session.begin_submit().unwrap();
        assert!(session.is_busy());
        assert_eq!(
            session.previous().unwrap_err(),
            OnboardingError::Busy(PendingOperation::Submit)
        );

        let receipt = SubmissionReceipt {
            submission_id: Uuid::new_v4(),
            submitted_at: chrono::Utc::now(),
        };
        session.complete_submit(Ok(receipt)).unwrap();
        assert!(session.is_complete());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session = OnboardingSession::new();
        session.select_device("other").unwrap();
        session.begin_connect().unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.step, StepId::Smartwatch);
        assert_eq!(snapshot.title, "Connect Smart Watch");
        assert_eq!(snapshot.selected_device, Some("other"));
        assert_eq!(snapshot.pairing_status, PairingStatus::Connecting);
        assert!(snapshot.is_busy);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["step"], "smartwatch");
        assert_eq!(json["pending"], "connect");
    }

    #[test]
    fn test_progress_percent() {
        let session = OnboardingSession::new();
        assert!((session.progress_percent() - 100.0 / 7.0).abs() < 1e-9);
    }
}
