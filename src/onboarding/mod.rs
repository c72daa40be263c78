//! Onboarding wizard
//!
//! A seven-step intake flow: pair a smart watch, then collect demographics,
//! health metrics, menstrual data, lifestyle, goals and medical history.
//! Only the demographics answers are required.

pub mod device;
pub mod profile;
pub mod session;
pub mod steps;
pub mod submission;
pub mod validation;

pub use device::{
    DeviceModel, DevicePairing, PairedDevice, PairingStatus, SimulatedPairing,
    DEFAULT_CONNECT_DELAY_MS, SUPPORTED_DEVICES,
};
pub use profile::{
    Choice, Demographics, Diet, Ethnicity, ExerciseFrequency, Field, FlowIntensity, Goals,
    HealthGoal, HealthMetrics, Lifestyle, MedicalHistory, MenstrualData, SleepQuality,
    StressLevel, UserProfile, REQUIRED_FIELDS,
};
pub use session::{OnboardingSession, PendingOperation, SessionSnapshot};
pub use steps::{StepFields, StepId, StepTransition, STEP_COUNT, STEP_ORDER};
pub use submission::{ProfileSink, SimulatedSubmission, SubmissionReceipt, DEFAULT_SUBMIT_DELAY_MS};
pub use validation::ValidationErrors;
