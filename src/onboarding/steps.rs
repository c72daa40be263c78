//! Onboarding wizard steps

use serde::{Deserialize, Serialize};
use std::fmt;

use super::device::{DeviceModel, PairingStatus};
use super::profile::{Demographics, Goals, HealthMetrics, Lifestyle, MedicalHistory, MenstrualData};

/// Identifier of one wizard page, in wizard order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepId {
    Smartwatch,
    Demographics,
    HealthMetrics,
    MenstrualData,
    Lifestyle,
    HealthGoals,
    MedicalHistory,
}

/// Every step, in the order the wizard visits them
pub const STEP_ORDER: [StepId; 7] = [
    StepId::Smartwatch,
    StepId::Demographics,
    StepId::HealthMetrics,
    StepId::MenstrualData,
    StepId::Lifestyle,
    StepId::HealthGoals,
    StepId::MedicalHistory,
];

/// Number of wizard steps
pub const STEP_COUNT: usize = STEP_ORDER.len();

impl StepId {
    /// Step at a zero-based wizard index
    pub fn from_index(index: usize) -> Option<StepId> {
        STEP_ORDER.get(index).copied()
    }

    /// Zero-based wizard index
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Smartwatch => "smartwatch",
            StepId::Demographics => "demographics",
            StepId::HealthMetrics => "healthMetrics",
            StepId::MenstrualData => "menstrualData",
            StepId::Lifestyle => "lifestyle",
            StepId::HealthGoals => "healthGoals",
            StepId::MedicalHistory => "medicalHistory",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StepId::Smartwatch => "Connect Smart Watch",
            StepId::Demographics => "Demographics",
            StepId::HealthMetrics => "Health Metrics",
            StepId::MenstrualData => "Menstrual Data",
            StepId::Lifestyle => "Lifestyle",
            StepId::HealthGoals => "Health Goals",
            StepId::MedicalHistory => "Medical History",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StepId::Smartwatch => "Connect your device",
            StepId::Demographics => "Tell us about yourself",
            StepId::HealthMetrics => "Your basic health measurements",
            StepId::MenstrualData => "Information about your cycle",
            StepId::Lifestyle => "Your daily habits",
            StepId::HealthGoals => "What you want to achieve",
            StepId::MedicalHistory => "Your health background",
        }
    }

    pub fn is_last(self) -> bool {
        self.index() == STEP_COUNT - 1
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a `next()` or `previous()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    /// Moved between two steps
    Advanced { from: StepId, to: StepId },
    /// Moved back one step
    Retreated { from: StepId, to: StepId },
    /// Already at the boundary; nothing changed
    Stayed(StepId),
    /// At the final step; the caller should submit
    ReadyToSubmit,
}

/// The slice of session state a single step renders and edits.
///
/// Borrowed from the session, so a step can never see another step's fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepFields<'a> {
    Smartwatch {
        selected: Option<&'static DeviceModel>,
        status: PairingStatus,
    },
    Demographics(&'a Demographics),
    HealthMetrics(&'a HealthMetrics),
    MenstrualData(&'a MenstrualData),
    Lifestyle(&'a Lifestyle),
    HealthGoals(&'a Goals),
    MedicalHistory(&'a MedicalHistory),
}

impl StepFields<'_> {
    pub fn step(&self) -> StepId {
        match self {
            StepFields::Smartwatch { .. } => StepId::Smartwatch,
            StepFields::Demographics(_) => StepId::Demographics,
            StepFields::HealthMetrics(_) => StepId::HealthMetrics,
            StepFields::MenstrualData(_) => StepId::MenstrualData,
            StepFields::Lifestyle(_) => StepId::Lifestyle,
            StepFields::HealthGoals(_) => StepId::HealthGoals,
            StepFields::MedicalHistory(_) => StepId::MedicalHistory,
        }
    }
}
