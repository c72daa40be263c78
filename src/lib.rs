//! CycleSense - cycle projection and onboarding core for a health tracker
//!
//! CycleSense holds the parts of the health-tracker front-end that carry real
//! semantics, independent of any rendering layer:
//!
//! ## Modules
//!
//! - **Cycle projection**: next period, fertile window and cycle progress from
//!   the last period date and cycle length
//! - **Onboarding**: the seven-step intake wizard with device pairing,
//!   required-field gating and asynchronous submission
//! - **Overview**: the dashboard feed combining projection and recommendations

pub mod error;
pub mod onboarding;
pub mod overview;
pub mod projector;
pub mod recommendations;
pub mod types;

// FFI bindings for C interop, on by default for cdylib/staticlib builds
#[cfg(feature = "ffi")]
pub mod ffi;

pub use error::{Error, OnboardingError, ProjectionError};
pub use onboarding::{OnboardingSession, UserProfile};
pub use overview::{health_overview, overview_to_json, HealthOverview};
pub use projector::CycleProjector;
pub use types::{CycleInput, CycleProjection, DayKind};

/// CycleSense version embedded in every overview
pub const CYCLESENSE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for overview payloads
pub const PRODUCER_NAME: &str = "cyclesense";
