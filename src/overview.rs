//! Health overview
//!
//! This module provides the stateless dashboard feed: a profile goes in,
//! its cycle projection and recommendations come out as one record.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::onboarding::UserProfile;
use crate::projector::CycleProjector;
use crate::recommendations::{recommend, Recommendation};
use crate::types::{parse_calendar_date, CycleProjection};
use crate::{CYCLESENSE_VERSION, PRODUCER_NAME};

/// Producer metadata stamped on every overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Dashboard view of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthOverview {
    pub producer: Producer,
    pub computed_at_utc: String,
    pub as_of: NaiveDate,
    /// Present once cycle length and last period are both answered
    pub cycle: Option<CycleProjection>,
    pub recommendations: Vec<Recommendation>,
}

/// Build the overview of `profile` as seen on `as_of`.
///
/// Malformed cycle answers are reported, never replaced by defaults.
pub fn health_overview(profile: &UserProfile, as_of: NaiveDate) -> Result<HealthOverview, Error> {
    let cycle = match profile.menstrual.cycle_input()? {
        Some(input) => Some(CycleProjector::project(&input, as_of)?),
        None => None,
    };

    Ok(HealthOverview {
        producer: Producer {
            name: PRODUCER_NAME.to_string(),
            version: CYCLESENSE_VERSION.to_string(),
            instance_id: Uuid::new_v4().to_string(),
        },
        computed_at_utc: Utc::now().to_rfc3339(),
        as_of,
        cycle,
        recommendations: recommend(&profile.lifestyle),
    })
}

/// Convert a profile JSON document into overview JSON.
///
/// # Arguments
/// * `profile_json` - `UserProfile` as camelCase JSON
/// * `as_of` - Reference date (`YYYY-MM-DD` or RFC 3339)
///
/// # Example
/// ```ignore
/// let overview = overview_to_json(profile_json, "2025-02-10".to_string())?;
/// ```
pub fn overview_to_json(profile_json: String, as_of: String) -> Result<String, Error> {
    let profile: UserProfile = serde_json::from_str(&profile_json)?;
    let as_of = parse_calendar_date(&as_of)?;
    let overview = health_overview(&profile, as_of)?;
    Ok(serde_json::to_string(&overview)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectionError;

    fn sample_profile_json() -> &'static str {
        r#"{
            "demographics": { "age": "28", "location": "Austin", "ethnicity": "asian" },
            "healthMetrics": { "bmi": "22.5", "bloodPressure": "120/80", "cholesterol": "180" },
            "menstrual": { "cycleLength": "28", "lastPeriod": "2025-02-01" },
            "lifestyle": {
                "diet": "vegetarian",
                "exerciseHabits": "moderate",
                "sleepProblem": "good",
                "stressLevel": "moderate"
            }
        }"#
    }

    #[test]
    fn test_overview_to_json() {
        let json = overview_to_json(sample_profile_json().to_string(), "2025-02-01".to_string())
            .unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(payload["producer"]["name"], "cyclesense");
        assert_eq!(payload["cycle"]["next_period_start"], "2025-03-01");
        assert_eq!(payload["cycle"]["fertile_window_start"], "2025-02-15");
        assert_eq!(payload["cycle"]["cycle_progress_percent"], 100.0);
        assert_eq!(payload["recommendations"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_overview_without_cycle_answers() {
        let overview = health_overview(&UserProfile::default(), NaiveDate::MIN).unwrap();

        assert!(overview.cycle.is_none());
        assert!(overview.recommendations.is_empty());
    }

    #[test]
    fn test_malformed_cycle_answer_is_an_error() {
        let mut profile = UserProfile::default();
        profile.menstrual.cycle_length = Some("-5".to_string());
        profile.menstrual.last_period = Some("2025-02-01".to_string());

        let err = health_overview(&profile, NaiveDate::MIN).unwrap_err();
        assert!(matches!(
            err,
            Error::Projection(ProjectionError::InvalidCycleLength(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let result = overview_to_json("not json".to_string(), "2025-02-01".to_string());
        assert!(matches!(result, Err(Error::JsonError(_))));
    }

    #[test]
    fn test_invalid_as_of() {
        let result = overview_to_json("{}".to_string(), "yesterday".to_string());
        assert!(matches!(
            result,
            Err(Error::Projection(ProjectionError::InvalidDate(_)))
        ));
    }
}
