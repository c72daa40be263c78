//! Typed user profile collected by the onboarding wizard
//!
//! Every answer is kept as the string the user entered. Typed views (cycle
//! input, lifestyle choices) are parsed on demand so that malformed answers
//! surface as errors at the point of use rather than at entry time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::steps::StepId;
use crate::error::{OnboardingError, ProjectionError};
use crate::types::CycleInput;

/// A named form field. Each field belongs to exactly one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Age,
    Location,
    Ethnicity,
    Bmi,
    BloodPressure,
    Cholesterol,
    Ldl,
    Hdl,
    CycleLength,
    LastPeriod,
    FlowIntensity,
    Diet,
    ExerciseHabits,
    SleepProblem,
    StressLevel,
    HealthGoals,
    ChronicConditions,
    Medication,
    Allergies,
}

/// Fields that must be non-empty before leaving the demographics step
pub const REQUIRED_FIELDS: [Field; 3] = [Field::Age, Field::Location, Field::Ethnicity];

impl Field {
    pub const ALL: [Field; 19] = [
        Field::Age,
        Field::Location,
        Field::Ethnicity,
        Field::Bmi,
        Field::BloodPressure,
        Field::Cholesterol,
        Field::Ldl,
        Field::Hdl,
        Field::CycleLength,
        Field::LastPeriod,
        Field::FlowIntensity,
        Field::Diet,
        Field::ExerciseHabits,
        Field::SleepProblem,
        Field::StressLevel,
        Field::HealthGoals,
        Field::ChronicConditions,
        Field::Medication,
        Field::Allergies,
    ];

    /// Form name of the field
    pub fn name(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Location => "location",
            Field::Ethnicity => "ethnicity",
            Field::Bmi => "bmi",
            Field::BloodPressure => "bloodPressure",
            Field::Cholesterol => "cholesterol",
            Field::Ldl => "ldl",
            Field::Hdl => "hdl",
            Field::CycleLength => "cycleLength",
            Field::LastPeriod => "lastPeriod",
            Field::FlowIntensity => "flowIntensity",
            Field::Diet => "diet",
            Field::ExerciseHabits => "exerciseHabits",
            Field::SleepProblem => "sleepProblem",
            Field::StressLevel => "stressLevel",
            Field::HealthGoals => "healthGoals",
            Field::ChronicConditions => "chronicConditions",
            Field::Medication => "medication",
            Field::Allergies => "allergies",
        }
    }

    /// Human label shown next to the input
    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Location => "Location",
            Field::Ethnicity => "Ethnicity",
            Field::Bmi => "BMI",
            Field::BloodPressure => "Blood Pressure (systolic/diastolic)",
            Field::Cholesterol => "Total Cholesterol (mg/dL)",
            Field::Ldl => "LDL (mg/dL)",
            Field::Hdl => "HDL (mg/dL)",
            Field::CycleLength => "Average Cycle Length (days)",
            Field::LastPeriod => "Last Period Date",
            Field::FlowIntensity => "Flow Intensity",
            Field::Diet => "Diet Preference",
            Field::ExerciseHabits => "Exercise Frequency",
            Field::SleepProblem => "Sleep Quality",
            Field::StressLevel => "Stress Level",
            Field::HealthGoals => "Primary Health Goals",
            Field::ChronicConditions => "Chronic Conditions (if any)",
            Field::Medication => "Current Medications",
            Field::Allergies => "Allergies",
        }
    }

    /// Step on which the field is collected
    pub fn step(self) -> StepId {
        match self {
            Field::Age | Field::Location | Field::Ethnicity => StepId::Demographics,
            Field::Bmi | Field::BloodPressure | Field::Cholesterol | Field::Ldl | Field::Hdl => {
                StepId::HealthMetrics
            }
            Field::CycleLength | Field::LastPeriod | Field::FlowIntensity => StepId::MenstrualData,
            Field::Diet | Field::ExerciseHabits | Field::SleepProblem | Field::StressLevel => {
                StepId::Lifestyle
            }
            Field::HealthGoals => StepId::HealthGoals,
            Field::ChronicConditions | Field::Medication | Field::Allergies => {
                StepId::MedicalHistory
            }
        }
    }

    pub fn is_required(self) -> bool {
        REQUIRED_FIELDS.contains(&self)
    }

    /// Fields collected on `step`, in form order
    pub fn for_step(step: StepId) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |f| f.step() == step)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = OnboardingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| OnboardingError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub age: Option<String>,
    pub location: Option<String>,
    pub ethnicity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub bmi: Option<String>,
    pub blood_pressure: Option<String>,
    pub cholesterol: Option<String>,
    pub ldl: Option<String>,
    pub hdl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenstrualData {
    pub cycle_length: Option<String>,
    pub last_period: Option<String>,
    pub flow_intensity: Option<String>,
}

impl MenstrualData {
    /// Cycle input for the projector, once both cycle answers are filled.
    ///
    /// Returns `Ok(None)` while either answer is blank; a filled but
    /// malformed answer is an error.
    pub fn cycle_input(&self) -> Result<Option<CycleInput>, ProjectionError> {
        match (non_empty(&self.last_period), non_empty(&self.cycle_length)) {
            (Some(last_period), Some(length)) => CycleInput::parse(last_period, length).map(Some),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    pub diet: Option<String>,
    pub exercise_habits: Option<String>,
    /// Collected under the form name `sleepProblem`
    #[serde(alias = "sleepProblem")]
    pub sleep_quality: Option<String>,
    pub stress_level: Option<String>,
}

impl Lifestyle {
    pub fn diet(&self) -> Option<Diet> {
        parse_choice(&self.diet)
    }

    pub fn exercise(&self) -> Option<ExerciseFrequency> {
        parse_choice(&self.exercise_habits)
    }

    pub fn sleep(&self) -> Option<SleepQuality> {
        parse_choice(&self.sleep_quality)
    }

    pub fn stress(&self) -> Option<StressLevel> {
        parse_choice(&self.stress_level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub health_goals: Option<String>,
}

impl Goals {
    pub fn primary(&self) -> Option<HealthGoal> {
        parse_choice(&self.health_goals)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    pub chronic_conditions: Option<String>,
    pub medication: Option<String>,
    pub allergies: Option<String>,
}

/// Everything the wizard collects, grouped by domain area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub demographics: Demographics,
    #[serde(default)]
    pub health_metrics: HealthMetrics,
    #[serde(default)]
    pub menstrual: MenstrualData,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub medical_history: MedicalHistory,
}

impl UserProfile {
    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Age => &self.demographics.age,
            Field::Location => &self.demographics.location,
            Field::Ethnicity => &self.demographics.ethnicity,
            Field::Bmi => &self.health_metrics.bmi,
            Field::BloodPressure => &self.health_metrics.blood_pressure,
            Field::Cholesterol => &self.health_metrics.cholesterol,
            Field::Ldl => &self.health_metrics.ldl,
            Field::Hdl => &self.health_metrics.hdl,
            Field::CycleLength => &self.menstrual.cycle_length,
            Field::LastPeriod => &self.menstrual.last_period,
            Field::FlowIntensity => &self.menstrual.flow_intensity,
            Field::Diet => &self.lifestyle.diet,
            Field::ExerciseHabits => &self.lifestyle.exercise_habits,
            Field::SleepProblem => &self.lifestyle.sleep_quality,
            Field::StressLevel => &self.lifestyle.stress_level,
            Field::HealthGoals => &self.goals.health_goals,
            Field::ChronicConditions => &self.medical_history.chronic_conditions,
            Field::Medication => &self.medical_history.medication,
            Field::Allergies => &self.medical_history.allergies,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Age => &mut self.demographics.age,
            Field::Location => &mut self.demographics.location,
            Field::Ethnicity => &mut self.demographics.ethnicity,
            Field::Bmi => &mut self.health_metrics.bmi,
            Field::BloodPressure => &mut self.health_metrics.blood_pressure,
            Field::Cholesterol => &mut self.health_metrics.cholesterol,
            Field::Ldl => &mut self.health_metrics.ldl,
            Field::Hdl => &mut self.health_metrics.hdl,
            Field::CycleLength => &mut self.menstrual.cycle_length,
            Field::LastPeriod => &mut self.menstrual.last_period,
            Field::FlowIntensity => &mut self.menstrual.flow_intensity,
            Field::Diet => &mut self.lifestyle.diet,
            Field::ExerciseHabits => &mut self.lifestyle.exercise_habits,
            Field::SleepProblem => &mut self.lifestyle.sleep_quality,
            Field::StressLevel => &mut self.lifestyle.stress_level,
            Field::HealthGoals => &mut self.goals.health_goals,
            Field::ChronicConditions => &mut self.medical_history.chronic_conditions,
            Field::Medication => &mut self.medical_history.medication,
            Field::Allergies => &mut self.medical_history.allergies,
        }
    }

    /// Current answer for a field, if one was entered
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Store an answer verbatim; no validation at entry time
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Whether the answer is missing or the empty string
    pub fn is_blank(&self, field: Field) -> bool {
        self.get(field).map_or(true, str::is_empty)
    }
}

fn non_empty(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().filter(|s| !s.trim().is_empty())
}

fn parse_choice<T: FromStr>(slot: &Option<String>) -> Option<T> {
    non_empty(slot).and_then(|s| s.parse().ok())
}

/// Error for a value outside a closed answer vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not a valid {kind}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

/// Select-field vocabulary shared by all choice enums
pub trait Choice: Sized + Copy + 'static {
    const KIND: &'static str;
    const ALL: &'static [Self];

    /// Stored form value
    fn value(self) -> &'static str;

    /// Label shown in the select list
    fn label(self) -> &'static str;

    fn parse_value(s: &str) -> Result<Self, UnknownChoice> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.value() == s)
            .ok_or_else(|| UnknownChoice {
                kind: Self::KIND,
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ethnicity {
    Asian,
    Black,
    Hispanic,
    White,
    Other,
}

impl Choice for Ethnicity {
    const KIND: &'static str = "ethnicity";
    const ALL: &'static [Self] = &[
        Ethnicity::Asian,
        Ethnicity::Black,
        Ethnicity::Hispanic,
        Ethnicity::White,
        Ethnicity::Other,
    ];

    fn value(self) -> &'static str {
        match self {
            Ethnicity::Asian => "asian",
            Ethnicity::Black => "black",
            Ethnicity::Hispanic => "hispanic",
            Ethnicity::White => "white",
            Ethnicity::Other => "other",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Ethnicity::Asian => "Asian",
            Ethnicity::Black => "Black",
            Ethnicity::Hispanic => "Hispanic",
            Ethnicity::White => "White",
            Ethnicity::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowIntensity {
    Light,
    Medium,
    Heavy,
}

impl Choice for FlowIntensity {
    const KIND: &'static str = "flow intensity";
    const ALL: &'static [Self] = &[FlowIntensity::Light, FlowIntensity::Medium, FlowIntensity::Heavy];

    fn value(self) -> &'static str {
        match self {
            FlowIntensity::Light => "light",
            FlowIntensity::Medium => "medium",
            FlowIntensity::Heavy => "heavy",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FlowIntensity::Light => "Light",
            FlowIntensity::Medium => "Medium",
            FlowIntensity::Heavy => "Heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diet {
    Vegetarian,
    Vegan,
    NonVegetarian,
    Other,
}

impl Choice for Diet {
    const KIND: &'static str = "diet";
    const ALL: &'static [Self] = &[Diet::Vegetarian, Diet::Vegan, Diet::NonVegetarian, Diet::Other];

    fn value(self) -> &'static str {
        match self {
            Diet::Vegetarian => "vegetarian",
            Diet::Vegan => "vegan",
            Diet::NonVegetarian => "nonVegetarian",
            Diet::Other => "other",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Diet::Vegetarian => "Vegetarian",
            Diet::Vegan => "Vegan",
            Diet::NonVegetarian => "Non-Vegetarian",
            Diet::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseFrequency {
    Sedentary,
    Light,
    Moderate,
    Active,
}

impl Choice for ExerciseFrequency {
    const KIND: &'static str = "exercise frequency";
    const ALL: &'static [Self] = &[
        ExerciseFrequency::Sedentary,
        ExerciseFrequency::Light,
        ExerciseFrequency::Moderate,
        ExerciseFrequency::Active,
    ];

    fn value(self) -> &'static str {
        match self {
            ExerciseFrequency::Sedentary => "sedentary",
            ExerciseFrequency::Light => "light",
            ExerciseFrequency::Moderate => "moderate",
            ExerciseFrequency::Active => "active",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ExerciseFrequency::Sedentary => "Sedentary",
            ExerciseFrequency::Light => "1-2 times/week",
            ExerciseFrequency::Moderate => "3-4 times/week",
            ExerciseFrequency::Active => "5+ times/week",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Choice for SleepQuality {
    const KIND: &'static str = "sleep quality";
    const ALL: &'static [Self] = &[
        SleepQuality::Excellent,
        SleepQuality::Good,
        SleepQuality::Fair,
        SleepQuality::Poor,
    ];

    fn value(self) -> &'static str {
        match self {
            SleepQuality::Excellent => "excellent",
            SleepQuality::Good => "good",
            SleepQuality::Fair => "fair",
            SleepQuality::Poor => "poor",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SleepQuality::Excellent => "Excellent",
            SleepQuality::Good => "Good",
            SleepQuality::Fair => "Fair",
            SleepQuality::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl Choice for StressLevel {
    const KIND: &'static str = "stress level";
    const ALL: &'static [Self] = &[
        StressLevel::Low,
        StressLevel::Moderate,
        StressLevel::High,
        StressLevel::Severe,
    ];

    fn value(self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
            StressLevel::Severe => "severe",
        }
    }

    fn label(self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Moderate => "Moderate",
            StressLevel::High => "High",
            StressLevel::Severe => "Severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthGoal {
    WeightManagement,
    PeriodRegularity,
    StressReduction,
    SleepImprovement,
    Fertility,
    OverallHealth,
}

impl Choice for HealthGoal {
    const KIND: &'static str = "health goal";
    const ALL: &'static [Self] = &[
        HealthGoal::WeightManagement,
        HealthGoal::PeriodRegularity,
        HealthGoal::StressReduction,
        HealthGoal::SleepImprovement,
        HealthGoal::Fertility,
        HealthGoal::OverallHealth,
    ];

    fn value(self) -> &'static str {
        match self {
            HealthGoal::WeightManagement => "weightManagement",
            HealthGoal::PeriodRegularity => "periodRegularity",
            HealthGoal::StressReduction => "stressReduction",
            HealthGoal::SleepImprovement => "sleepImprovement",
            HealthGoal::Fertility => "fertility",
            HealthGoal::OverallHealth => "overallHealth",
        }
    }

    fn label(self) -> &'static str {
        match self {
            HealthGoal::WeightManagement => "Weight Management",
            HealthGoal::PeriodRegularity => "Period Regularity",
            HealthGoal::StressReduction => "Stress Reduction",
            HealthGoal::SleepImprovement => "Better Sleep",
            HealthGoal::Fertility => "Fertility Planning",
            HealthGoal::OverallHealth => "Overall Health",
        }
    }
}

impl FromStr for Ethnicity {
    type Err = UnknownChoice;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_value(s)
    }
}

impl FromStr for FlowIntensity {
    type Err = UnknownChoice;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_value(s)
    }
}

impl FromStr for Diet {
    type Err = UnknownChoice;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_value(s)
    }
}

impl FromStr for ExerciseFrequency {
    type Err = UnknownChoice;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_value(s)
    }
}

impl FromStr for SleepQuality {
    type Err = UnknownChoice;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_value(s)
    }
}

impl FromStr for StressLevel {
    type Err = UnknownChoice;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_value(s)
    }
}

impl FromStr for HealthGoal {
    type Err = UnknownChoice;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_value(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_names_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
        assert!(matches!(
            "favouriteColour".parse::<Field>(),
            Err(OnboardingError::UnknownField(_))
        ));
    }

    #[test]
    fn test_every_field_has_a_form_step() {
        let steps_with_fields: Vec<StepId> = crate::onboarding::STEP_ORDER
            .into_iter()
            .filter(|s| Field::for_step(*s).next().is_some())
            .collect();

        assert_eq!(steps_with_fields.len(), 6);
        assert!(!steps_with_fields.contains(&StepId::Smartwatch));
        assert_eq!(
            Field::for_step(StepId::Demographics).collect::<Vec<_>>(),
            REQUIRED_FIELDS.to_vec()
        );
    }

    #[test]
    fn test_set_and_get_route_to_typed_slots() {
        let mut profile = UserProfile::default();
        profile.set(Field::SleepProblem, "good");
        profile.set(Field::Ldl, "100");

        assert_eq!(profile.lifestyle.sleep_quality.as_deref(), Some("good"));
        assert_eq!(profile.health_metrics.ldl.as_deref(), Some("100"));
        assert_eq!(profile.get(Field::Ldl), Some("100"));
        assert!(profile.is_blank(Field::Age));

        profile.set(Field::Age, "");
        assert!(profile.is_blank(Field::Age));
    }

    #[test]
    fn test_cycle_input_requires_both_answers() {
        let mut menstrual = MenstrualData::default();
        assert_eq!(menstrual.cycle_input().unwrap(), None);

        menstrual.cycle_length = Some("28".to_string());
        assert_eq!(menstrual.cycle_input().unwrap(), None);

        menstrual.last_period = Some("2025-02-01".to_string());
        let input = menstrual.cycle_input().unwrap().unwrap();
        assert_eq!(input.cycle_length_days, 28);

        menstrual.cycle_length = Some("0".to_string());
        assert!(menstrual.cycle_input().is_err());
    }

    #[test]
    fn test_lifestyle_choices_parse() {
        let lifestyle = Lifestyle {
            diet: Some("nonVegetarian".to_string()),
            exercise_habits: Some("moderate".to_string()),
            sleep_quality: Some("restless".to_string()),
            stress_level: None,
        };

        assert_eq!(lifestyle.diet(), Some(Diet::NonVegetarian));
        assert_eq!(lifestyle.exercise(), Some(ExerciseFrequency::Moderate));
        assert_eq!(lifestyle.sleep(), None);
        assert_eq!(lifestyle.stress(), None);
    }

    #[test]
    fn test_choice_vocabularies() {
        assert_eq!(Ethnicity::ALL.len(), 5);
        assert_eq!(HealthGoal::ALL.len(), 6);
        assert_eq!("heavy".parse::<FlowIntensity>().unwrap(), FlowIntensity::Heavy);
        let err = "purple".parse::<FlowIntensity>().unwrap_err();
        assert_eq!(err.to_string(), "\"purple\" is not a valid flow intensity");
    }

    #[test]
    fn test_profile_json_uses_form_names() {
        let json = r#"{
            "demographics": { "age": "28", "location": "Oslo", "ethnicity": "white" },
            "menstrual": { "cycleLength": "28", "lastPeriod": "2025-02-01" },
            "lifestyle": { "sleepProblem": "good" }
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.get(Field::CycleLength), Some("28"));
        assert_eq!(profile.get(Field::SleepProblem), Some("good"));
        assert_eq!(profile.goals, Goals::default());
    }
}
