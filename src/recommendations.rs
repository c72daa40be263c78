//! Personalised lifestyle recommendations
//!
//! Simple rules over the lifestyle answers. Each rule fires independently and
//! results keep a fixed order: exercise, diet, sleep, stress.

use serde::{Deserialize, Serialize};

use crate::onboarding::{Diet, ExerciseFrequency, Lifestyle, SleepQuality, StressLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Exercise,
    Nutrition,
    Sleep,
    Stress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub message: String,
}

impl Recommendation {
    fn new(category: RecommendationCategory, message: &str) -> Self {
        Self {
            category,
            message: message.to_string(),
        }
    }
}

/// Recommendations for the given lifestyle answers
pub fn recommend(lifestyle: &Lifestyle) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if lifestyle.exercise() == Some(ExerciseFrequency::Moderate) {
        out.push(Recommendation::new(
            RecommendationCategory::Exercise,
            "Consider increasing your exercise frequency to 4-5 times per week",
        ));
    }
    if lifestyle.diet() == Some(Diet::Vegetarian) {
        out.push(Recommendation::new(
            RecommendationCategory::Nutrition,
            "Ensure adequate protein intake using varied plant-based sources",
        ));
    }
    if lifestyle.sleep() == Some(SleepQuality::Good) {
        out.push(Recommendation::new(
            RecommendationCategory::Sleep,
            "Maintain your excellent sleep routine",
        ));
    }
    if lifestyle.stress() == Some(StressLevel::Moderate) {
        out.push(Recommendation::new(
            RecommendationCategory::Stress,
            "Try daily meditation to help manage stress levels",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lifestyle(diet: &str, exercise: &str, sleep: &str, stress: &str) -> Lifestyle {
        Lifestyle {
            diet: Some(diet.to_string()),
            exercise_habits: Some(exercise.to_string()),
            sleep_quality: Some(sleep.to_string()),
            stress_level: Some(stress.to_string()),
        }
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let recs = recommend(&lifestyle("vegetarian", "moderate", "good", "moderate"));
        let categories: Vec<_> = recs.iter().map(|r| r.category).collect();

        assert_eq!(
            categories,
            vec![
                RecommendationCategory::Exercise,
                RecommendationCategory::Nutrition,
                RecommendationCategory::Sleep,
                RecommendationCategory::Stress,
            ]
        );
    }

    #[test]
    fn test_no_rules_fire() {
        assert!(recommend(&lifestyle("vegan", "active", "poor", "low")).is_empty());
        assert!(recommend(&Lifestyle::default()).is_empty());
    }

    #[test]
    fn test_single_rule() {
        let recs = recommend(&lifestyle("other", "sedentary", "fair", "moderate"));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, RecommendationCategory::Stress);
        assert!(recs[0].message.contains("meditation"));
    }
}
