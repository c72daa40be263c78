//! Required-field validation

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::profile::{Field, UserProfile, REQUIRED_FIELDS};

/// Per-field validation messages, keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.errors.remove(&field)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Collect a message for every required field that is missing or empty
    pub fn check_required(profile: &UserProfile) -> Self {
        let mut errors = Self::new();
        for field in REQUIRED_FIELDS {
            if profile.is_blank(field) {
                errors.insert(field, format!("{} is required", field.label()));
            }
        }
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.errors.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_fails_all_required() {
        let errors = ValidationErrors::check_required(&UserProfile::default());

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(Field::Age), Some("Age is required"));
        assert_eq!(errors.get(Field::Location), Some("Location is required"));
        assert_eq!(errors.get(Field::Ethnicity), Some("Ethnicity is required"));
    }

    #[test]
    fn test_whitespace_counts_as_filled() {
        let mut profile = UserProfile::default();
        profile.set(Field::Age, " ");
        profile.set(Field::Location, "Lagos");

        let errors = ValidationErrors::check_required(&profile);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::Ethnicity));
    }

    #[test]
    fn test_display_and_json() {
        let mut errors = ValidationErrors::new();
        errors.insert(Field::Location, "Location is required");
        errors.insert(Field::Age, "Age is required");

        assert_eq!(
            errors.to_string(),
            "age: Age is required; location: Location is required"
        );
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["age"], "Age is required");
    }
}
