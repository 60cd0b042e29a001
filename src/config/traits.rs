use crate::error::PatternEvoError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), PatternEvoError>;
}

/// Validate a section, naming it in any configuration error
pub fn validate_section<S: ConfigSection>(section: &S) -> Result<(), PatternEvoError> {
    section.validate().map_err(|err| match err {
        PatternEvoError::Configuration(message) => {
            PatternEvoError::Configuration(format!("[{}] {}", S::section_name(), message))
        }
        other => other,
    })
}

/// Shared check for probability-like fields
pub(crate) fn check_unit_range(name: &str, value: f64) -> Result<(), PatternEvoError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PatternEvoError::Configuration(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}
