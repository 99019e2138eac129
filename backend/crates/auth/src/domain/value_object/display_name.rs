//! Display Name Value Object

use kernel::error::app_error::FieldViolation;
use serde::Serialize;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 120;

pub const INVALID_NAME: &str = "Name must be between 2 and 120 characters.";

/// Trimmed account display name, 2 to 120 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FieldViolation> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();

        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length)
            || trimmed.chars().any(char::is_control)
        {
            return Err(FieldViolation::new("name", INVALID_NAME));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
