//! Request field validation
//!
//! Each use case validates its whole input up front and reports every
//! failing field at once.

use kernel::error::app_error::FieldViolation;
use platform::password::{ClearTextPassword, PasswordPolicyError, check_strength};

use crate::error::AuthError;

/// Accumulates field violations
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the value or record its violation.
    pub fn check<T>(&mut self, result: Result<T, FieldViolation>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.0.push(violation);
                None
            }
        }
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_error(self) -> AuthError {
        AuthError::Validation(self.0)
    }
}

fn password_violation(err: &PasswordPolicyError) -> FieldViolation {
    FieldViolation::new("password", err.to_string())
}

/// Password chosen at registration: strength rules plus hashing bounds.
pub fn new_password(raw: String, violations: &mut Violations) -> Option<ClearTextPassword> {
    let weak = check_strength(&raw);
    let reported_too_long = weak
        .iter()
        .any(|e| matches!(e, PasswordPolicyError::TooLong { .. }));
    for err in &weak {
        violations.push(password_violation(err));
    }

    match ClearTextPassword::new(raw) {
        Ok(password) if weak.is_empty() => Some(password),
        Ok(_) => None,
        Err(PasswordPolicyError::TooLong { .. }) if reported_too_long => None,
        Err(err) => {
            violations.push(password_violation(&err));
            None
        }
    }
}

/// Password presented at login: only presence is checked.
pub fn presented_password(raw: &str, violations: &mut Violations) {
    if raw.is_empty() {
        violations.push(password_violation(&PasswordPolicyError::Empty));
    }
}
