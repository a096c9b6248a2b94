//! Form validation errors

use thiserror::Error;

/// Problems found while validating user-entered data
///
/// All problems are collected and reported together; nothing is committed
/// while any remain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("Please fix the following:\n\n- {}", .0.join("\n- "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(msg: impl Into<String>) -> Self {
        Self(vec![msg.into()])
    }

    pub fn push(&mut self, msg: impl Into<String>) {
        self.0.push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Check a non-negative finite number, recording `"<field> must be a number ≥ 0."`
pub(crate) fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: f64) -> bool {
    if value.is_finite() && value >= 0.0 {
        true
    } else {
        errors.push(format!("{} must be a number ≥ 0.", field));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lists_every_problem() {
        let mut errors = ValidationErrors::new();
        errors.push("Name is required.");
        errors.push("fat must be a number ≥ 0.");
        assert_eq!(
            errors.to_string(),
            "Please fix the following:\n\n- Name is required.\n- fat must be a number ≥ 0."
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        assert!(ValidationErrors::single("x").into_result().is_err());
    }

    #[test]
    fn test_check_non_negative() {
        let mut errors = ValidationErrors::new();
        assert!(check_non_negative(&mut errors, "salt", 0.0));
        assert!(!check_non_negative(&mut errors, "salt", -0.1));
        assert!(!check_non_negative(&mut errors, "fiber", f64::INFINITY));
        assert_eq!(errors.messages().len(), 2);
    }
}
