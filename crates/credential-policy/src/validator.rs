//! Password strength rules for new passwords.

use std::collections::HashSet;

use credential_core::config::PolicyConfig;
use credential_core::error::AppError;

/// Validates password strength and difference against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
    /// Maximum password length in characters.
    max_length: usize,
    /// Characters of a new password that must not occur in the current one.
    min_char_difference: usize,
}

impl PasswordValidator {
    /// Creates a new validator from policy configuration.
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            min_char_difference: config.min_char_difference,
        }
    }

    /// Validates a password against length, character class, and
    /// repetition rules.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or a policy violation describing the first failure found.
    pub fn validate_strength(&self, password: &str) -> Result<(), AppError> {
        let length = password.chars().count();
        if length < self.min_length || length > self.max_length {
            return Err(AppError::policy_violation(format!(
                "Password must be between {} and {} characters long",
                self.min_length, self.max_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::policy_violation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::policy_violation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::policy_violation(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(is_symbol) {
            return Err(AppError::policy_violation(
                "Password must contain at least one special character",
            ));
        }

        if has_consecutive_repeat(password) {
            return Err(AppError::policy_violation(
                "Password must not contain two identical consecutive characters",
            ));
        }

        Ok(())
    }

    /// Validates that enough characters of the new password are absent
    /// from the current one.
    pub fn validate_difference(
        &self,
        new_password: &str,
        current_password: &str,
    ) -> Result<(), AppError> {
        if count_new_characters(new_password, current_password, self.min_char_difference)
            < self.min_char_difference
        {
            return Err(AppError::policy_violation(format!(
                "Password must differ from the current password by at least {} characters",
                self.min_char_difference
            )));
        }
        Ok(())
    }
}

/// Symbols are characters that are neither alphanumeric nor whitespace.
fn is_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

fn has_consecutive_repeat(password: &str) -> bool {
    password
        .chars()
        .zip(password.chars().skip(1))
        .any(|(a, b)| a == b)
}

/// Counts, left to right, characters of `new_password` that occur nowhere
/// in `current_password`, stopping once `enough` is reached.
///
/// Repeated characters count once per occurrence. This is a character-set
/// difference, not an edit distance.
pub fn count_new_characters(new_password: &str, current_password: &str, enough: usize) -> usize {
    let current: HashSet<char> = current_password.chars().collect();
    let mut count = 0;
    for c in new_password.chars() {
        if count >= enough {
            break;
        }
        if !current.contains(&c) {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&PolicyConfig::default())
    }

    fn violation(result: Result<(), AppError>) -> String {
        let err = result.unwrap_err();
        assert!(err.is_policy_violation());
        err.message
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(validator().validate_strength("Gat3way#Pa5s").is_ok());
        assert!(validator().validate_strength("aB3$efgh").is_ok());
    }

    #[test]
    fn test_length_bounds() {
        let v = validator();
        assert!(violation(v.validate_strength("aB3$efg")).contains("between 8 and 32"));
        let long = format!("aB3${}", "xy".repeat(15));
        assert_eq!(long.chars().count(), 34);
        assert!(violation(v.validate_strength(&long)).contains("between 8 and 32"));
    }

    #[test]
    fn test_character_classes() {
        let v = validator();
        assert!(violation(v.validate_strength("ab3$efgh")).contains("uppercase"));
        assert!(violation(v.validate_strength("AB3$EFGH")).contains("lowercase"));
        assert!(violation(v.validate_strength("aBc$efgh")).contains("digit"));
        assert!(violation(v.validate_strength("aB3defgh")).contains("special"));
    }

    #[test]
    fn test_non_ascii_numerals_are_not_digits() {
        let v = validator();
        assert!(violation(v.validate_strength("Abcdefg½!")).contains("digit"));
        assert!(violation(v.validate_strength("AbcdefghⅫ!")).contains("digit"));
        assert!(violation(v.validate_strength("Abcdef٣gh!")).contains("digit"));
        assert!(v.validate_strength("Abcdef3gh!").is_ok());
    }

    #[test]
    fn test_whitespace_is_not_a_symbol() {
        assert!(violation(validator().validate_strength("aB3 efgh")).contains("special"));
    }

    #[test]
    fn test_consecutive_repeats_rejected() {
        let v = validator();
        assert!(violation(v.validate_strength("aB3$effgh")).contains("consecutive"));
        assert!(v.validate_strength("aB3$efgfh").is_ok());
    }

    #[test]
    fn test_difference_counts_characters_absent_from_current() {
        assert_eq!(count_new_characters("abcdef", "abc", 10), 3);
        assert_eq!(count_new_characters("xxxx", "abc", 10), 4);
        assert_eq!(count_new_characters("wxyz", "", 10), 4);
        assert_eq!(count_new_characters("wxyzuv", "", 4), 4);
    }

    #[test]
    fn test_difference_rule() {
        let v = validator();
        assert!(v.validate_difference("Gat3way#Pass", "Gat3way#Pa").is_err());
        assert!(v.validate_difference("Zulu9!Kilo", "Gat3way#Pass").is_ok());
        let msg = violation(v.validate_difference("Gat3way#Pasz", "Gat3way#Pass"));
        assert!(msg.contains("at least 4"));
    }
}
