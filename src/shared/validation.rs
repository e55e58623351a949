use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for validating phone-like contact numbers
    /// 10-15 characters of digits, `+`, `-`, parentheses and spaces
    /// - Valid: "6471234567", "(647) 123-4567", "+91 98765 43210"
    /// - Invalid: "12345", "647-abc-4567", "" (empty)
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9+\-() ]{10,15}$").unwrap();
}

/// Fewest digits a contact number may carry once punctuation is ignored
const MIN_PHONE_DIGITS: usize = 10;

/// Checks a phone-like value the way it will be stored, i.e. trimmed
///
/// The regex alone admits strings made only of spaces or punctuation,
/// so the digit count is checked as well.
pub fn validate_phone_number(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if PHONE_REGEX.is_match(trimmed) && digits >= MIN_PHONE_DIGITS {
        return Ok(());
    }
    let mut error = ValidationError::new("phone");
    error.message = Some("must be a phone number of 10-15 digits, spaces, '+', '-' or parentheses".into());
    Err(error)
}

/// Rejects strings that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}
