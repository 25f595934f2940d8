use crate::conversation::error::WizardError;
use crate::conversation::texts;
use chrono::NaiveDate;

/// Strips whitespace and checks the ISO 6346 shape: 4 letters then 7 digits. Returns it uppercased.
pub fn normalize_container_number(raw: &str) -> Result<String, WizardError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = compact.as_bytes();

    let valid = bytes.len() == 11
        && bytes[..4].iter().all(u8::is_ascii_alphabetic)
        && bytes[4..].iter().all(u8::is_ascii_digit);

    if valid {
        Ok(compact.to_ascii_uppercase())
    } else {
        Err(WizardError::Validation(texts::INVALID_CONTAINER_NAME.to_string()))
    }
}

/// Free-text answers are trimmed and must not be blank.
pub fn required_text(raw: &str) -> Result<String, WizardError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WizardError::Validation(texts::EMPTY_VALUE.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, WizardError> {
    let trimmed = raw.trim();
    ["%Y-%m-%d", "%d.%m.%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| WizardError::Validation(texts::INVALID_DATE.to_string()))
}
