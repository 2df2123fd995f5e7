//! PIN format validation.
//!
//! The vault accepts any non-empty PIN; this is the rule front-ends apply
//! before handing one over.

use crate::error::{AuraError, Result};

/// Minimum PIN length in digits.
const MIN_PIN_LENGTH: usize = 4;

/// Maximum PIN length in digits.
const MAX_PIN_LENGTH: usize = 8;

/// Validate that a PIN is 4 to 8 ASCII digits.
///
/// # Examples
///
/// ```
/// use aura_core::crypto::validate_pin;
///
/// assert!(validate_pin("1234").is_ok());
/// assert!(validate_pin("12a4").is_err());
/// ```
pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.is_empty() {
        return Err(AuraError::InvalidInput("PIN cannot be empty".to_string()));
    }

    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuraError::InvalidInput(
            "PIN must contain digits only".to_string(),
        ));
    }

    if pin.len() < MIN_PIN_LENGTH || pin.len() > MAX_PIN_LENGTH {
        return Err(AuraError::InvalidInput(format!(
            "PIN must be {}-{} digits (got {})",
            MIN_PIN_LENGTH,
            MAX_PIN_LENGTH,
            pin.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pins() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("000000").is_ok());
        assert!(validate_pin("12345678").is_ok());
    }

    #[test]
    fn test_pin_too_short() {
        let result = validate_pin("123");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("4-8 digits"));
    }

    #[test]
    fn test_pin_too_long() {
        assert!(validate_pin("123456789").is_err());
    }

    #[test]
    fn test_pin_non_digits() {
        assert!(validate_pin("12a4").is_err());
        assert!(validate_pin(" 1234").is_err());
        assert!(validate_pin("١٢٣٤").is_err());
    }

    #[test]
    fn test_pin_empty() {
        assert!(validate_pin("").is_err());
    }
}
