//! Field checks shared by the customer, loan, due and settlement forms.
//!
//! Each check returns the normalized value on success so callers submit
//! exactly what was validated.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::errors::{FieldError, LendingError, Result};

type FieldResult<T> = std::result::Result<T, FieldError>;

/// non-empty after trimming
pub fn require(field: &'static str, value: &str) -> FieldResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// exactly 10 digits
pub fn validate_mobile(field: &'static str, value: &str) -> FieldResult<String> {
    let value = require(field, value)?;
    if value.len() != 10 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::new(field, "must be exactly 10 digits"));
    }
    Ok(value)
}

/// exactly 12 digits, spaces tolerated as group separators
pub fn validate_aadhaar(value: &str) -> FieldResult<String> {
    let digits: String = require("aadhaar", value)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::new("aadhaar", "must be exactly 12 digits"));
    }
    Ok(digits)
}

/// five letters, four digits, one letter; upper-cased
pub fn validate_pan(value: &str) -> FieldResult<String> {
    let pan = require("pan", value)?.to_ascii_uppercase();
    let bytes = pan.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[..5].iter().all(|b| b.is_ascii_uppercase())
        && bytes[5..9].iter().all(|b| b.is_ascii_digit())
        && bytes[9].is_ascii_uppercase();
    if !well_formed {
        return Err(FieldError::new("pan", "must look like ABCDE1234F"));
    }
    Ok(pan)
}

/// exactly 6 digits, first digit non-zero
pub fn validate_pincode(value: &str) -> FieldResult<String> {
    let pin = require("pincode", value)?;
    if pin.len() != 6 || !pin.chars().all(|c| c.is_ascii_digit()) || pin.starts_with('0') {
        return Err(FieldError::new("pincode", "must be a 6 digit pincode"));
    }
    Ok(pin)
}

/// alphanumeric registration number with spaces and hyphens stripped, e.g. TN09AB1234
pub fn validate_vehicle_number(value: &str) -> FieldResult<String> {
    let number: String = require("vehicle_number", value)?
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_ascii_uppercase();
    if number.len() < 4 || !number.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FieldError::new("vehicle_number", "is not a valid registration number"));
    }
    Ok(number)
}

/// decimal amount strictly greater than zero
pub fn parse_positive_amount(field: &'static str, value: &str) -> FieldResult<Money> {
    let value = require(field, value)?;
    let amount = Money::from_str_exact(&value)
        .map_err(|_| FieldError::new(field, "must be a number"))?;
    if !amount.is_positive() {
        return Err(FieldError::new(field, "must be greater than zero"));
    }
    Ok(amount)
}

/// decimal amount that may be zero, blank treated as zero
pub fn parse_optional_amount(field: &'static str, value: &str) -> FieldResult<Money> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Money::ZERO);
    }
    let amount = Money::from_str_exact(trimmed)
        .map_err(|_| FieldError::new(field, "must be a number"))?;
    if amount.is_negative() {
        return Err(FieldError::new(field, "cannot be negative"));
    }
    Ok(amount)
}

/// whole rupees strictly greater than zero
pub fn parse_positive_whole(field: &'static str, value: &str) -> FieldResult<Money> {
    let value = require(field, value)?;
    let n = u64::from_str(&value).map_err(|_| FieldError::new(field, "must be a whole number"))?;
    if n == 0 {
        return Err(FieldError::new(field, "must be greater than zero"));
    }
    Ok(Money::from_decimal(Decimal::from(n)))
}

/// annual percentage strictly greater than zero
pub fn parse_positive_rate(field: &'static str, value: &str) -> FieldResult<Rate> {
    let value = require(field, value)?;
    let pct = Decimal::from_str(&value).map_err(|_| FieldError::new(field, "must be a number"))?;
    if pct <= Decimal::ZERO {
        return Err(FieldError::new(field, "must be greater than zero"));
    }
    Ok(Rate::from_percentage_decimal(pct))
}

/// month count strictly greater than zero
pub fn parse_positive_months(field: &'static str, value: &str) -> FieldResult<u32> {
    let value = require(field, value)?;
    let months = u32::from_str(&value).map_err(|_| FieldError::new(field, "must be a whole number"))?;
    if months == 0 {
        return Err(FieldError::new(field, "must be greater than zero"));
    }
    Ok(months)
}

/// collects every field error of a form instead of stopping at the first
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// record the error, if any, and hand back the value
    pub fn check<T>(&mut self, result: FieldResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(LendingError::InvalidForm(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mobile_length() {
        assert_eq!(validate_mobile("mobile", "9876543210").unwrap(), "9876543210");
        assert!(validate_mobile("mobile", "987654321").is_err());
        assert!(validate_mobile("mobile", "98765432101").is_err());
        assert!(validate_mobile("mobile", "98765abc10").is_err());
        assert!(validate_mobile("mobile", "").is_err());
    }

    #[test]
    fn test_aadhaar() {
        assert_eq!(validate_aadhaar("1234 5678 9012").unwrap(), "123456789012");
        assert!(validate_aadhaar("12345678901").is_err());
        assert!(validate_aadhaar("1234567890123").is_err());
        assert!(validate_aadhaar("12345678901x").is_err());
    }

    #[test]
    fn test_pan_and_pincode() {
        assert_eq!(validate_pan("abcde1234f").unwrap(), "ABCDE1234F");
        assert!(validate_pan("ABCD12345F").is_err());
        assert_eq!(validate_pincode("600001").unwrap(), "600001");
        assert!(validate_pincode("060001").is_err());
        assert!(validate_pincode("60001").is_err());
    }

    #[test]
    fn test_vehicle_number() {
        assert_eq!(validate_vehicle_number("tn 09-ab 1234").unwrap(), "TN09AB1234");
        assert!(validate_vehicle_number("--").is_err());
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(parse_positive_amount("amount", " 250.5 ").unwrap(), Money::from_str_exact("250.50").unwrap());
        assert!(parse_positive_amount("amount", "0").is_err());
        assert!(parse_positive_amount("amount", "-10").is_err());
        assert!(parse_positive_amount("amount", "NaN").is_err());
        assert_eq!(parse_optional_amount("charge", "").unwrap(), Money::ZERO);
        assert!(parse_optional_amount("charge", "-1").is_err());
    }

    #[test]
    fn test_loan_term_parsing() {
        assert_eq!(parse_positive_rate("rate", "1.5").unwrap().as_decimal(), dec!(0.015));
        assert!(parse_positive_rate("rate", "0").is_err());
        assert_eq!(parse_positive_months("tenure", "12").unwrap(), 12);
        assert!(parse_positive_months("tenure", "12.5").is_err());
        assert!(parse_positive_whole("principal", "10000.50").is_err());
    }

    #[test]
    fn test_validator_collects_all() {
        let mut v = Validator::new();
        assert!(v.check(validate_mobile("mobile", "123")).is_none());
        assert!(v.check(validate_aadhaar("1")).is_none());
        assert_eq!(v.check(validate_pincode("600001")), Some("600001".to_string()));
        match v.finish() {
            Err(LendingError::InvalidForm(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected form error, got {other:?}"),
        }
    }
}
