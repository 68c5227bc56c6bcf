//! # Validation Module
//!
//! Input validation for the login, register and history forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser                                                      │
//! │  └── input types (date, number), required attributes                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler                                                 │
//! │  ├── Form/Query deserialization                                        │
//! │  └── THIS MODULE: field rules                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / CHECK constraints                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_TEXT_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Date formats accepted in filters and imports, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

// =============================================================================
// String Validators
// =============================================================================

/// Normalizes a login name: trimmed and lowercased.
///
/// ## Example
/// ```rust
/// use barber_core::validation::normalize_username;
///
/// assert_eq!(normalize_username("  Mairon "), "mairon");
/// ```
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validates the client name and returns it trimmed.
///
/// An empty client is allowed; walk-ins are often not named.
pub fn validate_client_name(raw: &str) -> ValidationResult<String> {
    let name = raw.trim();
    check_length("cliente", name)?;
    Ok(name.to_string())
}

/// Validates a product name. Blank means no product was sold.
///
/// ## Example
/// ```rust
/// use barber_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  ").unwrap(), None);
/// assert_eq!(validate_product_name(" Xampu ").unwrap().as_deref(), Some("Xampu"));
/// ```
pub fn validate_product_name(raw: &str) -> ValidationResult<Option<String>> {
    let name = raw.trim();
    if name.is_empty() {
        return Ok(None);
    }
    check_length("produto_nome", name)?;
    Ok(Some(name.to_string()))
}

fn check_length(field: &str, value: &str) -> ValidationResult<()> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects negative amounts and amounts above [`MAX_AMOUNT_CENTS`].
///
/// Zero is fine (service not performed). The cap keeps day and month sums
/// far from the `i64` range SQLite can add up.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<Money> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: Money::from_cents(MAX_AMOUNT_CENTS),
        });
    }
    Ok(amount)
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a calendar date in ISO (`2026-10-14`) or Brazilian (`14/10/2026`)
/// form.
///
/// ## Example
/// ```rust
/// use barber_core::validation::parse_date;
///
/// let iso = parse_date("inicio", "2026-10-14").unwrap();
/// let br = parse_date("inicio", "14/10/2026").unwrap();
/// assert_eq!(iso, br);
/// assert!(parse_date("inicio", "14-10-2026").is_err());
/// ```
pub fn parse_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD or DD/MM/YYYY".to_string(),
        })
}

// =============================================================================
// ID Validators
// =============================================================================

/// Validates a sale id (UUID).
pub fn validate_sale_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_client_name() {
        assert_eq!(validate_client_name("  Ana ").unwrap(), "Ana");
        assert_eq!(validate_client_name("").unwrap(), "");
        assert!(validate_client_name(&"x".repeat(MAX_TEXT_LEN + 1)).is_err());
        // Length counts characters, not bytes
        assert!(validate_client_name(&"ç".repeat(MAX_TEXT_LEN)).is_ok());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("cabelo", Money::zero()).is_ok());
        assert!(validate_amount("cabelo", Money::from_cents(3500)).is_ok());
        assert_eq!(
            validate_amount("desconto", Money::from_cents(-1)),
            Err(ValidationError::MustBeNonNegative {
                field: "desconto".to_string()
            })
        );
    }

    #[test]
    fn test_validate_amount_cap() {
        let cap = Money::from_cents(MAX_AMOUNT_CENTS);
        assert_eq!(validate_amount("cabelo", cap), Ok(cap));
        assert_eq!(
            validate_amount("cabelo", Money::from_cents(MAX_AMOUNT_CENTS + 1)),
            Err(ValidationError::TooLarge {
                field: "cabelo".to_string(),
                max: cap,
            })
        );
        assert!(validate_amount("barba", Money::from_cents(i64::MAX)).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(parse_date("fim", "2026-03-07").unwrap(), expected);
        assert_eq!(parse_date("fim", " 07/03/2026 ").unwrap(), expected);
        assert!(parse_date("fim", "2026-02-30").is_err());
        assert!(parse_date("fim", "ontem").is_err());
    }

    #[test]
    fn test_validate_sale_id() {
        assert!(validate_sale_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_sale_id("").is_err());
        assert!(validate_sale_id("123").is_err());
    }
}
