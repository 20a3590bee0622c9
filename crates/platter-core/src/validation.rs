//! # Validation Module
//!
//! Client-side input validation for Platter.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end form                                                │
//! │  └── Immediate field feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store action (THIS MODULE)                                    │
//! │  └── Rejects bad input before a request is ever sent                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                       │
//! │  └── Authoritative checks, reported as success=false                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use platter_core::validation::{validate_email, validate_password};
//!
//! assert!(validate_email("asha@example.com").is_ok());
//! assert!(validate_password("secret").is_ok());
//! assert!(validate_password("abc").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{DeliveryDetails, LoginInput, MenuItem, ProfileUpdate, SignupInput};
use crate::{CONTACT_DIGITS, MIN_PASSWORD_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a field is not blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Not empty, no whitespace
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format("email", "must not contain spaces"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::invalid_format("email", "missing @"));
    };

    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');

    if local.is_empty() || !domain_ok {
        return Err(ValidationError::invalid_format("email", "not a valid address"));
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - At least [`MIN_PASSWORD_LENGTH`] characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validates a contact number: exactly [`CONTACT_DIGITS`] ASCII digits.
pub fn validate_contact(contact: &str) -> ValidationResult<()> {
    let contact = contact.trim();
    validate_required("contact", contact)?;

    if !contact.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format("contact", "must contain only digits"));
    }
    if contact.len() < CONTACT_DIGITS {
        return Err(ValidationError::TooShort {
            field: "contact".to_string(),
            min: CONTACT_DIGITS,
        });
    }
    if contact.len() > CONTACT_DIGITS {
        return Err(ValidationError::TooLong {
            field: "contact".to_string(),
            max: CONTACT_DIGITS,
        });
    }
    Ok(())
}

/// Validates an email verification code.
pub fn validate_verification_code(code: &str) -> ValidationResult<()> {
    validate_required("verificationCode", code)
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates a signup form.
pub fn validate_signup(input: &SignupInput) -> ValidationResult<()> {
    validate_required("fullname", &input.fullname)?;
    validate_email(&input.email)?;
    validate_password(&input.password)?;
    validate_contact(&input.contact)
}

/// Validates a login form.
pub fn validate_login(input: &LoginInput) -> ValidationResult<()> {
    validate_email(&input.email)?;
    validate_password(&input.password)
}

/// Validates a profile update.
pub fn validate_profile_update(update: &ProfileUpdate) -> ValidationResult<()> {
    validate_required("fullname", &update.fullname)?;
    validate_email(&update.email)?;
    validate_required("address", &update.address)?;
    validate_required("city", &update.city)?;
    validate_required("country", &update.country)
}

/// Validates delivery details before checkout.
pub fn validate_delivery_details(details: &DeliveryDetails) -> ValidationResult<()> {
    validate_required("name", &details.name)?;
    validate_email(&details.email)?;
    validate_required("contact", &details.contact)?;
    validate_required("address", &details.address)?;
    validate_required("city", &details.city)
}

/// Validates a menu item before it is put in a cart.
///
/// ## Rules
/// - ID and name required
/// - Price can not be negative
pub fn validate_menu_item(item: &MenuItem) -> ValidationResult<()> {
    validate_required("_id", &item.id)?;
    validate_required("name", &item.name)?;
    if item.price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn signup() -> SignupInput {
        SignupInput {
            fullname: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            password: "hunter22".to_string(),
            contact: "9876543210".to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("asha@example.com").is_ok());
        assert!(validate_email(" asha@example.com ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("asha").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("asha@example").is_err());
        assert!(validate_email("asha@.com").is_err());
        assert!(validate_email("as ha@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(
            validate_password("abc"),
            Err(ValidationError::TooShort {
                field: "password".to_string(),
                min: MIN_PASSWORD_LENGTH,
            })
        );
        assert_eq!(validate_password(""), Err(ValidationError::required("password")));
    }

    #[test]
    fn test_validate_contact() {
        assert!(validate_contact("9876543210").is_ok());
        assert!(validate_contact("98765").is_err());
        assert!(validate_contact("98765432101").is_err());
        assert!(validate_contact("98765-4321").is_err());
    }

    #[test]
    fn test_validate_signup() {
        assert!(validate_signup(&signup()).is_ok());

        let mut input = signup();
        input.fullname = "  ".to_string();
        assert_eq!(validate_signup(&input), Err(ValidationError::required("fullname")));
    }

    #[test]
    fn test_validate_login() {
        let input = LoginInput {
            email: "asha@example.com".to_string(),
            password: "pw".to_string(),
        };
        assert!(matches!(
            validate_login(&input),
            Err(ValidationError::TooShort { .. })
        ));
    }

    #[test]
    fn test_validate_menu_item() {
        let ok = MenuItem::new("m1", "Dosa", Money::from_units(80)).with_description("Crisp");
        assert!(validate_menu_item(&ok).is_ok());

        let unnamed = MenuItem::new("m1", " ", Money::from_units(80));
        assert_eq!(validate_menu_item(&unnamed), Err(ValidationError::required("name")));

        let negative = MenuItem::new("m1", "Dosa", Money::from_units(-1));
        assert_eq!(
            validate_menu_item(&negative),
            Err(ValidationError::Negative {
                field: "price".to_string()
            })
        );
    }
}
