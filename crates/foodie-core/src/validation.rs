//! # Validation Module
//!
//! Input validation for the storefront's forms and catalog data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen (TypeScript)                                          │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Account / catalog services (Rust)                            │
//! │  └── THIS MODULE: required fields, formats, ranges                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Hosted backend                                               │
//! │  └── Unique emails, password policy, permissions                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use foodie_core::validation::validate_sign_in;
//! use foodie_core::SignInForm;
//!
//! let form = SignInForm { email: "ada@example.com".into(), password: "".into() };
//! let err = validate_sign_in(&form).unwrap_err();
//! assert_eq!(err.to_string(), "password is required");
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{SignInForm, SignUpForm};
use crate::{MAX_MENU_LIMIT, MIN_PASSWORD_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the sign-in form.
///
/// ## Rules
/// - Email and password are required (checked in that order)
/// - Email must look like an address
pub fn validate_sign_in(form: &SignInForm) -> ValidationResult<()> {
    required("email", &form.email)?;
    required("password", &form.password)?;
    validate_email(&form.email)
}

/// Validates the sign-up form.
///
/// ## Rules
/// - Name, email and password are all required
/// - Email must look like an address
/// - Password must meet the minimum length
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sign Up                                                                │
/// │                                                                         │
/// │  User taps "Create account"                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_sign_up(form) ← THIS FUNCTION                                │
/// │       │                                                                 │
/// │       ├── any field empty? → "name is required" (alert)                │
/// │       ├── bad email?       → "email has invalid format: ..."           │
/// │       ├── short password?  → "password must be at least 8 characters" │
/// │       │                                                                 │
/// │       └── OK → create account, sign in, create profile row             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_sign_up(form: &SignUpForm) -> ValidationResult<()> {
    required("name", &form.name)?;
    required("email", &form.email)?;
    required("password", &form.password)?;
    validate_name(&form.name)?;
    validate_email(&form.email)?;
    validate_password(&form.password)
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an email address.
///
/// This is a shape check (one `@`, a dotted domain, no whitespace); the
/// backend remains the authority on deliverability and uniqueness.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    required("email", email)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must contain exactly one '@' after a name"));
    }

    let dotted = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if !dotted {
        return Err(invalid("domain must look like example.com"));
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - At least [`MIN_PASSWORD_LENGTH`] characters
/// - At most 256 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    required("password", password)?;

    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if len > 256 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 256,
        });
    }

    Ok(())
}

/// Validates a display name (1-128 characters after trimming).
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    required("name", name)?;

    if name.chars().count() > 128 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (lists without a name filter)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog listing limit (1..=[`MAX_MENU_LIMIT`]).
pub fn validate_menu_limit(limit: u32) -> ValidationResult<()> {
    if limit == 0 || limit > MAX_MENU_LIMIT {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: i64::from(MAX_MENU_LIMIT),
        });
    }
    Ok(())
}

/// Validates a dish price. Dishes are never free.
///
/// ```rust
/// use foodie_core::validation::validate_item_price;
/// use foodie_core::Money;
///
/// assert!(validate_item_price(Money::from_cents(1025)).is_ok());
/// assert!(validate_item_price(Money::zero()).is_err());
/// ```
pub fn validate_item_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a customization price. Free add-ons (e.g. "no onions") are allowed.
pub fn validate_customization_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "customization price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
