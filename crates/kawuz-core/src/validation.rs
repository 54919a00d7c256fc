//! # Validation Module
//!
//! Client-side checks that run before any request leaves the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell command parsing (clap)                                 │
//! │  └── Types and argument counts                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, email shape                             │
//! │  ├── Arithmetic CAPTCHA before registration                            │
//! │  └── Admin product form (name, price, stock)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Duplicate usernames, stock checks on order                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure here becomes a `ValidationFailure` notice; no network call is
//! made.

use rand::Rng;

use crate::error::ValidationError;
use crate::types::{Credentials, ProductDraft, Registration};
use crate::{CAPTCHA_MAX_OPERAND, MAX_PRODUCT_NAME_LEN};

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
// Arithmetic CAPTCHA
// =============================================================================

/// "What is a + b?" gate in front of registration.
///
/// ## Example
/// ```rust
/// use kawuz_core::validation::ArithmeticCaptcha;
///
/// let captcha = ArithmeticCaptcha::new(3, 4);
/// assert_eq!(captcha.question(), "3 + 4");
/// assert!(captcha.check("7").is_ok());
/// assert!(captcha.check("8").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticCaptcha {
    a: u8,
    b: u8,
}

impl ArithmeticCaptcha {
    /// Operands above the maximum are clamped.
    pub fn new(a: u8, b: u8) -> Self {
        ArithmeticCaptcha {
            a: a.min(CAPTCHA_MAX_OPERAND),
            b: b.min(CAPTCHA_MAX_OPERAND),
        }
    }

    /// Draws both operands uniformly from `0..=9`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ArithmeticCaptcha::new(
            rng.gen_range(0..=CAPTCHA_MAX_OPERAND),
            rng.gen_range(0..=CAPTCHA_MAX_OPERAND),
        )
    }

    pub fn question(&self) -> String {
        format!("{} + {}", self.a, self.b)
    }

    pub fn answer(&self) -> u32 {
        u32::from(self.a) + u32::from(self.b)
    }

    /// Checks the user's typed answer.
    pub fn check(&self, typed: &str) -> ValidationResult<()> {
        match typed.trim().parse::<u32>() {
            Ok(value) if value == self.answer() => Ok(()),
            _ => Err(ValidationError::CaptchaMismatch {
                question: self.question(),
            }),
        }
    }
}

// =============================================================================
// Auth Forms
// =============================================================================

/// Validates the login form.
pub fn validate_credentials(credentials: &Credentials) -> ValidationResult<()> {
    required("username", &credentials.username)?;
    required("password", &credentials.password)?;
    Ok(())
}

/// Validates the registration form.
///
/// ## Rules
/// - username, password and email are required
/// - email must look like `local@domain`
pub fn validate_registration(registration: &Registration) -> ValidationResult<()> {
    required("username", &registration.username)?;
    required("password", &registration.password)?;
    required("email", &registration.email)?;

    let email = registration.email.trim();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@domain".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Admin Product Form
// =============================================================================

/// Validates a product create/update form.
///
/// ## Rules
/// - Name must not be empty, at most 200 characters
/// - Price and stock must not be negative
pub fn validate_product_draft(draft: &ProductDraft) -> ValidationResult<()> {
    required("name", &draft.name)?;

    if draft.name.trim().chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    if draft.price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if draft.stock_quantity < 0 {
        return Err(ValidationError::Negative {
            field: "stockQuantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a search keyword.
///
/// Empty is allowed (means "all products"). Returns the trimmed keyword.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_captcha_check() {
        let captcha = ArithmeticCaptcha::new(9, 9);
        assert_eq!(captcha.answer(), 18);
        assert!(captcha.check(" 18 ").is_ok());
        assert!(captcha.check("17").is_err());
        assert!(captcha.check("").is_err());
        assert!(captcha.check("eighteen").is_err());
    }

    #[test]
    fn test_captcha_clamps_operands() {
        let captcha = ArithmeticCaptcha::new(200, 3);
        assert_eq!(captcha.question(), "9 + 3");
    }

    #[test]
    fn test_random_captcha_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let captcha = ArithmeticCaptcha::random(&mut rng);
            assert!(captcha.answer() <= 18);
        }
    }

    #[test]
    fn test_credentials_required() {
        let creds = Credentials {
            username: "  ".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(
            validate_credentials(&creds),
            Err(ValidationError::Required {
                field: "username".to_string()
            })
        );
    }

    #[test]
    fn test_registration_email() {
        let mut reg = Registration {
            username: "ola".to_string(),
            password: "secret".to_string(),
            email: "ola@example.com".to_string(),
        };
        assert!(validate_registration(&reg).is_ok());

        reg.email = "ola.example.com".to_string();
        assert!(validate_registration(&reg).is_err());

        reg.email = "@example.com".to_string();
        assert!(validate_registration(&reg).is_err());
    }

    #[test]
    fn test_product_draft_rules() {
        let mut draft = ProductDraft {
            name: "Colombia Supremo".to_string(),
            description: String::new(),
            price: Money::from_minor(2999),
            stock_quantity: 10,
        };
        assert!(validate_product_draft(&draft).is_ok());

        draft.price = Money::from_minor(-1);
        assert!(matches!(
            validate_product_draft(&draft),
            Err(ValidationError::Negative { .. })
        ));

        draft.price = Money::zero();
        draft.name = "x".repeat(201);
        assert!(matches!(
            validate_product_draft(&draft),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_search_query_trimmed() {
        assert_eq!(validate_search_query("  kenya ").unwrap(), "kenya");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }
}
