//! Field rules for [`ProductInput`].

use validator::Validate;

use crate::error::FieldErrors;
use crate::models::{NAME_REQUIRED, PRICE_REQUIRED, ProductInput, QUANTITY_REQUIRED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Create and replace: name, price and quantity must be present.
    Full,
    /// Patch: only the fields that are present are checked.
    Partial,
}

/// Checks an input and reports one message per offending field.
#[cfg_attr(test, mockall::automock)]
pub trait InputValidator: Send + Sync {
    fn validate(&self, input: &ProductInput, mode: ValidationMode) -> Result<(), FieldErrors>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductInputValidator;

impl InputValidator for ProductInputValidator {
    fn validate(&self, input: &ProductInput, mode: ValidationMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Err(e) = input.validate() {
            for (field, violations) in e.field_errors() {
                if let Some(first) = violations.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    errors.insert(field.to_string(), message);
                }
            }
        }

        if mode == ValidationMode::Full {
            let required = [
                ("name", input.name.is_none(), NAME_REQUIRED),
                ("price", input.price.is_none(), PRICE_REQUIRED),
                ("quantity", input.quantity.is_none(), QUANTITY_REQUIRED),
            ];
            for (field, missing, message) in required {
                if missing {
                    errors.insert(field.to_string(), message.to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
