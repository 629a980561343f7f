use quoterun_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default pricing strategy discriminator used when a catalog
/// formula carries no `type` field.
pub const DEFAULT_FORMULA_TYPE: &str = "per_unit";

/// Priceable SKU-like reference record consumed by pricing rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    code: NonEmptyString,
    name: NonEmptyString,
    base_price_cents: i64,
    formula: Value,
}

/// Input payload used to construct a validated catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItemInput {
    /// Stable unique item code referenced by pricing rules.
    pub code: String,
    /// User-facing item name, used as the default line item label.
    pub name: String,
    /// Base price in integer cents.
    pub base_price_cents: i64,
    /// Decoded formula object with a `type` discriminator plus
    /// strategy-specific parameters; `null` means per-unit at the
    /// base price.
    pub formula: Value,
}

impl CatalogItem {
    /// Creates a validated catalog item.
    pub fn new(input: CatalogItemInput) -> AppResult<Self> {
        let CatalogItemInput {
            code,
            name,
            base_price_cents,
            formula,
        } = input;

        if base_price_cents < 0 {
            return Err(AppError::Validation(
                "base_price_cents must not be negative".to_owned(),
            ));
        }

        if !formula.is_null() && !formula.is_object() {
            return Err(AppError::Validation(
                "catalog formula must be a JSON object when present".to_owned(),
            ));
        }

        Ok(Self {
            code: NonEmptyString::new(code)?,
            name: NonEmptyString::new(name)?,
            base_price_cents,
            formula,
        })
    }

    /// Returns the unique item code.
    #[must_use]
    pub fn code(&self) -> &NonEmptyString {
        &self.code
    }

    /// Returns the user-facing item name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the base price in cents.
    #[must_use]
    pub fn base_price_cents(&self) -> i64 {
        self.base_price_cents
    }

    /// Returns the decoded formula object.
    #[must_use]
    pub fn formula(&self) -> &Value {
        &self.formula
    }

    /// Returns the strategy discriminator, defaulting to per-unit
    /// when the formula carries no type.
    #[must_use]
    pub fn formula_type(&self) -> &str {
        self.formula
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_FORMULA_TYPE)
    }
}
