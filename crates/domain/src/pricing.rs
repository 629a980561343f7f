use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::CatalogItem;

mod aging;
mod per_unit;
mod registry;
mod switch_case;
mod tiered;

pub use aging::AgingStrategy;
pub use per_unit::PerUnitStrategy;
pub use registry::PricingStrategyRegistry;
pub use switch_case::SwitchStrategy;
pub use tiered::TieredStrategy;

/// Priced fields produced by one strategy invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemFields {
    /// Unit price in integer cents.
    pub unit_price_cents: i64,
    /// Extended price in integer cents.
    pub extended_cents: i64,
    /// Display label for the priced entry.
    pub label: String,
    /// Strategy-specific metadata echoed back for UI transparency.
    pub meta: Value,
}

/// One priced entry in a run's computed breakdown.
///
/// Line items are produced fresh on every pricing pass and replaced
/// as a batch, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog code of the priced item.
    pub sku: String,
    /// Unit price in integer cents.
    pub unit_price_cents: i64,
    /// Extended price in integer cents.
    pub extended_cents: i64,
    /// Display label.
    pub label: String,
    /// Strategy-specific metadata; repeated steps additionally carry
    /// the repetition index under `vmIndex`.
    pub meta: Value,
}

impl LineItem {
    /// Builds a line item from strategy output, tagging the catalog
    /// code as the SKU.
    #[must_use]
    pub fn from_fields(sku: impl Into<String>, fields: LineItemFields) -> Self {
        Self {
            sku: sku.into(),
            unit_price_cents: fields.unit_price_cents,
            extended_cents: fields.extended_cents,
            label: fields.label,
            meta: fields.meta,
        }
    }
}

/// Normalized input bag passed to every strategy invocation.
#[derive(Debug, Clone, Copy)]
pub struct StrategyInput<'a> {
    /// Evaluated quantity; `None` when the rule omits `qty`.
    pub qty: Option<f64>,
    /// Evaluated argument mapping.
    pub args: &'a Map<String, Value>,
    /// Full run answers for strategies needing broader context.
    pub answers: &'a Value,
    /// Repeat-iteration item context, when inside a repeat block.
    pub item: Option<&'a Value>,
    /// Resolved catalog item with its decoded formula.
    pub catalog: &'a CatalogItem,
}

/// Mutable accumulator shared across one whole pricing pass.
///
/// Scoped to exactly one `price_run` invocation and discarded after;
/// never persisted. No strategy writes to it today, but the slot is
/// part of the strategy contract.
#[derive(Debug, Default)]
pub struct PricingContext(Map<String, Value>);

impl PricingContext {
    /// Creates an empty pricing context.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Returns one accumulated value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Stores one accumulated value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

/// Pricing algorithm selected by a catalog formula's `type`
/// discriminator. The strategy set is small and closed; registration
/// is a static list, not runtime discovery.
pub trait PricingStrategy: Send + Sync {
    /// Returns whether this strategy handles the given formula type.
    fn supports(&self, formula_type: &str) -> bool;

    /// Computes priced fields from the normalized input bag.
    fn price(&self, input: &StrategyInput<'_>, ctx: &mut PricingContext) -> LineItemFields;
}

pub(crate) fn round_extended(unit_price_cents: i64, qty: f64) -> i64 {
    (unit_price_cents as f64 * qty).round() as i64
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{LineItem, LineItemFields, PricingContext, round_extended};

    #[test]
    fn from_fields_tags_sku() {
        let item = LineItem::from_fields(
            "vm_base",
            LineItemFields {
                unit_price_cents: 500,
                extended_cents: 1500,
                label: "Virtual Machine".to_owned(),
                meta: json!({"qty": 3.0}),
            },
        );

        assert_eq!(item.sku, "vm_base");
        assert_eq!(item.extended_cents, 1500);
    }

    #[test]
    fn extended_price_rounds_to_nearest_cent() {
        assert_eq!(round_extended(333, 1.5), 500);
        assert_eq!(round_extended(100, 0.0), 0);
        assert_eq!(round_extended(1, 0.4), 0);
    }

    #[test]
    fn pricing_context_stores_values() {
        let mut ctx = PricingContext::new();
        assert!(ctx.get("baseMonthly").is_none());
        ctx.insert("baseMonthly", json!(250));
        assert_eq!(ctx.get("baseMonthly"), Some(&json!(250)));
    }
}
