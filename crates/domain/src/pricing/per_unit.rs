use serde_json::{Value, json};

use super::{LineItemFields, PricingContext, PricingStrategy, StrategyInput, round_extended};

/// Flat per-unit pricing at the formula unit price, falling back to
/// the catalog base price.
#[derive(Debug, Default)]
pub struct PerUnitStrategy;

impl PricingStrategy for PerUnitStrategy {
    fn supports(&self, formula_type: &str) -> bool {
        formula_type == "per_unit"
    }

    fn price(&self, input: &StrategyInput<'_>, _ctx: &mut PricingContext) -> LineItemFields {
        let unit_price_cents = input
            .catalog
            .formula()
            .get("unit_price_cents")
            .and_then(Value::as_i64)
            .unwrap_or_else(|| input.catalog.base_price_cents());
        let qty = input.qty.unwrap_or(0.0);

        LineItemFields {
            unit_price_cents,
            extended_cents: round_extended(unit_price_cents, qty),
            label: input.catalog.name().as_str().to_owned(),
            meta: json!({"qty": qty}),
        }
    }
}
