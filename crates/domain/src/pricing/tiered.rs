use serde_json::{Value, json};

use super::{LineItemFields, PricingContext, PricingStrategy, StrategyInput, round_extended};

/// Tiered pricing selecting the first tier, in list order, whose
/// `upTo` bound is null or at least the quantity.
///
/// Tiers are deliberately not sorted; reordering a formula's tier
/// list changes the result.
#[derive(Debug, Default)]
pub struct TieredStrategy;

impl PricingStrategy for TieredStrategy {
    fn supports(&self, formula_type: &str) -> bool {
        formula_type == "tiered"
    }

    fn price(&self, input: &StrategyInput<'_>, _ctx: &mut PricingContext) -> LineItemFields {
        let qty = input.qty.unwrap_or(0.0);
        let tiers = input
            .catalog
            .formula()
            .get("tiers")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let unit_price_cents = tiers
            .iter()
            .find(|tier| match tier.get("upTo").and_then(Value::as_f64) {
                Some(up_to) => qty <= up_to,
                None => true,
            })
            .and_then(|tier| tier.get("cents").and_then(Value::as_i64))
            .unwrap_or(0);

        LineItemFields {
            unit_price_cents,
            extended_cents: round_extended(unit_price_cents, qty),
            label: input.catalog.name().as_str().to_owned(),
            meta: json!({"qty": qty, "tiers": tiers}),
        }
    }
}
