use serde_json::{Value, json};

use super::{LineItemFields, PricingContext, PricingStrategy, StrategyInput, round_extended};

/// Case-lookup pricing keyed on the `os` argument, falling back to
/// the `default` case, falling back to zero.
#[derive(Debug, Default)]
pub struct SwitchStrategy;

impl PricingStrategy for SwitchStrategy {
    fn supports(&self, formula_type: &str) -> bool {
        formula_type == "switch"
    }

    fn price(&self, input: &StrategyInput<'_>, _ctx: &mut PricingContext) -> LineItemFields {
        let key = input
            .args
            .get("os")
            .and_then(Value::as_str)
            .unwrap_or("default");
        let cases = input.catalog.formula().get("cases");

        let case_cents = |case_key: &str| {
            cases
                .and_then(|cases| cases.get(case_key))
                .and_then(|case| case.get("cents"))
                .and_then(Value::as_i64)
        };
        let unit_price_cents = case_cents(key).or_else(|| case_cents("default")).unwrap_or(0);
        let qty = input.qty.unwrap_or(1.0);

        LineItemFields {
            unit_price_cents,
            extended_cents: round_extended(unit_price_cents, qty),
            label: input.catalog.name().as_str().to_owned(),
            meta: json!({"case": key, "qty": qty}),
        }
    }
}
