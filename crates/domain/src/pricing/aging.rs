use serde_json::{Value, json};

use super::{LineItemFields, PricingContext, PricingStrategy, StrategyInput};

/// Aging-curve pricing: a base monthly rate multiplied by twelve
/// factor-weighted months per age-table row.
#[derive(Debug, Default)]
pub struct AgingStrategy;

impl PricingStrategy for AgingStrategy {
    fn supports(&self, formula_type: &str) -> bool {
        formula_type == "aging"
    }

    fn price(&self, input: &StrategyInput<'_>, ctx: &mut PricingContext) -> LineItemFields {
        let age_table = input
            .catalog
            .formula()
            .get("ageTable")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let factor_months: f64 = age_table
            .iter()
            .map(|row| 12.0 * row.get("factor").and_then(Value::as_f64).unwrap_or(1.0))
            .sum();

        let base_monthly = ctx
            .get("baseMonthly")
            .and_then(Value::as_f64)
            .unwrap_or_else(|| input.catalog.base_price_cents() as f64);

        LineItemFields {
            unit_price_cents: base_monthly.round() as i64,
            extended_cents: (factor_months * base_monthly).round() as i64,
            label: input.catalog.name().as_str().to_owned(),
            meta: json!({"ageTable": age_table, "factorMonths": factor_months}),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value, json};

    use crate::catalog::{CatalogItem, CatalogItemInput};

    use super::{AgingStrategy, PricingContext, PricingStrategy, StrategyInput};

    fn catalog_item(base_price_cents: i64, formula: Value) -> CatalogItem {
        let item = CatalogItem::new(CatalogItemInput {
            code: "aging_support".to_owned(),
            name: "Aging Support".to_owned(),
            base_price_cents,
            formula,
        });
        let Ok(item) = item else {
            panic!("catalog item should validate");
        };
        item
    }

    fn price(catalog: &CatalogItem, ctx: &mut PricingContext) -> super::LineItemFields {
        let args = Map::new();
        let answers = json!({});
        AgingStrategy.price(
            &StrategyInput {
                qty: None,
                args: &args,
                answers: &answers,
                item: None,
                catalog,
            },
            ctx,
        )
    }

    #[test]
    fn sums_factor_weighted_months_over_base_rate() {
        let catalog = catalog_item(
            100,
            json!({"type": "aging", "ageTable": [{"factor": 1.0}, {"factor": 0.5}]}),
        );

        let fields = price(&catalog, &mut PricingContext::new());
        // 12 * 1.0 + 12 * 0.5 = 18 factor months at 100 cents.
        assert_eq!(fields.unit_price_cents, 100);
        assert_eq!(fields.extended_cents, 1800);
    }

    #[test]
    fn missing_factor_defaults_to_one() {
        let catalog = catalog_item(50, json!({"type": "aging", "ageTable": [{}, {}]}));
        assert_eq!(price(&catalog, &mut PricingContext::new()).extended_cents, 1200);
    }

    #[test]
    fn context_base_monthly_overrides_base_price() {
        let catalog = catalog_item(100, json!({"type": "aging", "ageTable": [{"factor": 1.0}]}));
        let mut ctx = PricingContext::new();
        ctx.insert("baseMonthly", json!(10.0));

        let fields = price(&catalog, &mut ctx);
        assert_eq!(fields.unit_price_cents, 10);
        assert_eq!(fields.extended_cents, 120);
    }

    #[test]
    fn empty_age_table_prices_zero() {
        let catalog = catalog_item(100, json!({"type": "aging"}));
        assert_eq!(price(&catalog, &mut PricingContext::new()).extended_cents, 0);
    }
}
