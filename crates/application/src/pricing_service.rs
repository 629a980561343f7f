use std::sync::Arc;

use quoterun_core::{AppError, AppResult};
use quoterun_domain::{
    LineItem, PricingContext, PricingRule, PricingStrategyRegistry, StrategyInput, evaluate,
    number_or_zero,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::pricing_ports::{
    CatalogRepository, PricingRun, RunRepository, SaveBreakdownInput, TemplateRepository,
};

/// Pricing orchestrator walking a run's template schema and
/// aggregating line items into a total.
///
/// A pass is pure until the final persistence step: line items are
/// accumulated in order, and the breakdown plus total replace the
/// previous ones only once the whole walk has succeeded. An unknown
/// strategy type aborts the pass with nothing persisted.
#[derive(Clone)]
pub struct PricingService {
    templates: Arc<dyn TemplateRepository>,
    catalog: Arc<dyn CatalogRepository>,
    runs: Arc<dyn RunRepository>,
    registry: Arc<PricingStrategyRegistry>,
}

impl PricingService {
    /// Creates a pricing service with the built-in strategy set.
    #[must_use]
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        catalog: Arc<dyn CatalogRepository>,
        runs: Arc<dyn RunRepository>,
    ) -> Self {
        Self {
            templates,
            catalog,
            runs,
            registry: Arc::new(PricingStrategyRegistry::with_default_strategies()),
        }
    }

    /// Recomputes and persists the run's pricing breakdown.
    pub async fn price_run(&self, run_id: &str) -> AppResult<PricingRun> {
        let run = self
            .runs
            .find_run(run_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pricing run '{run_id}' does not exist")))?;

        let template = self
            .templates
            .find_template(run.template_code.as_str())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "template '{}' for run '{run_id}' does not exist",
                    run.template_code
                ))
            })?;

        // Re-normalized on every pass; the stored schema may have been
        // edited between runs.
        let schema = template.normalized_schema();
        let mut ctx = PricingContext::new();
        let mut line_items: Vec<LineItem> = Vec::new();

        for step in &schema.steps {
            for rule in &step.pricing {
                if let Some(line_item) = self.price_rule(rule, &run.answers, None, &mut ctx).await?
                {
                    line_items.push(line_item);
                }
            }

            let Some(repeat) = &step.repeat else {
                continue;
            };

            let count = repeat_count(&repeat.count_from, &run.answers);
            for index in 0..count {
                let item = repeat_item_context(&run.answers, index);
                for rule in &repeat.pricing {
                    if let Some(mut line_item) = self
                        .price_rule(rule, &run.answers, Some(&item), &mut ctx)
                        .await?
                    {
                        tag_repeat_index(&mut line_item, index);
                        line_items.push(line_item);
                    }
                }
            }
        }

        let total_cents = line_items.iter().map(|item| item.extended_cents).sum();
        let updated = self
            .runs
            .save_breakdown(
                run_id,
                SaveBreakdownInput {
                    line_items,
                    total_cents,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pricing run '{run_id}' does not exist")))?;

        info!(run_id, total_cents, "computed pricing breakdown");
        Ok(updated)
    }

    async fn price_rule(
        &self,
        rule: &PricingRule,
        answers: &Value,
        item: Option<&Value>,
        ctx: &mut PricingContext,
    ) -> AppResult<Option<LineItem>> {
        let Some(catalog) = self.catalog.find_item(rule.catalog.as_str()).await? else {
            // Unknown catalog references skip the rule; existing
            // templates rely on this lenient behavior.
            debug!(catalog_code = %rule.catalog, "skipping rule for unknown catalog item");
            return Ok(None);
        };

        let qty = rule
            .qty
            .as_ref()
            .map(|raw| number_or_zero(&evaluate(raw, answers, item)));

        let mut args = Map::with_capacity(rule.args.len());
        for (name, raw) in &rule.args {
            args.insert(name.clone(), evaluate(raw, answers, item));
        }

        let strategy = self.registry.get(catalog.formula_type())?;
        let fields = strategy.price(
            &StrategyInput {
                qty,
                args: &args,
                answers,
                item,
                catalog: &catalog,
            },
            ctx,
        );

        Ok(Some(LineItem::from_fields(catalog.code().as_str(), fields)))
    }
}

fn repeat_count(count_from: &Value, answers: &Value) -> usize {
    let count = number_or_zero(&evaluate(count_from, answers, None));
    if count.is_finite() && count > 0.0 {
        count.floor() as usize
    } else {
        0
    }
}

/// Resolves the iteration item for one repeat index: the element of
/// `answers.vms`, else the `vm_<index>` answer, else an empty mapping.
fn repeat_item_context(answers: &Value, index: usize) -> Value {
    answers
        .get("vms")
        .and_then(Value::as_array)
        .and_then(|vms| vms.get(index))
        .cloned()
        .or_else(|| answers.get(format!("vm_{index}")).cloned())
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn tag_repeat_index(line_item: &mut LineItem, index: usize) {
    match line_item.meta.as_object_mut() {
        Some(meta) => {
            meta.insert("vmIndex".to_owned(), Value::from(index));
        }
        None => {
            let mut meta = Map::new();
            meta.insert("vmIndex".to_owned(), Value::from(index));
            line_item.meta = Value::Object(meta);
        }
    }
}

#[cfg(test)]
mod tests;
