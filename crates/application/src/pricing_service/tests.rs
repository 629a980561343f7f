use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::sync::{Mutex, RwLock};

use quoterun_core::{AppError, AppResult};
use quoterun_domain::{
    CatalogItem, CatalogItemInput, WizardTemplate, WizardTemplateInput,
};

use crate::pricing_ports::{
    CatalogRepository, CreateRunInput, PricingRun, RunRepository, RunStatus, SaveBreakdownInput,
    TemplateRepository,
};

use super::PricingService;

#[derive(Default)]
struct FakeTemplateRepository {
    templates: RwLock<HashMap<String, WizardTemplate>>,
}

#[async_trait]
impl TemplateRepository for FakeTemplateRepository {
    async fn save_template(&self, template: WizardTemplate) -> AppResult<()> {
        self.templates
            .write()
            .await
            .insert(template.code().as_str().to_owned(), template);
        Ok(())
    }

    async fn find_template(&self, code: &str) -> AppResult<Option<WizardTemplate>> {
        Ok(self.templates.read().await.get(code).cloned())
    }

    async fn list_templates(&self) -> AppResult<Vec<WizardTemplate>> {
        let mut templates: Vec<WizardTemplate> =
            self.templates.read().await.values().cloned().collect();
        templates.sort_by(|left, right| left.code().as_str().cmp(right.code().as_str()));
        Ok(templates)
    }
}

#[derive(Default)]
struct FakeCatalogRepository {
    items: RwLock<HashMap<String, CatalogItem>>,
}

#[async_trait]
impl CatalogRepository for FakeCatalogRepository {
    async fn save_item(&self, item: CatalogItem) -> AppResult<()> {
        self.items
            .write()
            .await
            .insert(item.code().as_str().to_owned(), item);
        Ok(())
    }

    async fn find_item(&self, code: &str) -> AppResult<Option<CatalogItem>> {
        Ok(self.items.read().await.get(code).cloned())
    }
}

#[derive(Default)]
struct FakeRunRepository {
    runs: Mutex<HashMap<String, PricingRun>>,
}

#[async_trait]
impl RunRepository for FakeRunRepository {
    async fn create_run(&self, input: CreateRunInput) -> AppResult<PricingRun> {
        let mut runs = self.runs.lock().await;
        let run = PricingRun {
            run_id: format!("run-{}", runs.len() + 1),
            template_code: input.template_code,
            tenant_id: input.tenant_id,
            user_id: input.user_id,
            answers: json!({}),
            status: RunStatus::Draft,
            pricing_breakdown: None,
            total_cents: 0,
            submitted_at: None,
            created_at: Utc::now(),
        };
        runs.insert(run.run_id.clone(), run.clone());
        Ok(run)
    }

    async fn find_run(&self, run_id: &str) -> AppResult<Option<PricingRun>> {
        Ok(self.runs.lock().await.get(run_id).cloned())
    }

    async fn replace_answers(
        &self,
        run_id: &str,
        answers: Value,
    ) -> AppResult<Option<PricingRun>> {
        let mut runs = self.runs.lock().await;
        Ok(runs.get_mut(run_id).map(|run| {
            run.answers = answers;
            run.clone()
        }))
    }

    async fn save_breakdown(
        &self,
        run_id: &str,
        input: SaveBreakdownInput,
    ) -> AppResult<Option<PricingRun>> {
        let mut runs = self.runs.lock().await;
        Ok(runs.get_mut(run_id).map(|run| {
            run.pricing_breakdown = Some(input.line_items);
            run.total_cents = input.total_cents;
            run.clone()
        }))
    }

    async fn mark_submitted(
        &self,
        run_id: &str,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<Option<PricingRun>> {
        let mut runs = self.runs.lock().await;
        Ok(runs.get_mut(run_id).map(|run| {
            run.status = RunStatus::Submitted;
            run.submitted_at = Some(submitted_at);
            run.clone()
        }))
    }
}

struct Harness {
    templates: Arc<FakeTemplateRepository>,
    catalog: Arc<FakeCatalogRepository>,
    runs: Arc<FakeRunRepository>,
    service: PricingService,
}

fn harness() -> Harness {
    let templates = Arc::new(FakeTemplateRepository::default());
    let catalog = Arc::new(FakeCatalogRepository::default());
    let runs = Arc::new(FakeRunRepository::default());
    let service = PricingService::new(templates.clone(), catalog.clone(), runs.clone());

    Harness {
        templates,
        catalog,
        runs,
        service,
    }
}

async fn seed_template(harness: &Harness, schema: Value) {
    let template = WizardTemplate::new(WizardTemplateInput {
        code: "server_migration".to_owned(),
        name: "Server Migration".to_owned(),
        version: 1,
        is_active: true,
        schema,
    });
    let Ok(template) = template else {
        panic!("template should validate");
    };
    let saved = harness.templates.save_template(template).await;
    assert!(saved.is_ok());
}

async fn seed_catalog(harness: &Harness, code: &str, base_price_cents: i64, formula: Value) {
    let item = CatalogItem::new(CatalogItemInput {
        code: code.to_owned(),
        name: code.to_owned(),
        base_price_cents,
        formula,
    });
    let Ok(item) = item else {
        panic!("catalog item should validate");
    };
    let saved = harness.catalog.save_item(item).await;
    assert!(saved.is_ok());
}

async fn seed_run(harness: &Harness, answers: Value) -> String {
    let run = harness
        .runs
        .create_run(CreateRunInput {
            template_code: "server_migration".to_owned(),
            tenant_id: None,
            user_id: None,
        })
        .await;
    let Ok(run) = run else {
        panic!("run creation should succeed");
    };
    let patched = harness.runs.replace_answers(run.run_id.as_str(), answers).await;
    assert!(patched.is_ok());
    run.run_id
}

#[tokio::test]
async fn prices_per_unit_rule_from_answers_quantity() {
    let harness = harness();
    seed_template(
        &harness,
        json!({"steps": [{"pricing": [{"catalog": "vm_base", "qty": "answers.count"}]}]}),
    ).await;
    seed_catalog(&harness, "vm_base", 1000, json!(null)).await;
    let run_id = seed_run(&harness, json!({"count": 3})).await;

    let run = harness.service.price_run(run_id.as_str()).await;
    let Ok(run) = run else {
        panic!("pricing should succeed");
    };

    let Some(breakdown) = &run.pricing_breakdown else {
        panic!("breakdown should be persisted");
    };
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].sku, "vm_base");
    assert_eq!(breakdown[0].unit_price_cents, 1000);
    assert_eq!(breakdown[0].extended_cents, 3000);
    assert_eq!(run.total_cents, 3000);
}

#[tokio::test]
async fn repeat_block_prices_each_vm_with_index_tag() {
    let harness = harness();
    seed_template(
        &harness,
        json!({"steps": [{
            "repeat": {
                "countFrom": "len(answers.vms)",
                "pricing": [{"catalog": "cpu", "qty": "item.cpu"}]
            }
        }]}),
    ).await;
    seed_catalog(&harness, "cpu", 500, json!(null)).await;
    let run_id = seed_run(&harness, json!({"vms": [{"cpu": 2}, {"cpu": 4}]})).await;

    let run = harness.service.price_run(run_id.as_str()).await;
    let Ok(run) = run else {
        panic!("pricing should succeed");
    };

    let Some(breakdown) = &run.pricing_breakdown else {
        panic!("breakdown should be persisted");
    };
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].extended_cents, 1000);
    assert_eq!(breakdown[1].extended_cents, 2000);
    assert_eq!(breakdown[0].meta.get("vmIndex"), Some(&json!(0)));
    assert_eq!(breakdown[1].meta.get("vmIndex"), Some(&json!(1)));
    assert_eq!(run.total_cents, 3000);
}

#[tokio::test]
async fn repeat_block_falls_back_to_indexed_vm_answers() {
    let harness = harness();
    seed_template(
        &harness,
        json!({"steps": [{
            "repeat": {
                "countFrom": "answers.vm_count",
                "pricing": [{"catalog": "cpu", "qty": "item.cpu"}]
            }
        }]}),
    ).await;
    seed_catalog(&harness, "cpu", 500, json!(null)).await;
    let run_id = seed_run(
        &harness,
        json!({"vm_count": 2, "vm_0": {"cpu": 1}, "vm_1": {"cpu": 3}}),
    )
    .await;

    let run = harness.service.price_run(run_id.as_str()).await;
    let Ok(run) = run else {
        panic!("pricing should succeed");
    };

    let Some(breakdown) = &run.pricing_breakdown else {
        panic!("breakdown should be persisted");
    };
    assert_eq!(breakdown[0].extended_cents, 500);
    assert_eq!(breakdown[1].extended_cents, 1500);
}

#[tokio::test]
async fn unknown_catalog_reference_skips_the_rule() {
    let harness = harness();
    seed_template(
        &harness,
        json!({"steps": [{"pricing": [
            {"catalog": "decommissioned", "qty": 1},
            {"catalog": "vm_base", "qty": 2}
        ]}]}),
    ).await;
    seed_catalog(&harness, "vm_base", 1000, json!(null)).await;
    let run_id = seed_run(&harness, json!({})).await;

    let run = harness.service.price_run(run_id.as_str()).await;
    let Ok(run) = run else {
        panic!("pricing should succeed");
    };

    let Some(breakdown) = &run.pricing_breakdown else {
        panic!("breakdown should be persisted");
    };
    assert_eq!(breakdown.len(), 1);
    assert_eq!(run.total_cents, 2000);
}

#[tokio::test]
async fn unknown_formula_type_aborts_without_persisting() {
    let harness = harness();
    seed_template(
        &harness,
        json!({"steps": [{"pricing": [{"catalog": "vm_base", "qty": 1}]}]}),
    ).await;
    seed_catalog(&harness, "vm_base", 1000, json!({"type": "subscription"})).await;
    let run_id = seed_run(&harness, json!({})).await;

    let result = harness.service.price_run(run_id.as_str()).await;
    assert!(matches!(result, Err(AppError::Configuration(_))));

    let stored = harness.runs.find_run(run_id.as_str()).await;
    let Ok(Some(stored)) = stored else {
        panic!("run should still exist");
    };
    assert!(stored.pricing_breakdown.is_none());
    assert_eq!(stored.total_cents, 0);
}

#[tokio::test]
async fn missing_run_and_template_are_not_found() {
    let harness = harness();
    let result = harness.service.price_run("run-404").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    // Run exists but its template does not.
    let run_id = seed_run(&harness, json!({})).await;
    let result = harness.service.price_run(run_id.as_str()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn malformed_schema_prices_to_empty_breakdown() {
    let harness = harness();
    seed_template(&harness, json!("{not-json")).await;
    let run_id = seed_run(&harness, json!({"count": 9})).await;

    let run = harness.service.price_run(run_id.as_str()).await;
    let Ok(run) = run else {
        panic!("pricing should degrade, not fail");
    };

    assert_eq!(run.pricing_breakdown.map(|items| items.len()), Some(0));
    assert_eq!(run.total_cents, 0);
}

#[tokio::test]
async fn repricing_overwrites_the_previous_breakdown() {
    let harness = harness();
    seed_template(
        &harness,
        json!({"steps": [{"pricing": [{"catalog": "vm_base", "qty": "answers.count"}]}]}),
    ).await;
    seed_catalog(&harness, "vm_base", 1000, json!(null)).await;
    let run_id = seed_run(&harness, json!({"count": 3})).await;

    let first = harness.service.price_run(run_id.as_str()).await;
    assert!(first.is_ok());

    let patched = harness
        .runs
        .replace_answers(run_id.as_str(), json!({"count": 1}))
        .await;
    assert!(patched.is_ok());

    let second = harness.service.price_run(run_id.as_str()).await;
    let Ok(second) = second else {
        panic!("pricing should succeed");
    };
    let Some(breakdown) = &second.pricing_breakdown else {
        panic!("breakdown should be persisted");
    };
    assert_eq!(breakdown.len(), 1);
    assert_eq!(second.total_cents, 1000);
}

#[tokio::test]
async fn total_matches_breakdown_sum_across_strategies() {
    let harness = harness();
    seed_template(
        &harness,
        json!({"steps": [
            {"pricing": [
                {"catalog": "storage", "qty": "answers.gb"},
                {"catalog": "os_license", "args": {"os": "answers.os"}}
            ]},
            {"pricing": [{"catalog": "aging_support"}]}
        ]}),
    ).await;
    seed_catalog(
        &harness,
        "storage",
        0,
        json!({"type": "tiered", "tiers": [
            {"upTo": 100, "cents": 9},
            {"upTo": null, "cents": 7}
        ]}),
    )
    .await;
    seed_catalog(
        &harness,
        "os_license",
        0,
        json!({"type": "switch", "cases": {
            "windows": {"cents": 1200},
            "default": {"cents": 0}
        }}),
    )
    .await;
    seed_catalog(
        &harness,
        "aging_support",
        100,
        json!({"type": "aging", "ageTable": [{"factor": 0.5}]}),
    )
    .await;
    let run_id = seed_run(&harness, json!({"gb": 250, "os": "windows"})).await;

    let run = harness.service.price_run(run_id.as_str()).await;
    let Ok(run) = run else {
        panic!("pricing should succeed");
    };

    let Some(breakdown) = &run.pricing_breakdown else {
        panic!("breakdown should be persisted");
    };
    // 250 GB at 7 cents, one windows license, 6 factor-months at 100.
    assert_eq!(breakdown.len(), 3);
    assert_eq!(breakdown[0].extended_cents, 1750);
    assert_eq!(breakdown[1].extended_cents, 1200);
    assert_eq!(breakdown[2].extended_cents, 600);
    let summed: i64 = breakdown.iter().map(|item| item.extended_cents).sum();
    assert_eq!(run.total_cents, summed);
    assert_eq!(run.total_cents, 3550);
}

#[tokio::test]
async fn unresolved_expressions_price_as_zero() {
    let harness = harness();
    seed_template(
        &harness,
        json!({"steps": [{"pricing": [{"catalog": "vm_base", "qty": "answres.count"}]}]}),
    ).await;
    seed_catalog(&harness, "vm_base", 1000, json!(null)).await;
    let run_id = seed_run(&harness, json!({"count": 3})).await;

    // The typo'd path silently evaluates to zero.
    let run = harness.service.price_run(run_id.as_str()).await;
    let Ok(run) = run else {
        panic!("pricing should succeed");
    };
    assert_eq!(run.total_cents, 0);
}
