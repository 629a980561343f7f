use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::sync::{Mutex, RwLock};

use quoterun_core::{AppError, AppResult};
use quoterun_domain::{WizardTemplate, WizardTemplateInput};

use crate::pricing_ports::{
    CreateRunInput, PricingRun, RunRepository, RunStatus, SaveBreakdownInput, TemplateRepository,
};

use super::RunService;

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
        Ok(self.templates.read().await.values().cloned().collect())
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

async fn service_with_template() -> RunService {
    let templates = Arc::new(FakeTemplateRepository::default());
    let template = WizardTemplate::new(WizardTemplateInput {
        code: "server_migration".to_owned(),
        name: "Server Migration".to_owned(),
        version: 1,
        is_active: true,
        schema: json!({"steps": []}),
    });
    let Ok(template) = template else {
        panic!("template should validate");
    };
    let saved = templates.save_template(template).await;
    assert!(saved.is_ok());

    RunService::new(templates, Arc::new(FakeRunRepository::default()))
}

#[tokio::test]
async fn create_run_starts_as_empty_draft() {
    let service = service_with_template().await;

    let run = service.create_run("server_migration", None, None).await;
    let Ok(run) = run else {
        panic!("run creation should succeed");
    };

    assert_eq!(run.template_code, "server_migration");
    assert_eq!(run.status, RunStatus::Draft);
    assert_eq!(run.answers, json!({}));
    assert_eq!(run.total_cents, 0);
    assert!(run.pricing_breakdown.is_none());
    assert!(run.submitted_at.is_none());
}

#[tokio::test]
async fn create_run_requires_existing_template() {
    let service = service_with_template().await;

    let result = service.create_run("retired_wizard", None, None).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn patch_answers_replaces_the_whole_mapping() {
    let service = service_with_template().await;
    let run = service.create_run("server_migration", None, None).await;
    let Ok(run) = run else {
        panic!("run creation should succeed");
    };

    let first = service
        .patch_answers(run.run_id.as_str(), json!({"count": 3, "os": "linux"}))
        .await;
    assert!(first.is_ok());

    let second = service
        .patch_answers(run.run_id.as_str(), json!({"count": 5}))
        .await;
    let Ok(second) = second else {
        panic!("patch should succeed");
    };

    // Full replace, not a deep merge: the os key is gone.
    assert_eq!(second.answers, json!({"count": 5}));
    assert_eq!(second.total_cents, 0);
}

#[tokio::test]
async fn patch_answers_rejects_non_object_payload() {
    let service = service_with_template().await;
    let run = service.create_run("server_migration", None, None).await;
    let Ok(run) = run else {
        panic!("run creation should succeed");
    };

    let result = service.patch_answers(run.run_id.as_str(), json!([1, 2])).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn patch_answers_for_missing_run_is_not_found() {
    let service = service_with_template().await;

    let result = service.patch_answers("run-404", json!({})).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn submit_stamps_status_and_time() {
    let service = service_with_template().await;
    let run = service.create_run("server_migration", None, None).await;
    let Ok(run) = run else {
        panic!("run creation should succeed");
    };

    let submitted = service.submit(run.run_id.as_str()).await;
    let Ok(submitted) = submitted else {
        panic!("submit should succeed");
    };

    assert_eq!(submitted.status, RunStatus::Submitted);
    assert!(submitted.submitted_at.is_some());
}

#[tokio::test]
async fn resubmit_is_lenient_and_restamps() {
    let service = service_with_template().await;
    let run = service.create_run("server_migration", None, None).await;
    let Ok(run) = run else {
        panic!("run creation should succeed");
    };

    let first = service.submit(run.run_id.as_str()).await;
    let Ok(first) = first else {
        panic!("submit should succeed");
    };

    // Current behavior, not a guaranteed contract: a second submit is
    // accepted and moves the timestamp forward.
    let second = service.submit(run.run_id.as_str()).await;
    let Ok(second) = second else {
        panic!("resubmit should succeed");
    };

    assert_eq!(second.status, RunStatus::Submitted);
    assert!(second.submitted_at >= first.submitted_at);
}
