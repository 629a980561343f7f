use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quoterun_application::{CreateRunInput, PricingRun, RunRepository, RunStatus, SaveBreakdownInput};
use quoterun_core::AppResult;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory pricing run repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRunRepository {
    runs: RwLock<HashMap<String, PricingRun>>,
}

impl InMemoryRunRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RunRepository for InMemoryRunRepository {
    async fn create_run(&self, input: CreateRunInput) -> AppResult<PricingRun> {
        let run = PricingRun {
            run_id: Uuid::new_v4().to_string(),
            template_code: input.template_code,
            tenant_id: input.tenant_id,
            user_id: input.user_id,
            answers: Value::Object(Map::new()),
            status: RunStatus::Draft,
            pricing_breakdown: None,
            total_cents: 0,
            submitted_at: None,
            created_at: Utc::now(),
        };

        self.runs
            .write()
            .await
            .insert(run.run_id.clone(), run.clone());
        Ok(run)
    }

    async fn find_run(&self, run_id: &str) -> AppResult<Option<PricingRun>> {
        Ok(self.runs.read().await.get(run_id).cloned())
    }

    async fn replace_answers(
        &self,
        run_id: &str,
        answers: Value,
    ) -> AppResult<Option<PricingRun>> {
        let mut runs = self.runs.write().await;
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
        let mut runs = self.runs.write().await;
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
        let mut runs = self.runs.write().await;
        Ok(runs.get_mut(run_id).map(|run| {
            run.status = RunStatus::Submitted;
            run.submitted_at = Some(submitted_at);
            run.clone()
        }))
    }
}
