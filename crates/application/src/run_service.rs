use std::sync::Arc;

use chrono::Utc;
use quoterun_core::{AppError, AppResult, TenantId};
use serde_json::Value;
use tracing::info;

use crate::pricing_ports::{CreateRunInput, PricingRun, RunRepository, TemplateRepository};

/// Pricing run lifecycle service.
///
/// Answer patches and pricing are deliberately separated: patching
/// replaces the answer mapping without recomputing anything, and the
/// client requests a price preview when it wants fresh numbers.
#[derive(Clone)]
pub struct RunService {
    templates: Arc<dyn TemplateRepository>,
    runs: Arc<dyn RunRepository>,
}

impl RunService {
    /// Creates a run service.
    #[must_use]
    pub fn new(templates: Arc<dyn TemplateRepository>, runs: Arc<dyn RunRepository>) -> Self {
        Self { templates, runs }
    }

    /// Creates a new draft run for an existing template.
    pub async fn create_run(
        &self,
        template_code: &str,
        tenant_id: Option<TenantId>,
        user_id: Option<String>,
    ) -> AppResult<PricingRun> {
        self.templates
            .find_template(template_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("template '{template_code}' does not exist"))
            })?;

        let run = self
            .runs
            .create_run(CreateRunInput {
                template_code: template_code.to_owned(),
                tenant_id,
                user_id,
            })
            .await?;

        info!(run_id = %run.run_id, template_code, "created pricing run");
        Ok(run)
    }

    /// Returns one run by id.
    pub async fn get_run(&self, run_id: &str) -> AppResult<PricingRun> {
        self.runs
            .find_run(run_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pricing run '{run_id}' does not exist")))
    }

    /// Replaces the run's whole answer mapping.
    ///
    /// This is a full replace, not a deep merge, and does not trigger
    /// a pricing pass.
    pub async fn patch_answers(&self, run_id: &str, answers: Value) -> AppResult<PricingRun> {
        if !answers.is_object() {
            return Err(AppError::Validation(
                "run answers must be a JSON object".to_owned(),
            ));
        }

        self.runs
            .replace_answers(run_id, answers)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pricing run '{run_id}' does not exist")))
    }

    /// Submits the run, stamping the submission time.
    ///
    /// Submitting an already-submitted run is not rejected; it simply
    /// re-stamps `submitted_at`.
    pub async fn submit(&self, run_id: &str) -> AppResult<PricingRun> {
        let run = self
            .runs
            .mark_submitted(run_id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("pricing run '{run_id}' does not exist")))?;

        info!(run_id, total_cents = run.total_cents, "submitted pricing run");
        Ok(run)
    }
}

#[cfg(test)]
mod tests;
