use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quoterun_core::AppResult;
use quoterun_domain::{CatalogItem, WizardTemplate};
use serde_json::Value;

use super::runs::{CreateRunInput, PricingRun, SaveBreakdownInput};

/// Repository port for wizard template definitions.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Saves one template definition.
    async fn save_template(&self, template: WizardTemplate) -> AppResult<()>;

    /// Returns one template by its unique code.
    async fn find_template(&self, code: &str) -> AppResult<Option<WizardTemplate>>;

    /// Lists all template definitions ordered by code.
    async fn list_templates(&self) -> AppResult<Vec<WizardTemplate>>;
}

/// Repository port for catalog reference data.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Saves one catalog item.
    async fn save_item(&self, item: CatalogItem) -> AppResult<()>;

    /// Returns one catalog item by its unique code.
    async fn find_item(&self, code: &str) -> AppResult<Option<CatalogItem>>;
}

/// Repository port for pricing run records.
///
/// Mutating operations return `None` when the run does not exist;
/// services translate that into a not-found error. Concurrent edits
/// follow last-write-wins at the storage layer.
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Creates a new draft run with empty answers.
    async fn create_run(&self, input: CreateRunInput) -> AppResult<PricingRun>;

    /// Returns one run by id.
    async fn find_run(&self, run_id: &str) -> AppResult<Option<PricingRun>>;

    /// Replaces the run's whole answer mapping.
    async fn replace_answers(&self, run_id: &str, answers: Value)
    -> AppResult<Option<PricingRun>>;

    /// Overwrites the run's breakdown and total.
    async fn save_breakdown(
        &self,
        run_id: &str,
        input: SaveBreakdownInput,
    ) -> AppResult<Option<PricingRun>>;

    /// Marks the run submitted at the given time.
    async fn mark_submitted(
        &self,
        run_id: &str,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<Option<PricingRun>>;
}
