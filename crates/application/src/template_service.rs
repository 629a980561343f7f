use std::sync::Arc;

use quoterun_core::{AppError, AppResult};
use quoterun_domain::WizardSchema;

use crate::pricing_ports::TemplateRepository;

/// Template view with its schema normalized into canonical form.
///
/// Normalization happens on every load and is never written back;
/// the stored payload stays in whatever drifted shape it has.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTemplate {
    /// Unique template code.
    pub code: String,
    /// User-facing template name.
    pub name: String,
    /// Template version.
    pub version: i32,
    /// Whether the template accepts new runs.
    pub is_active: bool,
    /// Canonical schema, possibly with zero steps for malformed payloads.
    pub schema: WizardSchema,
}

/// Template lookup and normalization service.
#[derive(Clone)]
pub struct TemplateService {
    repository: Arc<dyn TemplateRepository>,
}

impl TemplateService {
    /// Creates a template service.
    #[must_use]
    pub fn new(repository: Arc<dyn TemplateRepository>) -> Self {
        Self { repository }
    }

    /// Returns one template by code with its normalized schema.
    pub async fn find_by_code(&self, code: &str) -> AppResult<NormalizedTemplate> {
        let template = self
            .repository
            .find_template(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("template '{code}' does not exist")))?;

        Ok(NormalizedTemplate {
            code: template.code().as_str().to_owned(),
            name: template.name().as_str().to_owned(),
            version: template.version(),
            is_active: template.is_active(),
            schema: template.normalized_schema(),
        })
    }

    /// Lists all templates with normalized schemas.
    pub async fn list(&self) -> AppResult<Vec<NormalizedTemplate>> {
        let templates = self.repository.list_templates().await?;

        Ok(templates
            .into_iter()
            .map(|template| NormalizedTemplate {
                code: template.code().as_str().to_owned(),
                name: template.name().as_str().to_owned(),
                version: template.version(),
                is_active: template.is_active(),
                schema: template.normalized_schema(),
            })
            .collect())
    }
}
