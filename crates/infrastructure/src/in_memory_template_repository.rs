use std::collections::HashMap;

use async_trait::async_trait;
use quoterun_application::TemplateRepository;
use quoterun_core::AppResult;
use quoterun_domain::WizardTemplate;
use tokio::sync::RwLock;

/// In-memory template repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryTemplateRepository {
    templates: RwLock<HashMap<String, WizardTemplate>>,
}

impl InMemoryTemplateRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
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
        let templates = self.templates.read().await;

        let mut values: Vec<WizardTemplate> = templates.values().cloned().collect();
        values.sort_by(|left, right| left.code().as_str().cmp(right.code().as_str()));

        Ok(values)
    }
}
