use std::collections::HashMap;

use async_trait::async_trait;
use quoterun_application::CatalogRepository;
use quoterun_core::AppResult;
use quoterun_domain::CatalogItem;
use tokio::sync::RwLock;

/// In-memory catalog repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryCatalogRepository {
    items: RwLock<HashMap<String, CatalogItem>>,
}

impl InMemoryCatalogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
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
