//! Storage adapters implementing the application ports.

#![forbid(unsafe_code)]

mod in_memory_catalog_repository;
mod in_memory_run_repository;
mod in_memory_template_repository;
mod postgres_catalog_repository;
mod postgres_run_repository;
mod postgres_template_repository;

pub use in_memory_catalog_repository::InMemoryCatalogRepository;
pub use in_memory_run_repository::InMemoryRunRepository;
pub use in_memory_template_repository::InMemoryTemplateRepository;
pub use postgres_catalog_repository::PostgresCatalogRepository;
pub use postgres_run_repository::PostgresRunRepository;
pub use postgres_template_repository::PostgresTemplateRepository;
