//! Ports and records shared by the pricing application services.

mod repository;
mod runs;

pub use repository::{CatalogRepository, RunRepository, TemplateRepository};
pub use runs::{CreateRunInput, PricingRun, RunStatus, SaveBreakdownInput};
