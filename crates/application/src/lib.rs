//! Application services and ports for the pricing wizard.

#![forbid(unsafe_code)]

mod pricing_ports;
mod pricing_service;
mod run_service;
mod template_service;

pub use pricing_ports::{
    CatalogRepository, CreateRunInput, PricingRun, RunRepository, RunStatus, SaveBreakdownInput,
    TemplateRepository,
};
pub use pricing_service::PricingService;
pub use run_service::RunService;
pub use template_service::{NormalizedTemplate, TemplateService};
