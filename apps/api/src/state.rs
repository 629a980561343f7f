use quoterun_application::{PricingService, RunService, TemplateService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub template_service: TemplateService,
    pub run_service: RunService,
    pub pricing_service: PricingService,
}
