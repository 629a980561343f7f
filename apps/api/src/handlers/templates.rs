use axum::Json;
use axum::extract::{Path, State};

use crate::dto::TemplateResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_templates_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TemplateResponse>>> {
    let templates = state
        .template_service
        .list()
        .await?
        .into_iter()
        .map(TemplateResponse::from)
        .collect();

    Ok(Json(templates))
}

pub async fn get_template_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<TemplateResponse>> {
    let template = state.template_service.find_by_code(code.as_str()).await?;

    Ok(Json(TemplateResponse::from(template)))
}
