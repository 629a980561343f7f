use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use quoterun_core::TenantId;

use crate::dto::{CreateRunRequest, PatchAnswersRequest, RunResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_run_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRunRequest>,
) -> ApiResult<(StatusCode, Json<RunResponse>)> {
    let run = state
        .run_service
        .create_run(
            payload.template_code.as_str(),
            payload.tenant_id.map(TenantId::from_uuid),
            payload.user_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RunResponse::from(run))))
}

pub async fn get_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> ApiResult<Json<RunResponse>> {
    let run = state.run_service.get_run(run_id.as_str()).await?;

    Ok(Json(RunResponse::from(run)))
}

pub async fn patch_answers_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
    Json(payload): Json<PatchAnswersRequest>,
) -> ApiResult<Json<RunResponse>> {
    let run = state
        .run_service
        .patch_answers(run_id.as_str(), payload.answers)
        .await?;

    Ok(Json(RunResponse::from(run)))
}

pub async fn price_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> ApiResult<Json<RunResponse>> {
    let run = state.pricing_service.price_run(run_id.as_str()).await?;

    Ok(Json(RunResponse::from(run)))
}

pub async fn submit_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> ApiResult<Json<RunResponse>> {
    let run = state.run_service.submit(run_id.as_str()).await?;

    Ok(Json(RunResponse::from(run)))
}
