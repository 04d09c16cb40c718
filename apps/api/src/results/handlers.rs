use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::result::CandidateResult;
use crate::results::{ResultQuery, ResultSummary};
use crate::state::AppState;

/// GET /api/v1/results?search=&sort_by=score|name&sort_order=asc|desc
pub async fn handle_list_results(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Json<Vec<ResultSummary>> {
    Json(state.sessions.list_results(&query).await)
}

/// GET /api/v1/results/:id
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateResult>, AppError> {
    Ok(Json(state.sessions.get_result(id).await?))
}
