use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use super::dto::{NormalizeRequest, NormalizeResponse, NormalizeSuccessResponse};
use crate::state::AppState;
use crate::utils::{AppError, BaseResponse, ErrorResponse};

/// 카테고리 정규화
///
/// 임의의 감정/상황 라벨을 taxonomy의 대표 카테고리로 정규화합니다.
/// 임베딩 제공자가 실패해도 에러 대신 "알 수 없음"을 반환합니다.
#[utoipa::path(
    post,
    path = "/api/categories/normalize",
    tag = "Category",
    request_body = NormalizeRequest,
    responses(
        (status = 200, description = "정규화 성공", body = NormalizeSuccessResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse)
    )
)]
pub async fn normalize_category(
    State(state): State<AppState>,
    request: Result<Json<NormalizeRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<NormalizeResponse>>, AppError> {
    let Json(request) = request?;
    request.validate()?;

    let normalized = state
        .categories
        .normalize(&request.term, request.taxonomy)
        .await;

    tracing::info!(
        taxonomy = %request.taxonomy,
        category = normalized.label(),
        "Category normalized"
    );

    Ok(Json(BaseResponse::success(NormalizeResponse::from(
        normalized,
    ))))
}
