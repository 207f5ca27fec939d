use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use super::dto::{MoodRequest, MoodResponse, MoodSuccessResponse};
use crate::state::AppState;
use crate::utils::{AppError, BaseResponse, ErrorResponse};

/// 감정 분석 및 필사 문장 추천 API
///
/// 글에서 감정/상황을 뽑아 대표 카테고리로 정규화하고,
/// 어울리는 필사 문장 하나를 골라 반환합니다.
/// 분류나 정규화에 실패하면 "알 수 없음"으로 응답합니다.
#[utoipa::path(
    post,
    path = "/api/mood",
    tag = "Mood",
    request_body = MoodRequest,
    responses(
        (status = 200, description = "분석 성공", body = MoodSuccessResponse),
        (status = 400, description = "잘못된 요청 (빈 문장, 길이 초과, JSON 오류)", body = ErrorResponse)
    )
)]
pub async fn analyze_mood(
    State(state): State<AppState>,
    request: Result<Json<MoodRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<MoodResponse>>, AppError> {
    let Json(request) = request?;
    request.validate()?;

    let response = state.mood_service.analyze(&request.text).await?;

    Ok(Json(BaseResponse::success(response)))
}
