use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{ContentItem, ContentListSuccessResponse};
use crate::state::AppState;
use crate::utils::{AppError, BaseResponse, ErrorResponse};

/// 감정별 필사 문장 조회 API
#[utoipa::path(
    get,
    path = "/api/contents_by_emotion/{emotion}",
    tag = "Content",
    params(
        ("emotion" = String, Path, description = "대표 감정 카테고리", example = "슬픔")
    ),
    responses(
        (status = 200, description = "조회 성공", body = ContentListSuccessResponse),
        (status = 500, description = "데이터 조회 중 오류 발생", body = ErrorResponse)
    )
)]
pub async fn contents_by_emotion(
    State(state): State<AppState>,
    Path(emotion): Path<String>,
) -> Result<Json<BaseResponse<Vec<ContentItem>>>, AppError> {
    let contents = state.contents.find_by_emotion(&emotion).await?;

    tracing::info!(emotion = %emotion, count = contents.len(), "Contents fetched by emotion");

    Ok(Json(BaseResponse::success(
        contents.into_iter().map(ContentItem::from).collect(),
    )))
}
