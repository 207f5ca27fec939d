use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 감정 분석 요청 DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodRequest {
    /// 오늘의 기분을 적은 글 (1 ~ 2000자)
    #[validate(length(
        min = 1,
        max = 2000,
        message = "문장은 1자 이상 2000자 이하여야 합니다"
    ))]
    #[schema(example = "회사에서 야근을 하고 와서 너무 힘들었다")]
    pub text: String,
}

/// 감정 분석 응답 DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodResponse {
    /// 분석된 감정 (실패 시 "알 수 없음")
    #[schema(example = "피곤")]
    pub emotion: String,
    /// 분석된 상황 (실패 시 "알 수 없음")
    #[schema(example = "직장")]
    pub situation: String,
    /// 격려 필사 문장 (없으면 빈 문자열)
    pub encouragement: String,
    /// "작품 제목, 작가" (없으면 빈 문자열)
    pub source: String,
}

/// 감정 분석 성공 응답 (OpenAPI 스키마용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodSuccessResponse {
    #[schema(example = true)]
    pub is_success: bool,
    #[schema(example = "COMMON200")]
    pub code: String,
    #[schema(example = "성공입니다.")]
    pub message: String,
    pub result: MoodResponse,
}
