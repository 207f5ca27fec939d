use serde::Serialize;
use utoipa::ToSchema;

use super::repository::Content;

/// 필사 문장 응답 DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// 필사 문장
    #[schema(example = "그래도 살아가는 것이다.")]
    pub sentence: String,
    /// 작가
    #[schema(example = "작가 이름")]
    pub author: String,
    /// 작품 제목
    #[schema(example = "작품 제목")]
    pub title: String,
}

impl From<Content> for ContentItem {
    fn from(content: Content) -> Self {
        Self {
            sentence: content.sentence,
            author: content.author,
            title: content.title,
        }
    }
}

/// 감정별 필사 문장 목록 성공 응답 (OpenAPI 스키마용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentListSuccessResponse {
    #[schema(example = true)]
    pub is_success: bool,
    #[schema(example = "COMMON200")]
    pub code: String,
    #[schema(example = "성공입니다.")]
    pub message: String,
    pub result: Vec<ContentItem>,
}
