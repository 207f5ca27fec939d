use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::normalizer::{MatchSource, Normalized, UnresolvedReason};
use super::taxonomy::TaxonomyKind;

/// 카테고리 정규화 요청 DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeRequest {
    /// 정규화할 라벨 (최대 200자)
    #[validate(length(max = 200, message = "라벨은 200자 이하여야 합니다"))]
    #[schema(example = "환희")]
    pub term: String,

    /// 대상 taxonomy (emotion 또는 situation)
    pub taxonomy: TaxonomyKind,
}

/// 카테고리 정규화 응답 DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeResponse {
    /// 결정된 카테고리 (실패 시 "알 수 없음")
    #[schema(example = "기쁨")]
    pub category: String,

    /// 결정 경로 (실패 시 없음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<MatchSource>,

    /// 임베딩 경로의 코사인 유사도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,

    /// 결정하지 못한 이유
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_reason: Option<UnresolvedReason>,
}

impl From<Normalized> for NormalizeResponse {
    fn from(normalized: Normalized) -> Self {
        let category = normalized.label().to_string();
        match normalized {
            Normalized::Matched {
                source, similarity, ..
            } => Self {
                category,
                matched_by: Some(source),
                similarity,
                unresolved_reason: None,
            },
            Normalized::Unresolved(reason) => Self {
                category,
                matched_by: None,
                similarity: None,
                unresolved_reason: Some(reason),
            },
        }
    }
}

/// 카테고리 정규화 성공 응답 (OpenAPI 스키마용)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeSuccessResponse {
    #[schema(example = true)]
    pub is_success: bool,
    #[schema(example = "COMMON200")]
    pub code: String,
    #[schema(example = "성공입니다.")]
    pub message: String,
    pub result: NormalizeResponse,
}
