use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::response::ErrorResponse;

/// 애플리케이션 전역 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("잘못된 요청 형식입니다: {0}")]
    JsonParseFailed(String),
    #[error("{0}")]
    InternalError(String),
    #[error("데이터베이스 에러: {0}")]
    DatabaseError(String),

    /// OpenAI 인증 실패 (API 키 오류)
    #[error("OpenAI 인증에 실패했습니다.")]
    OpenAiAuthError,
    /// OpenAI 호출 한도 초과
    #[error("OpenAI 호출 한도를 초과했습니다.")]
    OpenAiRateLimitError,
    /// 타임아웃, 연결 실패, 5xx 등 일시적 오류
    #[error("OpenAI 서버가 일시적으로 응답하지 않습니다.")]
    OpenAiTemporaryError,
    #[error("OpenAI 에러: {0}")]
    OpenAiError(String),
    /// 모델 응답을 해석할 수 없음
    #[error("AI 응답 파싱 실패: {0}")]
    AiResponseParseError(String),
}

impl AppError {
    /// 클라이언트에 노출할 에러 메시지
    pub fn message(&self) -> String {
        match self {
            AppError::InternalError(_) | AppError::DatabaseError(_) => {
                "서버 에러, 관리자에게 문의 바랍니다.".to_string()
            }
            AppError::OpenAiAuthError
            | AppError::OpenAiRateLimitError
            | AppError::OpenAiTemporaryError
            | AppError::OpenAiError(_)
            | AppError::AiResponseParseError(_) => "AI 서비스 호출에 실패했습니다.".to_string(),
            other => other.to_string(),
        }
    }

    /// 에러 코드 반환
    pub fn error_code(&self) -> String {
        match self {
            AppError::ValidationError(_) => "COMMON400",
            AppError::JsonParseFailed(_) => "COMMON400",
            AppError::InternalError(_) => "COMMON500",
            AppError::DatabaseError(_) => "COMMON500",
            AppError::OpenAiAuthError => "AI_001",
            AppError::OpenAiRateLimitError => "AI_002",
            AppError::OpenAiTemporaryError => "AI_003",
            AppError::OpenAiError(_) => "AI_004",
            AppError::AiResponseParseError(_) => "AI_005",
        }
        .to_string()
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::JsonParseFailed(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::OpenAiRateLimitError => StatusCode::TOO_MANY_REQUESTS,
            AppError::OpenAiAuthError
            | AppError::OpenAiTemporaryError
            | AppError::OpenAiError(_)
            | AppError::AiResponseParseError(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            error!(code = %error_code, error = %self, "Server error");
        } else {
            tracing::warn!(code = %error_code, error = %self, "Client error");
        }

        let error_response = ErrorResponse::new(error_code, self.message());

        (status, Json(error_response)).into_response()
    }
}

/// JsonRejection을 AppError로 변환
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| errors.to_string());
        AppError::ValidationError(message)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

/// 편의 함수들
impl AppError {
    pub fn internal_error(msg: impl Into<String>) -> Self {
        AppError::InternalError(msg.into())
    }

    pub fn validation_error(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }
}
