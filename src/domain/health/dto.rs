use serde::Serialize;
use utoipa::ToSchema;

/// 전체 헬스 상태 응답
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// 서버 상태 (healthy/degraded/unhealthy)
    pub status: HealthState,
    /// 서버 버전
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// 서버 가동 시간 (초)
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    /// 의존성 체크 결과
    pub checks: HealthChecks,
}

/// 서버 상태
#[derive(Serialize, Debug, Clone, Copy, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// 정상 상태
    Healthy,
    /// 부분 장애 상태 (느린 임베딩 응답, 덜 채워진 카테고리 캐시)
    Degraded,
    /// 장애 상태
    Unhealthy,
}

/// 의존성 체크 결과 모음
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    /// OpenAI 임베딩 API 상태
    pub openai_api: CheckResult,
    /// 감정 카테고리 임베딩 캐시
    pub emotion_cache: CacheCheck,
    /// 상황 카테고리 임베딩 캐시
    pub situation_cache: CacheCheck,
}

/// 개별 체크 결과
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// 체크 성공 여부
    #[schema(example = true)]
    pub status: bool,
    /// 응답 지연 시간 (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 150)]
    pub latency_ms: Option<u64>,
    /// 에러 메시지 (실패 시)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn success(latency_ms: u64) -> Self {
        Self {
            status: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn failure(latency_ms: u64, error: String) -> Self {
        Self {
            status: false,
            latency_ms: Some(latency_ms),
            error: Some(error),
        }
    }

    pub fn timeout(latency_ms: u64) -> Self {
        Self {
            status: false,
            latency_ms: Some(latency_ms),
            error: Some("Timeout".to_string()),
        }
    }
}

/// 카테고리 임베딩 캐시 상태
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheCheck {
    /// 임베딩이 채워진 카테고리 수
    #[schema(example = 11)]
    pub cached: usize,
    /// taxonomy의 전체 카테고리 수
    #[schema(example = 11)]
    pub total: usize,
}

impl CacheCheck {
    pub fn is_complete(&self) -> bool {
        self.cached >= self.total
    }
}
