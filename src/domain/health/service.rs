use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::time::timeout;

use super::dto::{CacheCheck, CheckResult, HealthChecks, HealthState, HealthStatus};
use crate::domain::ai::SharedEmbeddingProvider;
use crate::domain::category::{CategoryService, TaxonomyKind};

/// 서버 시작 시간 (전역)
static START_TIME: OnceLock<Instant> = OnceLock::new();

/// 헬스체크 타임아웃 (5초)
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Degraded 상태 임계값 (2초)
const DEGRADED_THRESHOLD: Duration = Duration::from_secs(2);

/// 캐시 유효 시간 (30초)
const CACHE_DURATION: Duration = Duration::from_secs(30);

/// 헬스체크용 임베딩 입력
const HEALTH_CHECK_TEXT: &str = "health";

/// 캐시된 헬스체크 결과
struct CachedCheck {
    result: CheckResult,
    cached_at: Instant,
}

/// 서버 시작 시간 초기화
///
/// main 함수에서 서버 시작 시 호출해야 합니다.
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// 서버 가동 시간(초) 반환
pub fn get_uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// 임베딩 API와 카테고리 캐시 상태를 점검합니다.
pub struct HealthService {
    provider: SharedEmbeddingProvider,
    categories: Arc<CategoryService>,
    cached: RwLock<Option<CachedCheck>>,
}

impl HealthService {
    pub fn new(provider: SharedEmbeddingProvider, categories: Arc<CategoryService>) -> Self {
        Self {
            provider,
            categories,
            cached: RwLock::new(None),
        }
    }

    /// 전체 헬스 체크 수행 (OpenAI 체크는 캐싱 적용)
    pub async fn check(&self) -> HealthStatus {
        let openai_api = self.check_openai_cached().await;
        let emotion_cache = self.cache_check(TaxonomyKind::Emotion).await;
        let situation_cache = self.cache_check(TaxonomyKind::Situation).await;

        let status = determine_health_state(&openai_api, &[&emotion_cache, &situation_cache]);

        HealthStatus {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: get_uptime_secs(),
            checks: HealthChecks {
                openai_api,
                emotion_cache,
                situation_cache,
            },
        }
    }

    async fn cache_check(&self, kind: TaxonomyKind) -> CacheCheck {
        let normalizer = self.categories.normalizer(kind);
        CacheCheck {
            cached: normalizer.cache().len().await,
            total: normalizer.taxonomy().len(),
        }
    }

    async fn check_openai_cached(&self) -> CheckResult {
        {
            let cached = self.cached.read().await;
            if let Some(ref c) = *cached {
                if c.cached_at.elapsed() < CACHE_DURATION {
                    tracing::debug!(
                        cache_age_secs = c.cached_at.elapsed().as_secs(),
                        "Using cached health check result"
                    );
                    return c.result.clone();
                }
            }
        }

        tracing::debug!("Performing fresh health check");
        let result = self.check_openai_fresh().await;

        *self.cached.write().await = Some(CachedCheck {
            result: result.clone(),
            cached_at: Instant::now(),
        });

        result
    }

    /// 실제 임베딩 호출로 검증
    async fn check_openai_fresh(&self) -> CheckResult {
        let start = Instant::now();
        let result = timeout(HEALTH_CHECK_TIMEOUT, self.provider.embed(HEALTH_CHECK_TEXT)).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(_)) => {
                tracing::info!(latency_ms, "OpenAI health check passed");
                CheckResult::success(latency_ms)
            }
            Ok(Err(e)) => {
                tracing::warn!(latency_ms, error = %e, "OpenAI health check failed");
                CheckResult::failure(latency_ms, e.to_string())
            }
            Err(_) => {
                tracing::warn!("OpenAI health check timed out");
                CheckResult::timeout(latency_ms)
            }
        }
    }
}

fn determine_health_state(openai: &CheckResult, caches: &[&CacheCheck]) -> HealthState {
    if !openai.status {
        return HealthState::Unhealthy;
    }

    // 응답 시간이 2초 이상이면 Degraded
    if let Some(latency) = openai.latency_ms {
        if latency >= DEGRADED_THRESHOLD.as_millis() as u64 {
            return HealthState::Degraded;
        }
    }

    if caches.iter().any(|c| !c.is_complete()) {
        return HealthState::Degraded;
    }

    HealthState::Healthy
}
