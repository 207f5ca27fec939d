//! 카테고리 임베딩 캐시.
//!
//! 카테고리 이름 → 키워드 임베딩. 한 번 기록된 항목은 프로세스가 끝날 때까지
//! 다시 계산되거나 무효화되지 않습니다. 채우기는 taxonomy별로 한 번에 하나만
//! 실행되며, 채우기를 기다리던 요청은 그 결과를 그대로 사용합니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::{Mutex, RwLock};

use super::taxonomy::{Category, Taxonomy};
use crate::domain::ai::client::EmbeddingProvider;

pub type Embedding = Arc<[f32]>;

/// 일부만 채워진 캐시의 빈 카테고리를 다시 임베딩하기까지의 최소 간격
pub const RETRY_COOLDOWN: Duration = Duration::from_secs(30);

pub struct CategoryCache {
    vectors: RwLock<HashMap<String, Embedding>>,
    /// 마지막 채우기 시도 시각
    fill_lock: Mutex<Option<Instant>>,
    /// 끝난 채우기 시도 횟수
    fills: AtomicU64,
    retry_cooldown: Duration,
}

impl Default for CategoryCache {
    fn default() -> Self {
        Self::with_retry_cooldown(RETRY_COOLDOWN)
    }
}

impl CategoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retry_cooldown(retry_cooldown: Duration) -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
            fill_lock: Mutex::new(None),
            fills: AtomicU64::new(0),
            retry_cooldown,
        }
    }

    pub async fn get(&self, name: &str) -> Option<Embedding> {
        self.vectors.read().await.get(name).cloned()
    }

    /// 항목을 추가합니다. 이미 있는 이름이면 기존 값을 유지합니다.
    pub async fn put(&self, name: &str, vector: Vec<f32>) {
        self.vectors
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| Arc::from(vector));
    }

    pub async fn len(&self) -> usize {
        self.vectors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.vectors.read().await.is_empty()
    }

    /// taxonomy 선언 순서대로 캐시된 (이름, 벡터) 목록
    pub async fn snapshot(&self, taxonomy: &Taxonomy) -> Vec<(String, Embedding)> {
        let vectors = self.vectors.read().await;
        taxonomy
            .categories()
            .iter()
            .filter_map(|c| {
                vectors
                    .get(c.name())
                    .map(|v| (c.name().to_string(), Arc::clone(v)))
            })
            .collect()
    }

    /// 아직 캐시에 없는 카테고리를 모두 임베딩합니다.
    ///
    /// 다른 요청이 채우는 중이면 기다렸다가 그 결과를 사용하고 다시 호출하지 않습니다.
    /// 실패한 카테고리는 비워 두며 에러는 밖으로 전파하지 않습니다.
    /// 채운 뒤 캐시에 있는 항목 수를 반환합니다.
    pub async fn ensure_filled(
        &self,
        taxonomy: &Taxonomy,
        provider: &dyn EmbeddingProvider,
        timeout: Duration,
    ) -> usize {
        let seen = self.fills.load(Ordering::Acquire);
        let mut last_fill = self.fill_lock.lock().await;
        if self.fills.load(Ordering::Acquire) != seen {
            return self.len().await;
        }

        self.fill_missing(&mut last_fill, taxonomy, provider, timeout)
            .await
    }

    /// 일부만 채워진 캐시의 빈 카테고리를 다시 시도합니다.
    ///
    /// 채우기가 진행 중이거나 마지막 시도 후 쿨다운이 지나지 않았으면 기다리지 않고 건너뜁니다.
    pub async fn retry_missing(
        &self,
        taxonomy: &Taxonomy,
        provider: &dyn EmbeddingProvider,
        timeout: Duration,
    ) -> usize {
        let Ok(mut last_fill) = self.fill_lock.try_lock() else {
            return self.len().await;
        };
        if (*last_fill).is_some_and(|at| at.elapsed() < self.retry_cooldown) {
            return self.len().await;
        }

        self.fill_missing(&mut last_fill, taxonomy, provider, timeout)
            .await
    }

    /// 빈 카테고리를 동시에 임베딩합니다. 전체 소요 시간은 `timeout` 하나로 묶입니다.
    async fn fill_missing(
        &self,
        last_fill: &mut Option<Instant>,
        taxonomy: &Taxonomy,
        provider: &dyn EmbeddingProvider,
        timeout: Duration,
    ) -> usize {
        let missing: Vec<&Category> = {
            let vectors = self.vectors.read().await;
            taxonomy
                .categories()
                .iter()
                .filter(|c| !vectors.contains_key(c.name()))
                .collect()
        };

        if missing.is_empty() {
            return self.len().await;
        }

        tracing::debug!(
            taxonomy = %taxonomy.kind(),
            missing = missing.len(),
            "Filling category embedding cache"
        );

        let attempts = missing
            .iter()
            .map(|category| self.embed_one(taxonomy, category, provider));
        let failed = match tokio::time::timeout(timeout, join_all(attempts)).await {
            Ok(results) => results.into_iter().filter(|ok| !ok).count(),
            Err(_) => {
                tracing::warn!(
                    taxonomy = %taxonomy.kind(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Category embedding fill timed out"
                );
                missing.len()
            }
        };

        *last_fill = Some(Instant::now());
        self.fills.fetch_add(1, Ordering::Release);

        let cached = self.len().await;
        if cached == taxonomy.len() {
            tracing::info!(taxonomy = %taxonomy.kind(), cached, "Category embedding cache filled");
        } else {
            tracing::warn!(
                taxonomy = %taxonomy.kind(),
                cached,
                failed,
                "Category embedding cache partially filled"
            );
        }
        cached
    }

    async fn embed_one(
        &self,
        taxonomy: &Taxonomy,
        category: &Category,
        provider: &dyn EmbeddingProvider,
    ) -> bool {
        match provider.embed(category.seed_text()).await {
            Ok(vector) if !vector.is_empty() => {
                self.put(category.name(), vector).await;
                true
            }
            Ok(_) => {
                tracing::warn!(
                    taxonomy = %taxonomy.kind(),
                    category = category.name(),
                    "Provider returned an empty embedding"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    taxonomy = %taxonomy.kind(),
                    category = category.name(),
                    error = %e,
                    "Failed to embed category keywords"
                );
                false
            }
        }
    }
}
