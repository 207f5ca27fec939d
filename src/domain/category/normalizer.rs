use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use utoipa::ToSchema;

use super::cache::CategoryCache;
use super::similarity::best_match;
use super::taxonomy::{Taxonomy, TaxonomyKind};
use crate::domain::ai::client::SharedEmbeddingProvider;

/// 카테고리를 결정하지 못했을 때 내려보내는 값
pub const UNKNOWN_LABEL: &str = "알 수 없음";

/// 분류기가 "모름"의 의미로 내보내는 값들
const UNKNOWN_SENTINELS: [&str; 2] = [UNKNOWN_LABEL, "unknown"];

/// 카테고리가 결정된 경로
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MatchSource {
    /// 대표 이름과 정확히 일치
    Canonical,
    /// 유의어와 정확히 일치
    Synonym,
    /// 임베딩 최근접 이웃
    Embedding,
}

/// 카테고리를 결정하지 못한 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UnresolvedReason {
    /// 빈 입력 또는 "모름" 값
    EmptyInput,
    /// 임베딩 호출 실패, 타임아웃, 비정상 응답
    ProviderFailure,
    /// 참조 임베딩이 하나도 없음
    ColdCache,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Matched {
        category: String,
        source: MatchSource,
        /// 임베딩 경로에서만 채워짐
        similarity: Option<f32>,
    },
    Unresolved(UnresolvedReason),
}

impl Normalized {
    fn exact(category: &str, source: MatchSource) -> Self {
        Normalized::Matched {
            category: category.to_string(),
            source,
            similarity: None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Normalized::Matched { category, .. } => Some(category),
            Normalized::Unresolved(_) => None,
        }
    }

    /// 외부로 내보낼 라벨. 결정하지 못했으면 [`UNKNOWN_LABEL`].
    pub fn label(&self) -> &str {
        self.category().unwrap_or(UNKNOWN_LABEL)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Normalized::Unresolved(_))
    }
}

fn is_sentinel(term: &str) -> bool {
    UNKNOWN_SENTINELS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(term))
}

/// 자유 텍스트 라벨을 taxonomy의 대표 카테고리 중 하나로 정규화합니다.
pub struct CategoryNormalizer {
    taxonomy: Taxonomy,
    cache: CategoryCache,
    provider: SharedEmbeddingProvider,
    embed_timeout: Duration,
}

impl CategoryNormalizer {
    pub fn new(
        taxonomy: Taxonomy,
        provider: SharedEmbeddingProvider,
        embed_timeout: Duration,
    ) -> Self {
        Self {
            taxonomy,
            cache: CategoryCache::new(),
            provider,
            embed_timeout,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn cache(&self) -> &CategoryCache {
        &self.cache
    }

    /// 캐시를 미리 채웁니다. 실패해도 첫 정규화 요청에서 다시 시도합니다.
    pub async fn warm_up(&self) -> usize {
        self.cache
            .ensure_filled(&self.taxonomy, self.provider.as_ref(), self.embed_timeout)
            .await
    }

    pub async fn normalize(&self, term: &str) -> Normalized {
        let kind = self.taxonomy.kind();
        let term = term.trim();

        if term.is_empty() || is_sentinel(term) {
            return Normalized::Unresolved(UnresolvedReason::EmptyInput);
        }

        if let Some(category) = self.taxonomy.find_canonical(term) {
            tracing::debug!(taxonomy = %kind, term, "Canonical match");
            return Normalized::exact(category.name(), MatchSource::Canonical);
        }

        if let Some(category) = self.taxonomy.find_by_synonym(term) {
            tracing::debug!(taxonomy = %kind, term, category = category.name(), "Synonym match");
            return Normalized::exact(category.name(), MatchSource::Synonym);
        }

        let cached = self.cache.len().await;
        if cached == 0 {
            if self.warm_up().await == 0 {
                tracing::warn!(taxonomy = %kind, term, "No category embeddings available");
                return Normalized::Unresolved(UnresolvedReason::ColdCache);
            }
        } else if cached < self.taxonomy.len() {
            // 빈 카테고리는 쿨다운마다 한 번만 다시 시도하고, 있는 항목으로 바로 비교
            self.cache
                .retry_missing(&self.taxonomy, self.provider.as_ref(), self.embed_timeout)
                .await;
        }

        let query = match tokio::time::timeout(self.embed_timeout, self.provider.embed(term)).await
        {
            Ok(Ok(vector)) if !vector.is_empty() => vector,
            Ok(Ok(_)) => {
                tracing::warn!(taxonomy = %kind, term, "Empty term embedding");
                return Normalized::Unresolved(UnresolvedReason::ProviderFailure);
            }
            Ok(Err(e)) => {
                tracing::warn!(taxonomy = %kind, term, error = %e, "Term embedding failed");
                return Normalized::Unresolved(UnresolvedReason::ProviderFailure);
            }
            Err(_) => {
                tracing::warn!(taxonomy = %kind, term, "Term embedding timed out");
                return Normalized::Unresolved(UnresolvedReason::ProviderFailure);
            }
        };

        let references = self.cache.snapshot(&self.taxonomy).await;
        let candidates = references
            .iter()
            .map(|(name, vector)| (name.as_str(), &vector[..]));

        match best_match(&query, candidates) {
            Some((category, similarity)) => {
                tracing::debug!(taxonomy = %kind, term, category, similarity, "Embedding match");
                Normalized::Matched {
                    category: category.to_string(),
                    source: MatchSource::Embedding,
                    similarity: Some(similarity),
                }
            }
            None => {
                tracing::warn!(taxonomy = %kind, term, "No comparable category embedding");
                Normalized::Unresolved(UnresolvedReason::ProviderFailure)
            }
        }
    }
}

/// 감정/상황 두 taxonomy의 정규화기 묶음
pub struct CategoryService {
    emotion: CategoryNormalizer,
    situation: CategoryNormalizer,
}

impl CategoryService {
    pub fn new(
        emotion: Taxonomy,
        situation: Taxonomy,
        provider: SharedEmbeddingProvider,
        embed_timeout: Duration,
    ) -> Self {
        Self {
            emotion: CategoryNormalizer::new(emotion, Arc::clone(&provider), embed_timeout),
            situation: CategoryNormalizer::new(situation, provider, embed_timeout),
        }
    }

    pub fn normalizer(&self, kind: TaxonomyKind) -> &CategoryNormalizer {
        match kind {
            TaxonomyKind::Emotion => &self.emotion,
            TaxonomyKind::Situation => &self.situation,
        }
    }

    pub async fn normalize(&self, term: &str, kind: TaxonomyKind) -> Normalized {
        self.normalizer(kind).normalize(term).await
    }

    /// 두 캐시를 병렬로 미리 채웁니다.
    pub async fn warm_up(&self) {
        let (emotion, situation) = tokio::join!(self.emotion.warm_up(), self.situation.warm_up());
        tracing::info!(
            emotion_cached = emotion,
            emotion_total = self.emotion.taxonomy().len(),
            situation_cached = situation,
            situation_total = self.situation.taxonomy().len(),
            "Category embedding warm-up finished"
        );
    }
}
