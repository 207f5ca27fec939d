use std::sync::Arc;
use std::time::Duration;

use crate::config::TaxonomySet;
use crate::domain::ai::{MoodClassifier, SharedEmbeddingProvider};
use crate::domain::category::CategoryService;
use crate::domain::content::SharedContentRepository;
use crate::domain::health::HealthService;
use crate::domain::mood::MoodService;

#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<CategoryService>,
    pub mood_service: Arc<MoodService>,
    pub contents: SharedContentRepository,
    pub health: Arc<HealthService>,
}

impl AppState {
    /// 서비스 그래프를 조립합니다. 카테고리 캐시는 비어 있는 상태로 시작합니다.
    pub fn new(
        taxonomies: TaxonomySet,
        embeddings: SharedEmbeddingProvider,
        classifier: Arc<dyn MoodClassifier>,
        contents: SharedContentRepository,
        embed_timeout: Duration,
        classify_timeout: Duration,
    ) -> Self {
        let categories = Arc::new(CategoryService::new(
            taxonomies.emotion,
            taxonomies.situation,
            Arc::clone(&embeddings),
            embed_timeout,
        ));

        let mood_service = Arc::new(MoodService::new(
            classifier,
            Arc::clone(&categories),
            Arc::clone(&contents),
            classify_timeout,
        ));

        let health = Arc::new(HealthService::new(embeddings, Arc::clone(&categories)));

        Self {
            categories,
            mood_service,
            contents,
            health,
        }
    }
}
