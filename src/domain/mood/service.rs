use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;

use super::dto::MoodResponse;
use crate::domain::ai::{MoodClassifier, RawClassification};
use crate::domain::category::{CategoryService, TaxonomyKind};
use crate::domain::content::{Content, SharedContentRepository};
use crate::utils::error::AppError;

/// 글 → 감정/상황 → 필사 문장
pub struct MoodService {
    classifier: Arc<dyn MoodClassifier>,
    categories: Arc<CategoryService>,
    contents: SharedContentRepository,
    classify_timeout: Duration,
}

impl MoodService {
    pub fn new(
        classifier: Arc<dyn MoodClassifier>,
        categories: Arc<CategoryService>,
        contents: SharedContentRepository,
        classify_timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            categories,
            contents,
            classify_timeout,
        }
    }

    pub async fn analyze(&self, text: &str) -> Result<MoodResponse, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation_error("문장을 입력해주세요"));
        }

        let raw = self.classify(text).await;

        let (emotion, situation) = tokio::join!(
            self.categories.normalize(&raw.emotion, TaxonomyKind::Emotion),
            self.categories.normalize(&raw.situation, TaxonomyKind::Situation),
        );

        tracing::info!(
            raw_emotion = %raw.emotion,
            raw_situation = %raw.situation,
            emotion = emotion.label(),
            situation = situation.label(),
            "Mood classified"
        );

        let content = self
            .pick_content(emotion.category(), situation.category())
            .await;

        let (encouragement, source) = match content {
            Some(content) => (
                content.sentence,
                format!("{}, {}", content.title, content.author),
            ),
            None => (String::new(), String::new()),
        };

        Ok(MoodResponse {
            emotion: emotion.label().to_string(),
            situation: situation.label().to_string(),
            encouragement,
            source,
        })
    }

    /// 분류 실패나 타임아웃은 두 라벨 모두 빈 값으로 처리합니다.
    async fn classify(&self, text: &str) -> RawClassification {
        match tokio::time::timeout(self.classify_timeout, self.classifier.classify(text)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Mood classification failed");
                RawClassification::default()
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.classify_timeout.as_millis() as u64,
                    "Mood classification timed out"
                );
                RawClassification::default()
            }
        }
    }

    async fn pick_content(
        &self,
        emotion: Option<&str>,
        situation: Option<&str>,
    ) -> Option<Content> {
        let candidates = match self.contents.find_for_mood(emotion, situation).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(error = %e, ?emotion, ?situation, "Failed to fetch contents");
                return None;
            }
        };

        if candidates.is_empty() {
            tracing::info!(?emotion, ?situation, "No content found for mood");
            return None;
        }

        candidates.choose(&mut rand::thread_rng()).cloned()
    }
}
