//! 통합 테스트용 스텁

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use mood_server::config::TaxonomySet;
use mood_server::domain::ai::{EmbeddingProvider, MoodClassifier, RawClassification};
use mood_server::domain::content::{Content, ContentRepository};
use mood_server::utils::AppError;

/// 입력 문자열별로 미리 정한 벡터를 돌려주는 임베딩 제공자. 호출 횟수를 셉니다.
#[derive(Default)]
pub struct StubEmbeddings {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Option<Vec<f32>>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl StubEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    /// 등록되지 않은 입력에 쓸 벡터
    pub fn with_fallback(mut self, vector: Vec<f32>) -> Self {
        self.fallback = Some(vector);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// taxonomy의 i번째 카테고리 키워드를 i번째 단위 벡터에 대응시킵니다.
    pub fn orthogonal(set: &TaxonomySet) -> Self {
        let mut stub = Self::new();
        for taxonomy in [&set.emotion, &set.situation] {
            let dim = taxonomy.len();
            for (i, category) in taxonomy.categories().iter().enumerate() {
                stub = stub.with(category.seed_text(), unit(dim, i));
            }
        }
        stub
    }

    pub fn calls_for(&self, text: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(text)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for StubEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .calls
            .lock()
            .unwrap()
            .entry(text.to_string())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.vectors
            .get(text)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or(AppError::OpenAiTemporaryError)
    }
}

/// 항상 실패하는 임베딩 제공자
#[derive(Default)]
pub struct FailingEmbeddings {
    calls: AtomicUsize,
}

impl FailingEmbeddings {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FailingEmbeddings {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::OpenAiTemporaryError)
    }
}

/// 고정된 라벨을 돌려주거나 실패하는 분류기
pub struct StubClassifier {
    answer: Option<RawClassification>,
}

impl StubClassifier {
    pub fn answering(emotion: &str, situation: &str) -> Self {
        Self {
            answer: Some(RawClassification {
                emotion: emotion.to_string(),
                situation: situation.to_string(),
            }),
        }
    }

    pub fn failing() -> Self {
        Self { answer: None }
    }
}

#[async_trait::async_trait]
impl MoodClassifier for StubClassifier {
    async fn classify(&self, _text: &str) -> Result<RawClassification, AppError> {
        self.answer.clone().ok_or(AppError::OpenAiAuthError)
    }
}

/// 항상 DB 에러를 내는 저장소
pub struct BrokenRepository;

#[async_trait::async_trait]
impl ContentRepository for BrokenRepository {
    async fn find_by_emotion(&self, _emotion: &str) -> Result<Vec<Content>, AppError> {
        Err(AppError::DatabaseError("connection refused".to_string()))
    }

    async fn find_for_mood(
        &self,
        _emotion: Option<&str>,
        _situation: Option<&str>,
    ) -> Result<Vec<Content>, AppError> {
        Err(AppError::DatabaseError("connection refused".to_string()))
    }
}

pub fn unit(dim: usize, index: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[index] = 1.0;
    v
}

pub fn taxonomies() -> TaxonomySet {
    TaxonomySet::bundled().unwrap()
}

pub fn content(id: i64, sentence: &str, emotion: &str, situation: Option<&str>) -> Content {
    Content {
        id,
        sentence: sentence.to_string(),
        author: "한강".to_string(),
        title: "소년이 온다".to_string(),
        emotion: emotion.to_string(),
        situation: situation.map(str::to_string),
    }
}
