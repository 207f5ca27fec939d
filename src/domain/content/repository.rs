use std::path::Path;
use std::sync::Arc;

use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use super::entity::{self, Column, Entity};
use crate::utils::error::AppError;

/// 필사 문장 한 건
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Content {
    pub id: i64,
    pub sentence: String,
    pub author: String,
    pub title: String,
    pub emotion: String,
    pub situation: Option<String>,
}

impl From<entity::Model> for Content {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            sentence: model.sentence,
            author: model.author,
            title: model.title,
            emotion: model.emotion,
            situation: model.situation,
        }
    }
}

impl Content {
    fn situation_contains(&self, situation: &str) -> bool {
        self.situation
            .as_deref()
            .is_some_and(|tags| tags.contains(situation))
    }
}

/// 필사 문장 저장소
#[async_trait::async_trait]
pub trait ContentRepository: Send + Sync {
    /// 감정 태그가 정확히 일치하는 문장 전체
    async fn find_by_emotion(&self, emotion: &str) -> Result<Vec<Content>, AppError>;

    /// 감정 AND 상황으로 찾고, 없으면 감정 OR 상황으로 다시 찾습니다.
    ///
    /// 한쪽만 주어지면 그 조건만 사용하고, 둘 다 없으면 빈 목록입니다.
    async fn find_for_mood(
        &self,
        emotion: Option<&str>,
        situation: Option<&str>,
    ) -> Result<Vec<Content>, AppError>;
}

pub type SharedContentRepository = Arc<dyn ContentRepository>;

/// PostgreSQL(sea-orm) 저장소
#[derive(Clone)]
pub struct SeaOrmContentRepository {
    db: DatabaseConnection,
}

impl SeaOrmContentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_where(&self, condition: Condition) -> Result<Vec<Content>, AppError> {
        let models = Entity::find()
            .filter(condition)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Content::from).collect())
    }
}

#[async_trait::async_trait]
impl ContentRepository for SeaOrmContentRepository {
    async fn find_by_emotion(&self, emotion: &str) -> Result<Vec<Content>, AppError> {
        self.find_where(Condition::all().add(Column::Emotion.eq(emotion)))
            .await
    }

    async fn find_for_mood(
        &self,
        emotion: Option<&str>,
        situation: Option<&str>,
    ) -> Result<Vec<Content>, AppError> {
        match (emotion, situation) {
            (Some(emotion), Some(situation)) => {
                let both = self
                    .find_where(
                        Condition::all()
                            .add(Column::Emotion.eq(emotion))
                            .add(Column::Situation.contains(situation)),
                    )
                    .await?;
                if !both.is_empty() {
                    return Ok(both);
                }
                tracing::debug!(emotion, situation, "No exact mood match, widening to OR");
                self.find_where(
                    Condition::any()
                        .add(Column::Emotion.eq(emotion))
                        .add(Column::Situation.contains(situation)),
                )
                .await
            }
            (Some(emotion), None) => self.find_by_emotion(emotion).await,
            (None, Some(situation)) => {
                self.find_where(Condition::all().add(Column::Situation.contains(situation)))
                    .await
            }
            (None, None) => Ok(Vec::new()),
        }
    }
}

/// 메모리 저장소. `DATABASE_URL`이 없을 때와 테스트에서 사용합니다.
#[derive(Default)]
pub struct InMemoryContentRepository {
    contents: Vec<Content>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentSeedError {
    #[error("failed to read content seed file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed content seed json: {0}")]
    Parse(#[from] serde_json::Error),
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: Vec<Content>) -> Self {
        Self { contents }
    }

    /// `[{id, sentence, author, title, emotion, situation?}, ...]` 형식의 JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::with_contents(serde_json::from_str(json)?))
    }

    pub fn load(path: &str) -> Result<Self, ContentSeedError> {
        let json = std::fs::read_to_string(Path::new(path)).map_err(|source| {
            ContentSeedError::Read {
                path: path.to_string(),
                source,
            }
        })?;
        let repository = Self::from_json(&json)?;
        tracing::info!(path, contents = repository.len(), "Loaded content seed file");
        Ok(repository)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    fn filter<F>(&self, predicate: F) -> Vec<Content>
    where
        F: Fn(&Content) -> bool,
    {
        self.contents
            .iter()
            .filter(|c| predicate(c))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn find_by_emotion(&self, emotion: &str) -> Result<Vec<Content>, AppError> {
        Ok(self.filter(|c| c.emotion == emotion))
    }

    async fn find_for_mood(
        &self,
        emotion: Option<&str>,
        situation: Option<&str>,
    ) -> Result<Vec<Content>, AppError> {
        let found = match (emotion, situation) {
            (Some(emotion), Some(situation)) => {
                let both =
                    self.filter(|c| c.emotion == emotion && c.situation_contains(situation));
                if both.is_empty() {
                    self.filter(|c| c.emotion == emotion || c.situation_contains(situation))
                } else {
                    both
                }
            }
            (Some(emotion), None) => self.filter(|c| c.emotion == emotion),
            (None, Some(situation)) => self.filter(|c| c.situation_contains(situation)),
            (None, None) => Vec::new(),
        };
        Ok(found)
    }
}
