use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 분류 차원
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    /// 감정 (기쁨, 슬픔, ...)
    Emotion,
    /// 상황 (직장, 연애, ...)
    Situation,
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxonomyKind::Emotion => write!(f, "emotion"),
            TaxonomyKind::Situation => write!(f, "situation"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("{kind} taxonomy has no categories")]
    Empty { kind: TaxonomyKind },
    #[error("{kind} taxonomy has a blank category name")]
    BlankName { kind: TaxonomyKind },
    #[error("{kind} taxonomy defines '{name}' more than once")]
    DuplicateName { kind: TaxonomyKind, name: String },
}

/// 설정 파일에 기록된 카테고리 한 건
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryRecord {
    /// 대표 카테고리 이름
    pub name: String,
    /// 쉼표로 구분된 유의어 목록 (임베딩 시드 텍스트)
    pub keywords: String,
}

/// 검증을 마친 카테고리
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    keywords: String,
    synonyms: Vec<String>,
}

impl Category {
    fn from_record(record: CategoryRecord) -> Self {
        let synonyms = record
            .keywords
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            name: record.name.trim().to_string(),
            keywords: record.keywords,
            synonyms,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 카테고리 임베딩을 계산할 때 쓰는 원문 키워드
    pub fn seed_text(&self) -> &str {
        &self.keywords
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }
}

/// 순서가 있는 카테고리 집합. 이름은 taxonomy 안에서 유일합니다.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    kind: TaxonomyKind,
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(kind: TaxonomyKind, records: Vec<CategoryRecord>) -> Result<Self, TaxonomyError> {
        if records.is_empty() {
            return Err(TaxonomyError::Empty { kind });
        }

        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(records.len());
        for record in records {
            let category = Category::from_record(record);
            if category.name.is_empty() {
                return Err(TaxonomyError::BlankName { kind });
            }
            if !seen.insert(category.name.clone()) {
                return Err(TaxonomyError::DuplicateName {
                    kind,
                    name: category.name,
                });
            }
            categories.push(category);
        }

        Ok(Self { kind, categories })
    }

    pub fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// 대표 이름과 정확히 일치하는 카테고리 (대소문자 구분)
    pub fn find_canonical(&self, term: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == term)
    }

    /// 유의어와 정확히 일치하는 첫 번째 카테고리
    pub fn find_by_synonym(&self, term: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.synonyms.iter().any(|s| s == term))
    }
}
