//! taxonomy 설정 로드.
//!
//! `TAXONOMY_PATH`의 JSON 파일, 없으면 빌드에 포함된 `config/taxonomy.json`을 읽습니다.

use std::path::Path;

use serde::Deserialize;

use crate::domain::category::{CategoryRecord, Taxonomy, TaxonomyError, TaxonomyKind};

const BUNDLED_TAXONOMY: &str = include_str!("../../config/taxonomy.json");

#[derive(Debug, thiserror::Error)]
pub enum TaxonomyLoadError {
    #[error("failed to read taxonomy file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed taxonomy json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] TaxonomyError),
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    emotion: Vec<CategoryRecord>,
    situation: Vec<CategoryRecord>,
}

/// 감정/상황 taxonomy 한 쌍
#[derive(Debug, Clone)]
pub struct TaxonomySet {
    pub emotion: Taxonomy,
    pub situation: Taxonomy,
}

impl TaxonomySet {
    pub fn from_json(json: &str) -> Result<Self, TaxonomyLoadError> {
        let file: TaxonomyFile = serde_json::from_str(json)?;
        Ok(Self {
            emotion: Taxonomy::new(TaxonomyKind::Emotion, file.emotion)?,
            situation: Taxonomy::new(TaxonomyKind::Situation, file.situation)?,
        })
    }

    pub fn bundled() -> Result<Self, TaxonomyLoadError> {
        Self::from_json(BUNDLED_TAXONOMY)
    }

    pub fn load(path: Option<&str>) -> Result<Self, TaxonomyLoadError> {
        match path {
            Some(path) => {
                let json =
                    std::fs::read_to_string(Path::new(path)).map_err(|source| {
                        TaxonomyLoadError::Read {
                            path: path.to_string(),
                            source,
                        }
                    })?;
                let set = Self::from_json(&json)?;
                tracing::info!(path, "Loaded taxonomy from file");
                Ok(set)
            }
            None => Self::bundled(),
        }
    }
}
