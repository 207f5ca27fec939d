use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::taxonomy::{TaxonomyLoadError, TaxonomySet};

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,

    // AI Service
    pub openai_api_key: String,
    pub chat_model: String,
    pub embedding_model: String,

    /// 없으면 인메모리 저장소 사용
    pub database_url: Option<String>,
    /// 없으면 내장 taxonomy 사용
    pub taxonomy_path: Option<String>,
    /// 인메모리 저장소에 채울 필사 문장 JSON. DATABASE_URL이 있으면 무시
    pub seed_contents_path: Option<String>,

    pub embed_timeout: Duration,
    pub classify_timeout: Duration,
    pub request_timeout: Duration,

    /// 빌드된 프론트엔드 경로 (SPA 서빙)
    pub static_dir: Option<String>,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = parse_var("SERVER_PORT", 8080u16, ConfigError::InvalidPort)?;

        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
            tracing::warn!(
                "OPENAI_API_KEY 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
            );
            "test-key".to_string()
        });

        let chat_model = env::var("OPENAI_CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let embedding_model = env::var("OPENAI_EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());

        let database_url = non_empty_var("DATABASE_URL");
        let seed_contents_path = non_empty_var("SEED_CONTENTS_PATH");
        if database_url.is_none() {
            match seed_contents_path.as_deref() {
                Some(path) => tracing::warn!(
                    path,
                    "DATABASE_URL이 설정되지 않아 SEED_CONTENTS_PATH 파일로 인메모리 저장소를 채웁니다."
                ),
                None => tracing::warn!(
                    "DATABASE_URL과 SEED_CONTENTS_PATH가 모두 없어 필사 문장 저장소가 비어 있습니다. 추천 문장은 항상 빈 값으로 응답합니다."
                ),
            }
        }

        let embed_timeout = Duration::from_millis(parse_var(
            "EMBED_TIMEOUT_MS",
            10_000u64,
            ConfigError::InvalidTimeout("EMBED_TIMEOUT_MS"),
        )?);
        let classify_timeout = Duration::from_millis(parse_var(
            "CLASSIFY_TIMEOUT_MS",
            25_000u64,
            ConfigError::InvalidTimeout("CLASSIFY_TIMEOUT_MS"),
        )?);
        let request_timeout = Duration::from_secs(parse_var(
            "REQUEST_TIMEOUT_SECS",
            60u64,
            ConfigError::InvalidTimeout("REQUEST_TIMEOUT_SECS"),
        )?);

        Ok(Self {
            server_port,
            openai_api_key,
            chat_model,
            embedding_model,
            database_url,
            taxonomy_path: non_empty_var("TAXONOMY_PATH"),
            seed_contents_path,
            embed_timeout,
            classify_timeout,
            request_timeout,
            static_dir: non_empty_var("STATIC_DIR"),
        })
    }

    /// 로그 디렉토리. 로깅이 설정 로드보다 먼저 초기화되므로 따로 읽습니다.
    pub fn log_dir() -> String {
        non_empty_var("LOG_DIR").unwrap_or_else(|| "logs".to_string())
    }

    /// `TAXONOMY_PATH` 파일 또는 내장 taxonomy
    pub fn load_taxonomies(&self) -> Result<TaxonomySet, ConfigError> {
        Ok(TaxonomySet::load(self.taxonomy_path.as_deref())?)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(key: &str, default: T, error: ConfigError) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| error),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid timeout value for {0}")]
    InvalidTimeout(&'static str),
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyLoadError),
}
