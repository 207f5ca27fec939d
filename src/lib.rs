pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod utils;

use std::path::Path;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::mood::handler::analyze_mood,
        domain::content::handler::contents_by_emotion,
        domain::category::handler::normalize_category,
        domain::health::handler::health_check,
    ),
    components(
        schemas(
            domain::mood::dto::MoodRequest,
            domain::mood::dto::MoodResponse,
            domain::mood::dto::MoodSuccessResponse,
            domain::content::dto::ContentItem,
            domain::content::dto::ContentListSuccessResponse,
            domain::category::dto::NormalizeRequest,
            domain::category::dto::NormalizeResponse,
            domain::category::dto::NormalizeSuccessResponse,
            domain::category::TaxonomyKind,
            domain::category::MatchSource,
            domain::category::UnresolvedReason,
            domain::health::dto::HealthStatus,
            domain::health::dto::HealthState,
            domain::health::dto::HealthChecks,
            domain::health::dto::CheckResult,
            domain::health::dto::CacheCheck,
            utils::response::ErrorResponse,
        )
    ),
    tags(
        (name = "Mood", description = "감정 분석 및 필사 문장 추천 API"),
        (name = "Content", description = "필사 문장 조회 API"),
        (name = "Category", description = "감정/상황 카테고리 정규화 API"),
        (name = "Health", description = "헬스체크 API")
    )
)]
pub struct ApiDoc;

/// 라우터 부가 설정
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub request_timeout: Duration,
    /// 빌드된 SPA 경로. 지정하면 API 외 경로를 정적 파일로 서빙합니다.
    pub static_dir: Option<String>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            static_dir: None,
        }
    }
}

pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let api = Router::new()
        .route("/health", get(domain::health::health_check))
        .route("/api/mood", post(domain::mood::handler::analyze_mood))
        .route(
            "/api/contents_by_emotion/:emotion",
            get(domain::content::handler::contents_by_emotion),
        )
        .route(
            "/api/categories/normalize",
            post(domain::category::handler::normalize_category),
        )
        .with_state(state);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api);

    if let Some(dir) = options.static_dir.as_deref() {
        let index = Path::new(dir).join("index.html");
        router = router.fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)));
    }

    router
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(middleware::from_fn(global::request_tracing))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
