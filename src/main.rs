use std::net::SocketAddr;
use std::sync::Arc;

use mood_server::config::{establish_connection, AppConfig};
use mood_server::domain::ai::{LlmMoodClassifier, OpenAiClient};
use mood_server::domain::content::{
    InMemoryContentRepository, SeaOrmContentRepository, SharedContentRepository,
};
use mood_server::domain::health::init_start_time;
use mood_server::shutdown::shutdown_signal;
use mood_server::utils::logging::init_logging;
use mood_server::{create_router, AppState, RouterOptions};

#[tokio::main]
async fn main() {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화 (설정 로드 중 경고도 남기기 위해 먼저)
    let _log_guard = init_logging(&AppConfig::log_dir());
    init_start_time();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server terminated with error");
        eprintln!("mood-server: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // 3. 설정 로드
    let config = AppConfig::from_env()?;
    let taxonomies = config.load_taxonomies()?;
    tracing::info!(
        emotions = taxonomies.emotion.len(),
        situations = taxonomies.situation.len(),
        chat_model = %config.chat_model,
        embedding_model = %config.embedding_model,
        "Configuration loaded"
    );

    // 4. 외부 의존성
    let openai = Arc::new(OpenAiClient::new(
        &config.openai_api_key,
        &config.chat_model,
        &config.embedding_model,
        config.classify_timeout,
        config.embed_timeout,
    ));
    let classifier = Arc::new(LlmMoodClassifier::new(
        openai.clone(),
        &taxonomies.emotion.names(),
        &taxonomies.situation.names(),
    ));

    let contents: SharedContentRepository = match (
        config.database_url.as_deref(),
        config.seed_contents_path.as_deref(),
    ) {
        (Some(url), _) => Arc::new(SeaOrmContentRepository::new(establish_connection(url).await?)),
        (None, Some(path)) => Arc::new(InMemoryContentRepository::load(path)?),
        (None, None) => Arc::new(InMemoryContentRepository::new()),
    };

    let state = AppState::new(
        taxonomies,
        openai,
        classifier,
        contents,
        config.embed_timeout,
        config.classify_timeout,
    );

    // 5. 카테고리 임베딩 캐시 예열 (실패해도 요청 시 다시 채움)
    let categories = state.categories.clone();
    tokio::spawn(async move {
        categories.warm_up().await;
    });

    // 6. 라우터 설정
    let app = create_router(
        state,
        RouterOptions {
            request_timeout: config.request_timeout,
            static_dir: config.static_dir.clone(),
        },
    );

    // 7. 서버 실행
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
