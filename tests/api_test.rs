mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{
    content, taxonomies, unit, BrokenRepository, FailingEmbeddings, StubClassifier,
    StubEmbeddings,
};
use mood_server::domain::ai::{EmbeddingProvider, MoodClassifier};
use mood_server::domain::content::{InMemoryContentRepository, SharedContentRepository};
use mood_server::{create_router, AppState, RouterOptions};

// ===== Helper Functions =====

fn sample_repository() -> SharedContentRepository {
    Arc::new(InMemoryContentRepository::with_contents(vec![
        content(1, "너무 애쓰지 않아도 괜찮다.", "피곤", Some("직장")),
        content(2, "눈물은 마음을 씻는다.", "슬픔", Some("이별")),
        content(3, "오늘의 기쁨을 미루지 말 것.", "기쁨", Some("성취")),
    ]))
}

fn build_app(
    embeddings: Arc<dyn EmbeddingProvider>,
    classifier: Arc<dyn MoodClassifier>,
    contents: SharedContentRepository,
) -> Router {
    build_app_with_timeouts(
        embeddings,
        classifier,
        contents,
        Duration::from_millis(500),
        RouterOptions::default(),
    )
}

fn build_app_with_timeouts(
    embeddings: Arc<dyn EmbeddingProvider>,
    classifier: Arc<dyn MoodClassifier>,
    contents: SharedContentRepository,
    embed_timeout: Duration,
    options: RouterOptions,
) -> Router {
    let state = AppState::new(
        taxonomies(),
        embeddings,
        classifier,
        contents,
        embed_timeout,
        Duration::from_millis(500),
    );
    create_router(state, options)
}

/// 응답하지 않는 임베딩 제공자와 짧은 요청 타임아웃으로 구성한 앱
fn hanging_embeddings_app(classifier: StubClassifier) -> Router {
    build_app_with_timeouts(
        Arc::new(StubEmbeddings::new().with_delay(Duration::from_secs(30))),
        Arc::new(classifier),
        sample_repository(),
        Duration::from_millis(200),
        RouterOptions {
            request_timeout: Duration::from_secs(1),
            static_dir: None,
        },
    )
}

fn default_app(classifier: StubClassifier) -> Router {
    let set = taxonomies();
    let embeddings = StubEmbeddings::orthogonal(&set).with_fallback(unit(set.emotion.len(), 0));
    build_app(
        Arc::new(embeddings),
        Arc::new(classifier),
        sample_repository(),
    )
}

async fn parse_response_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ===== Health Check Tests =====

mod health {
    use super::*;

    #[tokio::test]
    async fn should_return_ok_with_cache_status() {
        let app = default_app(StubClassifier::answering("기쁨", "일상"));

        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["checks"]["emotionCache"]["total"], 11);
        assert_eq!(body["checks"]["situationCache"]["total"], 16);
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn should_report_unhealthy_when_embedding_fails() {
        let app = build_app(
            Arc::new(FailingEmbeddings::default()),
            Arc::new(StubClassifier::failing()),
            sample_repository(),
        );

        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["checks"]["openaiApi"]["status"], false);
    }
}

// ===== Mood API Tests =====

mod mood_api {
    use super::*;

    const MOOD_URI: &str = "/api/mood";

    #[tokio::test]
    async fn should_return_normalized_labels_and_excerpt() {
        let app = default_app(StubClassifier::answering("지침", "야근"));

        let request = create_json_request("POST", MOOD_URI, json!({ "text": "야근하고 왔다" }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["isSuccess"], true);
        assert_eq!(body["code"], "COMMON200");
        assert_eq!(body["result"]["emotion"], "피곤");
        assert_eq!(body["result"]["situation"], "직장");
        assert_eq!(body["result"]["encouragement"], "너무 애쓰지 않아도 괜찮다.");
        assert_eq!(body["result"]["source"], "소년이 온다, 한강");
    }

    #[tokio::test]
    async fn should_use_embedding_ranking_for_novel_emotion() {
        let app = default_app(StubClassifier::answering("환희", "성취"));

        let request = create_json_request("POST", MOOD_URI, json!({ "text": "드디어 해냈다" }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        // fallback 벡터가 첫 번째 카테고리와 같은 방향
        assert_eq!(body["result"]["emotion"], "기쁨");
        assert_eq!(body["result"]["encouragement"], "오늘의 기쁨을 미루지 말 것.");
    }

    #[tokio::test]
    async fn should_answer_unknown_when_classifier_fails() {
        let app = default_app(StubClassifier::failing());

        let request = create_json_request("POST", MOOD_URI, json!({ "text": "그냥 그런 날" }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["result"]["emotion"], "알 수 없음");
        assert_eq!(body["result"]["situation"], "알 수 없음");
        assert_eq!(body["result"]["encouragement"], "");
        assert_eq!(body["result"]["source"], "");
    }

    #[tokio::test]
    async fn should_answer_unknown_before_request_timeout_when_provider_hangs() {
        let app = hanging_embeddings_app(StubClassifier::answering("처음 보는 감정", "처음 보는 상황"));

        let request = create_json_request("POST", MOOD_URI, json!({ "text": "오늘은 이상한 날" }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["result"]["emotion"], "알 수 없음");
        assert_eq!(body["result"]["situation"], "알 수 없음");
    }

    #[tokio::test]
    async fn should_degrade_when_repository_fails() {
        let set = taxonomies();
        let app = build_app(
            Arc::new(StubEmbeddings::orthogonal(&set)),
            Arc::new(StubClassifier::answering("슬픔", "이별")),
            Arc::new(BrokenRepository),
        );

        let request = create_json_request("POST", MOOD_URI, json!({ "text": "헤어졌다" }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["result"]["emotion"], "슬픔");
        assert_eq!(body["result"]["encouragement"], "");
    }

    #[tokio::test]
    async fn should_return_400_with_empty_text() {
        let app = default_app(StubClassifier::answering("기쁨", "일상"));

        let request = create_json_request("POST", MOOD_URI, json!({ "text": "" }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["isSuccess"], false);
        assert_eq!(body["code"], "COMMON400");
    }

    #[tokio::test]
    async fn should_return_400_with_blank_text() {
        let app = default_app(StubClassifier::answering("기쁨", "일상"));

        let request = create_json_request("POST", MOOD_URI, json!({ "text": "   " }));
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["code"], "COMMON400");
    }

    #[tokio::test]
    async fn should_return_400_with_malformed_json() {
        let app = default_app(StubClassifier::answering("기쁨", "일상"));

        let request = Request::builder()
            .method("POST")
            .uri(MOOD_URI)
            .header("Content-Type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// ===== Contents API Tests =====

mod contents_api {
    use super::*;

    #[tokio::test]
    async fn should_return_contents_for_emotion() {
        let app = default_app(StubClassifier::failing());

        let response = app
            .oneshot(get("/api/contents_by_emotion/%EC%8A%AC%ED%94%94"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        let items = body["result"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["sentence"], "눈물은 마음을 씻는다.");
        assert_eq!(items[0]["title"], "소년이 온다");
    }

    #[tokio::test]
    async fn should_return_empty_list_for_unknown_emotion() {
        let app = default_app(StubClassifier::failing());

        let response = app
            .oneshot(get("/api/contents_by_emotion/nothing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["result"], json!([]));
    }

    #[tokio::test]
    async fn should_return_500_when_repository_fails() {
        let app = build_app(
            Arc::new(FailingEmbeddings::default()),
            Arc::new(StubClassifier::failing()),
            Arc::new(BrokenRepository),
        );

        let response = app
            .oneshot(get("/api/contents_by_emotion/nothing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["code"], "COMMON500");
    }
}

// ===== Category Normalize API Tests =====

mod normalize_api {
    use super::*;

    const NORMALIZE_URI: &str = "/api/categories/normalize";

    #[tokio::test]
    async fn should_resolve_synonym() {
        let app = default_app(StubClassifier::failing());

        let request = create_json_request(
            "POST",
            NORMALIZE_URI,
            json!({ "term": "화남", "taxonomy": "emotion" }),
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["result"]["category"], "분노");
        assert_eq!(body["result"]["matchedBy"], "synonym");
        assert!(body["result"].get("unresolvedReason").is_none());
    }

    #[tokio::test]
    async fn should_report_reason_when_unresolved() {
        let app = build_app(
            Arc::new(FailingEmbeddings::default()),
            Arc::new(StubClassifier::failing()),
            sample_repository(),
        );

        let request = create_json_request(
            "POST",
            NORMALIZE_URI,
            json!({ "term": "완전히 새로운 표현", "taxonomy": "situation" }),
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["result"]["category"], "알 수 없음");
        assert_eq!(body["result"]["unresolvedReason"], "coldCache");
    }

    #[tokio::test]
    async fn should_answer_unknown_before_request_timeout_when_provider_hangs() {
        let app = hanging_embeddings_app(StubClassifier::failing());

        let request = create_json_request(
            "POST",
            NORMALIZE_URI,
            json!({ "term": "처음 보는 상황", "taxonomy": "situation" }),
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response.into_body()).await;
        assert_eq!(body["result"]["category"], "알 수 없음");
        assert_eq!(body["result"]["unresolvedReason"], "coldCache");
    }

    #[tokio::test]
    async fn should_return_400_with_unknown_taxonomy() {
        let app = default_app(StubClassifier::failing());

        let request = create_json_request(
            "POST",
            NORMALIZE_URI,
            json!({ "term": "기쁨", "taxonomy": "color" }),
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_400_with_too_long_term() {
        let app = default_app(StubClassifier::failing());

        let request = create_json_request(
            "POST",
            NORMALIZE_URI,
            json!({ "term": "가".repeat(201), "taxonomy": "emotion" }),
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// ===== Request Tracing Tests =====

mod tracing_header {
    use super::*;

    #[tokio::test]
    async fn should_attach_request_id_to_every_response() {
        let app = default_app(StubClassifier::failing());

        let response = app.oneshot(get("/health")).await.unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }
}
