use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateEmbeddingRequestArgs,
    },
    Client,
};

use super::retry::with_retry;
use crate::utils::error::AppError;

/// OpenAI 에러를 세분화된 AppError로 변환
fn classify_openai_error(error: OpenAIError) -> AppError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            let err_type = api_err.r#type.as_deref().unwrap_or("");
            let message = &api_err.message;
            let err_code = api_err
                .code
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_default();

            if err_code.contains("invalid_api_key") || message.contains("API key") {
                AppError::OpenAiAuthError
            } else if err_type == "rate_limit_error"
                || err_code.contains("rate_limit_exceeded")
                || message.contains("rate limit")
            {
                AppError::OpenAiRateLimitError
            } else if err_type == "server_error" || err_code.contains("server") {
                AppError::OpenAiTemporaryError
            } else {
                AppError::OpenAiError(message.clone())
            }
        }
        OpenAIError::Reqwest(req_err) => {
            let status = req_err.status().map(|s| s.as_u16());
            if req_err.is_timeout() || req_err.is_connect() {
                AppError::OpenAiTemporaryError
            } else if status == Some(401) {
                AppError::OpenAiAuthError
            } else if status == Some(429) {
                AppError::OpenAiRateLimitError
            } else if status.map(|s| s >= 500).unwrap_or(false) {
                AppError::OpenAiTemporaryError
            } else {
                AppError::OpenAiError(req_err.to_string())
            }
        }
        _ => AppError::OpenAiError(error.to_string()),
    }
}

/// 텍스트 임베딩 제공자
///
/// 정규화기는 이 인터페이스만 알면 되므로 테스트에서 임의의 벡터를 돌려주는 구현으로 대체할 수 있습니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError>;
}

/// 채팅 완성 클라이언트 인터페이스
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError>;
}

pub type SharedEmbeddingProvider = Arc<dyn EmbeddingProvider>;
pub type SharedChatClient = Arc<dyn ChatClient>;

/// OpenAI API 클라이언트 구현체
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    chat_model: String,
    embedding_model: String,
    /// 재시도 한 번당 타임아웃
    chat_timeout: Duration,
    embed_timeout: Duration,
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        chat_model: &str,
        embedding_model: &str,
        chat_timeout: Duration,
        embed_timeout: Duration,
    ) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            chat_model: chat_model.to_string(),
            embedding_model: embedding_model.to_string(),
            chat_timeout,
            embed_timeout,
        }
    }

    async fn complete_once(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.chat_model.as_str())
            .messages(messages)
            .temperature(0.0)
            .build()
            .map_err(|e| AppError::internal_error(e.to_string()))?;

        let response = tokio::time::timeout(
            self.chat_timeout,
            self.client.chat().create(request),
        )
        .await
        .map_err(|_| AppError::OpenAiTemporaryError)?
        .map_err(classify_openai_error)?;

        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.embedding_model.as_str())
            .input(text.to_string())
            .build()
            .map_err(|e| AppError::internal_error(e.to_string()))?;

        let response = tokio::time::timeout(
            self.embed_timeout,
            self.client.embeddings().create(request),
        )
        .await
        .map_err(|_| AppError::OpenAiTemporaryError)?
        .map_err(classify_openai_error)?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|e| e.embedding)
            .ok_or_else(|| AppError::AiResponseParseError("empty embedding response".to_string()))?;

        if embedding.is_empty() {
            return Err(AppError::AiResponseParseError(
                "zero-length embedding".to_string(),
            ));
        }

        Ok(embedding)
    }
}

#[async_trait::async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String, AppError> {
        with_retry(|| self.complete_once(messages.clone())).await
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        with_retry(|| self.embed_once(text)).await
    }
}

/// 메시지 빌더 헬퍼 함수 (crate 내부용)
pub(crate) fn build_system_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::internal_error(e.to_string()))?,
    ))
}

pub(crate) fn build_user_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::internal_error(e.to_string()))?,
    ))
}
