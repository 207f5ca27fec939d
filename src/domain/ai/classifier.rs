use serde::Deserialize;

use super::client::{build_system_message, build_user_message, SharedChatClient};
use super::prompt::{mood_system_prompt, mood_user_prompt};
use crate::utils::error::AppError;

/// 분류기가 내놓은 정규화 전 라벨
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawClassification {
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub situation: String,
}

/// 사용자 글에서 감정/상황 라벨을 뽑는 분류기
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MoodClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<RawClassification, AppError>;
}

/// 채팅 모델 프롬프트 기반 분류기
pub struct LlmMoodClassifier {
    client: SharedChatClient,
    system_prompt: String,
}

impl LlmMoodClassifier {
    pub fn new(client: SharedChatClient, emotions: &[String], situations: &[String]) -> Self {
        Self {
            client,
            system_prompt: mood_system_prompt(emotions, situations),
        }
    }
}

#[async_trait::async_trait]
impl MoodClassifier for LlmMoodClassifier {
    async fn classify(&self, text: &str) -> Result<RawClassification, AppError> {
        let messages = vec![
            build_system_message(&self.system_prompt)?,
            build_user_message(&mood_user_prompt(text))?,
        ];

        let answer = self.client.complete(messages).await?;
        tracing::debug!(answer = %answer, "Classifier answered");

        parse_classification(&answer)
    }
}

/// 모델 응답에서 JSON 객체를 찾아 파싱합니다.
///
/// 코드 펜스나 앞뒤 설명 문장이 붙어 있어도 첫 `{`부터 마지막 `}`까지를 사용합니다.
pub fn parse_classification(answer: &str) -> Result<RawClassification, AppError> {
    let start = answer.find('{');
    let end = answer.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &answer[start..=end],
        _ => {
            return Err(AppError::AiResponseParseError(format!(
                "no JSON object in answer: {}",
                answer
            )))
        }
    };

    let parsed: RawClassification = serde_json::from_str(json)
        .map_err(|e| AppError::AiResponseParseError(e.to_string()))?;

    Ok(RawClassification {
        emotion: parsed.emotion.trim().to_string(),
        situation: parsed.situation.trim().to_string(),
    })
}
