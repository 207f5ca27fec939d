pub mod classifier;
pub mod client;
pub mod prompt;
pub mod retry;

pub use classifier::{LlmMoodClassifier, MoodClassifier, RawClassification};
pub use client::{
    ChatClient, EmbeddingProvider, OpenAiClient, SharedChatClient, SharedEmbeddingProvider,
};
