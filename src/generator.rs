//! Assistant message generation.
//!
//! [`MessageGenerator`] is the seam the conversation service talks to. It is
//! infallible from the caller's point of view: the demo implementation never
//! fails and the live implementation swaps any backend error for a fixed
//! apology so the conversation can keep going.

use async_trait::async_trait;
use tracing::{error, info};

use crate::{
    models::Message,
    prompts::{canned_reply, system_instruction, FALLBACK_REPLY},
    stage::Stage,
};

pub const TEMPERATURE: f32 = 0.7;

#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, stage: Stage, history: &[Message], user_input: &str) -> String;
}

/// Everything a text-generation backend needs for one reply.
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub system_instruction: String,
    pub turns: Vec<Message>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl ChatPrompt {
    /// Stage instruction, then the full history, then the current input when
    /// there is one.
    pub fn for_stage(stage: Stage, history: &[Message], user_input: &str, max_output_tokens: u32) -> Self {
        let mut turns = history.to_vec();
        if !user_input.is_empty() {
            turns.push(Message::user(user_input));
        }
        Self {
            system_instruction: system_instruction(stage).to_string(),
            turns,
            temperature: TEMPERATURE,
            max_output_tokens,
        }
    }
}

/// External text-generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, Self::Error>;
}

/// Demo mode: fixed replies per stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedGenerator;

#[async_trait]
impl MessageGenerator for CannedGenerator {
    async fn generate(&self, stage: Stage, _history: &[Message], user_input: &str) -> String {
        info!("Using demo mode - canned reply for stage '{}'", stage);
        canned_reply(stage, user_input)
    }
}

/// Live mode: delegates to a [`TextGenerator`], falling back on failure.
pub struct LlmGenerator<C> {
    backend: C,
    max_output_tokens: u32,
}

impl<C: TextGenerator> LlmGenerator<C> {
    pub fn new(backend: C, max_output_tokens: u32) -> Self {
        Self { backend, max_output_tokens }
    }
}

#[async_trait]
impl<C: TextGenerator> MessageGenerator for LlmGenerator<C> {
    async fn generate(&self, stage: Stage, history: &[Message], user_input: &str) -> String {
        let prompt = ChatPrompt::for_stage(stage, history, user_input, self.max_output_tokens);
        match self.backend.complete(&prompt).await {
            Ok(text) => {
                info!("✅ Generated reply for stage '{}'", stage);
                text
            }
            Err(e) => {
                error!("❌ Reply generation for stage '{}' failed: {}", stage, e);
                info!("🔄 Falling back to canned apology");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    #[derive(Debug, thiserror::Error)]
    #[error("quota exceeded")]
    struct QuotaError;

    struct FailingBackend;

    #[async_trait]
    impl TextGenerator for FailingBackend {
        type Error = QuotaError;
        async fn complete(&self, _prompt: &ChatPrompt) -> Result<String, QuotaError> {
            Err(QuotaError)
        }
    }

    #[derive(Default)]
    struct RecordingBackend {
        seen: Mutex<Vec<ChatPrompt>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingBackend {
        type Error = QuotaError;
        async fn complete(&self, prompt: &ChatPrompt) -> Result<String, QuotaError> {
            self.seen.lock().push(prompt.clone());
            Ok("generated".to_string())
        }
    }

    #[tokio::test]
    async fn live_failure_falls_back() {
        let generator = LlmGenerator::new(FailingBackend, 500);
        let reply = generator.generate(Stage::CollectingRequirements, &[], "hello").await;
        assert_eq!(reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn live_prompt_has_instruction_history_and_input() {
        let generator = LlmGenerator::new(RecordingBackend::default(), 321);
        let history = vec![Message::assistant("Hi!"), Message::user("I need an app")];
        let reply = generator.generate(Stage::CollectingRequirements, &history, "for iOS").await;
        assert_eq!(reply, "generated");

        let seen = generator.backend.seen.lock();
        let prompt = &seen[0];
        assert_eq!(prompt.system_instruction, system_instruction(Stage::CollectingRequirements));
        assert_eq!(prompt.turns.len(), 3);
        assert_eq!(prompt.turns[2], Message::user("for iOS"));
        assert_eq!(prompt.max_output_tokens, 321);
        assert!((prompt.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_input_is_not_appended() {
        let history = vec![Message::assistant("Hi!")];
        let prompt = ChatPrompt::for_stage(Stage::GeneratingEstimate, &history, "", 500);
        assert_eq!(prompt.turns.len(), 1);
        assert_eq!(prompt.turns[0].role, Role::Assistant);
    }

    #[tokio::test]
    async fn canned_generator_branches_on_input() {
        let reply = CannedGenerator.generate(Stage::CollectingRequirements, &[], "Need a Website").await;
        assert!(reply.contains("e-commerce"));
    }
}
