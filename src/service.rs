//! The five lead-intake operations.
//!
//! Every operation locks its conversation for its whole duration, including
//! the generation call, so requests for the same id run one at a time.
//!
//! `collect_requirements` and `generate_estimate` report an advisory next
//! stage to the caller that can run ahead of the stage stored on the
//! conversation; the stored stage is not advanced to match it.

use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;
use tracing::info;
use uuid::Uuid;

use crate::{
    archive::{LeadArchive, LeadRecord},
    error::AppError,
    generator::MessageGenerator,
    models::{
        CompleteResponse, CompletionStatus, ContactInfo, Conversation, Estimate, EstimateResponse, Message,
        StartResponse, StepResponse,
    },
    prompts::COMPLETION_MESSAGE,
    stage::{self, Stage},
    store::{ConversationStore, SharedConversation},
    validation::validate_contact,
};

pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
    generator: Arc<dyn MessageGenerator>,
    archive: Arc<dyn LeadArchive>,
}

impl ConversationService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        generator: Arc<dyn MessageGenerator>,
        archive: Arc<dyn LeadArchive>,
    ) -> Self {
        Self { store, generator, archive }
    }

    fn lookup(&self, conversation_id: &str) -> Result<SharedConversation, AppError> {
        let id = Uuid::parse_str(conversation_id.trim())
            .map_err(|_| AppError::NotFound(conversation_id.to_string()))?;
        self.store.get(id)
    }

    /// Lock a conversation and confirm it is still live. A request that
    /// queued behind `complete` must not touch the archived conversation.
    async fn lock_live(&self, shared: SharedConversation) -> Result<OwnedMutexGuard<Conversation>, AppError> {
        let conversation = Arc::clone(&shared).lock_owned().await;
        match self.store.get(conversation.id) {
            Ok(current) if Arc::ptr_eq(&current, &shared) => Ok(conversation),
            _ => Err(AppError::NotFound(conversation.id.to_string())),
        }
    }

    pub async fn start(&self) -> StartResponse {
        let (id, shared) = self.store.create();
        let mut conversation = shared.lock().await;

        let reply = self.generator.generate(conversation.stage, &conversation.messages, "").await;
        conversation.messages.push(Message::assistant(reply.clone()));
        info!("🚀 Started conversation {} ({} live)", id, self.store.len());

        StartResponse { conversation_id: id, message: reply, current_step: conversation.stage }
    }

    pub async fn collect_requirements(&self, conversation_id: &str, user_input: &str) -> Result<StepResponse, AppError> {
        let shared = self.lookup(conversation_id)?;
        let mut conversation = self.lock_live(shared).await?;

        conversation.messages.push(Message::user(user_input));
        conversation.stage = stage::on_requirements_input(conversation.stage);
        conversation.requirements.merge(user_input);

        let reply = self.generator.generate(conversation.stage, &conversation.messages, user_input).await;
        conversation.messages.push(Message::assistant(reply.clone()));

        let next = stage::after_requirements_reply(conversation.messages.len());
        info!(
            "📝 Conversation {} requirements updated ({} messages, stored stage '{}', next '{}')",
            conversation.id, conversation.messages.len(), conversation.stage, next
        );
        Ok(StepResponse { message: reply, current_step: next })
    }

    pub async fn generate_estimate(&self, conversation_id: &str) -> Result<EstimateResponse, AppError> {
        let shared = self.lookup(conversation_id)?;
        let mut conversation = self.lock_live(shared).await?;

        conversation.stage = Stage::GeneratingEstimate;
        let estimate = conversation.estimate.get_or_insert_with(Estimate::preliminary).clone();

        let reply = self.generator.generate(conversation.stage, &conversation.messages, "").await;
        conversation.messages.push(Message::assistant(reply.clone()));
        info!("💰 Estimate issued for conversation {}", conversation.id);

        Ok(EstimateResponse { message: reply, estimate, current_step: Stage::CollectingContact })
    }

    pub async fn collect_contact(&self, conversation_id: &str, contact: ContactInfo) -> Result<StepResponse, AppError> {
        let shared = self.lookup(conversation_id)?;
        validate_contact(&contact)?;
        let mut conversation = self.lock_live(shared).await?;

        if conversation.contact_info.is_some() {
            return Err(AppError::ContactAlreadyCaptured(conversation.id.to_string()));
        }

        conversation.stage = Stage::CollectingContact;
        conversation.messages.push(Message::user(contact.summary()));
        conversation.contact_info = Some(contact);
        conversation.stage = Stage::Confirmation;

        let reply = self.generator.generate(conversation.stage, &conversation.messages, "").await;
        conversation.messages.push(Message::assistant(reply.clone()));
        info!("📇 Contact captured for conversation {}", conversation.id);

        Ok(StepResponse { message: reply, current_step: Stage::Confirmation })
    }

    /// Archive the conversation and retire it from the live store.
    pub async fn complete(&self, conversation_id: &str, final_notes: Option<&str>) -> Result<CompleteResponse, AppError> {
        let shared = self.lookup(conversation_id)?;
        let mut conversation = self.lock_live(shared).await?;

        if let Some(notes) = final_notes.filter(|n| !n.is_empty()) {
            conversation.messages.push(Message::user(notes));
        }

        self.archive.save(&LeadRecord::from_conversation(&conversation)).await?;
        self.store.remove(conversation.id);
        info!("✅ Conversation {} completed", conversation.id);

        Ok(CompleteResponse { message: COMPLETION_MESSAGE.to_string(), status: CompletionStatus::Completed })
    }
}
