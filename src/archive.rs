//! Durable snapshot of finished conversations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ContactInfo, Conversation, Estimate, Message, Requirements};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("io error: {0}")] Io(#[from] std::io::Error),
    #[error("serialization error: {0}")] Serialize(#[from] serde_json::Error),
}

/// What gets persisted when a lead is submitted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LeadRecord {
    pub conversation_id: Uuid,
    pub project_requirements: Requirements,
    pub contact_info: Option<ContactInfo>,
    pub estimate: Option<Estimate>,
    pub messages: Vec<Message>,
    pub completed_at: DateTime<Utc>,
}

impl LeadRecord {
    pub fn from_conversation(conversation: &Conversation) -> Self {
        Self {
            conversation_id: conversation.id,
            project_requirements: conversation.requirements.clone(),
            contact_info: conversation.contact_info.clone(),
            estimate: conversation.estimate.clone(),
            messages: conversation.messages.clone(),
            completed_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait LeadArchive: Send + Sync {
    async fn save(&self, record: &LeadRecord) -> Result<(), ArchiveError>;
}

/// One pretty-printed JSON document per conversation under `dir`.
pub struct JsonFileArchive {
    dir: PathBuf,
}

impl JsonFileArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("conversation_{id}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl LeadArchive for JsonFileArchive {
    async fn save(&self, record: &LeadRecord) -> Result<(), ArchiveError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(record.conversation_id);
        let body = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&path, body).await?;
        tracing::info!("💾 Saved conversation {} to {}", record.conversation_id, path.display());
        Ok(())
    }
}
