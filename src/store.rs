use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{error::AppError, models::Conversation};

/// One live conversation. Holding the lock serializes requests for that id.
pub type SharedConversation = Arc<Mutex<Conversation>>;

pub trait ConversationStore: Send + Sync {
    /// Create a fresh conversation in the greeting stage.
    fn create(&self) -> (Uuid, SharedConversation);
    fn get(&self, id: Uuid) -> Result<SharedConversation, AppError>;
    /// Drop a conversation from the live set once it has been archived.
    fn remove(&self, id: Uuid) -> bool;
    /// Number of live conversations.
    fn len(&self) -> usize;
}

#[derive(Default)]
pub struct InMemoryStore {
    conversations: RwLock<HashMap<Uuid, SharedConversation>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryStore {
    fn create(&self) -> (Uuid, SharedConversation) {
        let mut guard = self.conversations.write();
        let mut conversation = Conversation::new();
        while guard.contains_key(&conversation.id) {
            conversation.id = Uuid::new_v4();
        }
        let id = conversation.id;
        let shared = Arc::new(Mutex::new(conversation));
        guard.insert(id, Arc::clone(&shared));
        (id, shared)
    }

    fn get(&self, id: Uuid) -> Result<SharedConversation, AppError> {
        self.conversations
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    fn remove(&self, id: Uuid) -> bool {
        self.conversations.write().remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.conversations.read().len()
    }
}
