use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::stage::Stage;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Free-text requirements gathered so far. The first input is the project
/// description, every later one is appended to the additional details.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
}

impl Requirements {
    pub fn merge(&mut self, input: &str) {
        if self.project_description.is_none() {
            self.project_description = Some(input.to_string());
            return;
        }
        match &mut self.additional_details {
            Some(details) => {
                details.push('\n');
                details.push_str(input);
            }
            None => self.additional_details = Some(input.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    /// User-turn text recorded in the transcript when contact details arrive.
    pub fn summary(&self) -> String {
        format!("Name: {}, Email: {}, Phone: {}", self.name, self.email, self.phone)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Estimate {
    pub timeline: String,
    pub budget_range: String,
    pub complexity: String,
}

impl Estimate {
    /// Fixed preliminary estimate; no pricing model is applied.
    pub fn preliminary() -> Self {
        Self {
            timeline: "8-12 weeks".to_string(),
            budget_range: "$15,000-$25,000".to_string(),
            complexity: "Medium".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Conversation {
    pub id: Uuid,
    pub messages: Vec<Message>,
    pub requirements: Requirements,
    pub contact_info: Option<ContactInfo>,
    pub estimate: Option<Estimate>,
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
            requirements: Requirements::default(),
            contact_info: None,
            estimate: None,
            stage: Stage::Greeting,
            created_at: Utc::now(),
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

// --- HTTP payloads ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CollectRequirementsRequest {
    pub conversation_id: String,
    pub user_input: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerateEstimateRequest {
    pub conversation_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CollectContactRequest {
    pub conversation_id: String,
    pub contact: ContactInfo,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompleteRequest {
    pub conversation_id: String,
    #[serde(default)]
    pub final_notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StartResponse {
    pub conversation_id: Uuid,
    pub message: String,
    pub current_step: Stage,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StepResponse {
    pub message: String,
    pub current_step: Stage,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EstimateResponse {
    pub message: String,
    pub estimate: Estimate,
    pub current_step: Stage,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Completed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CompleteResponse {
    pub message: String,
    pub status: CompletionStatus,
}
