use serde::{Deserialize, Serialize};

/// Message count at which requirement gathering is considered done.
pub const REQUIREMENTS_MESSAGE_THRESHOLD: usize = 6;

/// Fixed lead-intake lifecycle.
///
/// greeting → collecting_requirements → generating_estimate → collecting_contact → confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Greeting,
    CollectingRequirements,
    GeneratingEstimate,
    CollectingContact,
    Confirmation,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Greeting,
        Stage::CollectingRequirements,
        Stage::GeneratingEstimate,
        Stage::CollectingContact,
        Stage::Confirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Greeting => "greeting",
            Stage::CollectingRequirements => "collecting_requirements",
            Stage::GeneratingEstimate => "generating_estimate",
            Stage::CollectingContact => "collecting_contact",
            Stage::Confirmation => "confirmation",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage a conversation should move to after a requirements reply has been
/// appended. Purely volume based: content is not inspected.
pub fn after_requirements_reply(message_count: usize) -> Stage {
    if message_count >= REQUIREMENTS_MESSAGE_THRESHOLD {
        Stage::GeneratingEstimate
    } else {
        Stage::CollectingRequirements
    }
}

/// Stage a conversation enters when it receives requirement input.
/// Only a fresh conversation moves; any later stage is left as is.
pub fn on_requirements_input(current: Stage) -> Stage {
    match current {
        Stage::Greeting => Stage::CollectingRequirements,
        other => other,
    }
}
