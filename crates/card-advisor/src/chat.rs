//! Scripted card assistant. Replies are keyword driven; every exchange is
//! appended to a conversation log when one is available.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const CASHBACK_KEYWORDS: [&str; 2] = ["hoàn tiền", "cashback"];
const TRAVEL_KEYWORDS: [&str; 2] = ["du lịch", "travel"];

pub const APOLOGY_REPLY: &str = "Sorry, I can't answer right now. Please try again later.";

/// Which scripted answer a message earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CannedReply {
    Cashback,
    Travel,
    Greeting,
}

impl CannedReply {
    pub fn text(self) -> &'static str {
        match self {
            CannedReply::Cashback => {
                "Look for cards tagged 'high cashback' such as Techcombank Cashback or VPBank StepUp."
            }
            CannedReply::Travel => {
                "Cards with travel perks such as Vietcombank Visa Platinum or BIDV Premier suit you best."
            }
            CannedReply::Greeting => {
                "Hi! Tell me about your spending needs and I will suggest a suitable card."
            }
        }
    }
}

/// Cashback keywords win over travel keywords when both appear.
pub fn classify(input: &str) -> CannedReply {
    let lowered = input.to_lowercase();
    if CASHBACK_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        CannedReply::Cashback
    } else if TRAVEL_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        CannedReply::Travel
    } else {
        CannedReply::Greeting
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Append-only store for chat transcripts.
pub trait ConversationLog: Send + Sync {
    fn append(&self, messages: &[ChatMessage]) -> Result<(), ConversationLogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversationLogError {
    #[error("conversation log unavailable: {0}")]
    Unavailable(String),
}

pub struct ChatAssistant<L> {
    log: Arc<L>,
}

impl<L: ConversationLog> ChatAssistant<L> {
    pub fn new(log: Arc<L>) -> Self {
        Self { log }
    }

    /// Blank input gets no reply. When the transcript cannot be stored the
    /// shopper sees the apology instead of the scripted answer.
    pub fn reply(&self, input: &str) -> Option<String> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        let kind = classify(message);
        let exchange = [
            ChatMessage::new(ChatRole::User, message),
            ChatMessage::new(ChatRole::Assistant, kind.text()),
        ];

        match self.log.append(&exchange) {
            Ok(()) => {
                info!(reply = ?kind, "chat reply sent");
                Some(kind.text().to_string())
            }
            Err(err) => {
                warn!(error = %err, "failed to record chat exchange");
                Some(APOLOGY_REPLY.to_string())
            }
        }
    }
}
