//! Multi-turn conversation tracking: ordered message history, bounded
//! context windows for follow-up queries, and export rendering.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::request::ContextMessage;

/// Number of trailing messages included in a follow-up context window.
pub const DEFAULT_CONTEXT_MESSAGES: usize = 10;

/// Speaker of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque handle identifying a conversation within a client's store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    /// Generate a fresh unique id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single message within a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub sources: Vec<Value>,
}

/// Export renderings supported by [`Conversation::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Structured record with every field, pretty-printed JSON.
    Json,
    /// Plain alternating Q/A transcript.
    Text,
    /// One section per message, with citations.
    Markdown,
}

/// An ordered, append-only conversation thread.
///
/// Mutated only by appending completed exchanges; never deleted
/// automatically. Lifetime is caller-controlled through the owning
/// [`ConversationStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a completed query/answer pair: one user message followed by one
    /// assistant message carrying the cited sources.
    pub fn add_exchange(&mut self, query: &str, answer: &str, sources: &[Value]) {
        self.push(Role::User, query, Vec::new());
        self.push(Role::Assistant, answer, sources.to_vec());
    }

    fn push(&mut self, role: Role, content: &str, sources: Vec<Value>) {
        self.messages.push(ChatMessage {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
            sources,
        });
        self.updated_at = Utc::now();
    }

    /// The last `max_messages` messages as role/content pairs, oldest first.
    /// Returns everything when the conversation is shorter than the window.
    pub fn context(&self, max_messages: usize) -> Vec<ContextMessage> {
        let start = self.messages.len().saturating_sub(max_messages);
        self.messages[start..]
            .iter()
            .map(|msg| ContextMessage {
                role: msg.role,
                content: msg.content.clone(),
            })
            .collect()
    }

    /// Render the full message sequence. Pure read; never mutates the
    /// conversation, and the same format yields byte-identical output on
    /// repeated calls.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.export_json(),
            ExportFormat::Text => Ok(self.export_text()),
            ExportFormat::Markdown => Ok(self.export_markdown()),
        }
    }

    fn export_json(&self) -> Result<String> {
        let record = serde_json::json!({
            "conversation_id": self.id.as_str(),
            "created_at": self.created_at.to_rfc3339(),
            "messages": self.messages.iter().map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "content": msg.content,
                    "timestamp": msg.timestamp.to_rfc3339(),
                    "sources": msg.sources,
                })
            }).collect::<Vec<_>>(),
        });
        Ok(serde_json::to_string_pretty(&record)?)
    }

    fn export_text(&self) -> String {
        let lines: Vec<String> = self
            .messages
            .iter()
            .map(|msg| {
                let prefix = match msg.role {
                    Role::User => "Q:",
                    Role::Assistant => "A:",
                };
                format!("{} {}\n", prefix, msg.content)
            })
            .collect();
        lines.join("\n")
    }

    fn export_markdown(&self) -> String {
        let mut lines = vec![format!("# Conversation: {}\n", self.id)];
        for msg in &self.messages {
            match msg.role {
                Role::User => lines.push(format!("## Question\n{}\n", msg.content)),
                Role::Assistant => {
                    lines.push(format!("## Answer\n{}\n", msg.content));
                    if !msg.sources.is_empty() {
                        lines.push("### Sources".to_string());
                        for (idx, source) in msg.sources.iter().enumerate() {
                            let title = source
                                .get("title")
                                .and_then(Value::as_str)
                                .unwrap_or("Source");
                            let url = source.get("url").and_then(Value::as_str).unwrap_or("#");
                            lines.push(format!("{}. [{}]({})", idx + 1, title, url));
                        }
                        lines.push(String::new());
                    }
                }
            }
        }
        lines.join("\n")
    }
}

/// Process-held mapping from conversation id to conversation.
///
/// Clients own one store; conversations live as long as the store does.
/// Expected to be driven by a single writer per conversation.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: HashMap<ConversationId, Conversation>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register an empty conversation, returning its handle.
    pub fn start(&mut self) -> ConversationId {
        let id = ConversationId::new();
        self.conversations
            .insert(id.clone(), Conversation::new(id.clone()));
        id
    }

    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    pub fn get_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.conversations.get_mut(id)
    }

    /// Drop a conversation. Returns whether it existed.
    pub fn remove(&mut self, id: &ConversationId) -> bool {
        self.conversations.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn ids(&self) -> Vec<ConversationId> {
        self.conversations.keys().cloned().collect()
    }
}
