pub mod conversation;
pub mod error;
pub mod modes;
pub mod request;
pub mod result;

pub use conversation::{
    ChatMessage, Conversation, ConversationId, ConversationStore, ExportFormat, Role,
    DEFAULT_CONTEXT_MESSAGES,
};
pub use error::{Error, Result};
pub use modes::{compatible_models, is_compatible, AiModel, SearchMode, SourceType};
pub use request::{ContextMessage, FollowUpContext, SearchRequest};
pub use result::SearchResult;
