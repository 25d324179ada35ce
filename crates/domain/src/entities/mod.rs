//! Domain entities

mod audio;
mod chat;
mod chat_message;
mod conversation;

pub use audio::{AudioFormat, AudioKey, AudioKind, PUBLIC_AUDIO_PREFIX, reference_file_name};
pub use chat::{ChatKind, ChatRequest, ChatResponse, ChatSubmission};
pub use chat_message::{ConversationTurn, MessageRole};
pub use conversation::{Conversation, user_utterances};
