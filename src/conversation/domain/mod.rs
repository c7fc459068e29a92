//! Domain model for conversations and their messages.
//!
//! Message identity (message id, conversation id) travels in metadata, as it
//! does on the wire; [`crate::conversation::store::ConversationStore::sanitize`]
//! assigns a message id exactly once when absent. All infrastructure concerns
//! are kept outside the domain boundary.

mod conversation;
mod event;
mod ids;
mod message;
mod metadata;
mod part;
mod role;

pub use conversation::Conversation;
pub use event::Event;
pub use ids::{ConversationId, EventId, MessageId};
pub use message::{Message, MessageBuilder, MessageBuilderError};
pub use metadata::MessageMetadata;
pub use part::{DataPart, FileContent, FilePart, Part, TextPart};
pub use role::{ParseRoleError, Role};
