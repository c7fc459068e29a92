//! Client-side reconciliation of server and local message histories.
//!
//! The client keeps a locally-optimistic message list while the backend
//! processes dispatches; polling then returns the authoritative server
//! list. The merge must never lose an optimistic update the server has not
//! yet reflected, and must never duplicate one once it has.
//!
//! The law: every id from the server list appears exactly once and first,
//! in server order; every preserved local-only id appears exactly once
//! afterwards, in local order; no id appears twice.

use std::collections::HashSet;

use crate::conversation::domain::{Message, MessageId, Part};

/// Text prefix a client inserts for an optimistic upload placeholder.
const UPLOAD_PLACEHOLDER_PREFIX: &str = "[Uploaded file:";

/// Paperclip marker some clients use for upload placeholders.
const UPLOAD_MARKER: char = '\u{1F4CE}';

/// Classifies whether a local message must survive the merge.
///
/// A local message is preserved when its id is still pending (dispatched
/// but not complete), when its metadata carries the upload marker, or when
/// its text matches the upload-placeholder pattern. Messages with no id
/// are never preserved: once the server catches up they could not be
/// deduplicated.
#[must_use]
pub fn should_preserve(message: &Message, pending: &HashSet<MessageId>) -> bool {
    let Some(message_id) = message.message_id() else {
        return false;
    };
    if pending.contains(&message_id) {
        return true;
    }
    if message.metadata().file_upload {
        return true;
    }
    message.parts().iter().any(|part| {
        part.as_text().is_some_and(|text| {
            text.contains(UPLOAD_PLACEHOLDER_PREFIX) || text.contains(UPLOAD_MARKER)
        })
    })
}

/// Merges the server's authoritative list with the client's local list.
///
/// Server messages come first, in server order. Local messages survive
/// only when [`should_preserve`] holds and the server does not already
/// carry their id; each surviving id appears exactly once.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use switchboard::conversation::domain::{Message, MessageMetadata, MessageId, Part, Role};
/// use switchboard::reconcile::merge_histories;
///
/// let pending_id = MessageId::new();
/// let local = Message::builder(Role::User)
///     .with_part(Part::text("thinking..."))
///     .with_metadata(MessageMetadata::default().with_message_id(pending_id))
///     .build()
///     .expect("valid message");
///
/// let pending = HashSet::from([pending_id]);
/// let merged = merge_histories(&[], &[local.clone()], &pending);
/// assert_eq!(merged.len(), 1);
///
/// // Once the server reflects the message, it is not duplicated.
/// let merged = merge_histories(&[local.clone()], &[local], &pending);
/// assert_eq!(merged.len(), 1);
/// ```
#[must_use]
pub fn merge_histories(
    server: &[Message],
    local: &[Message],
    pending: &HashSet<MessageId>,
) -> Vec<Message> {
    let mut seen: HashSet<MessageId> = server
        .iter()
        .filter_map(Message::message_id)
        .collect();

    let mut merged: Vec<Message> = server.to_vec();
    for message in local {
        let Some(message_id) = message.message_id() else {
            continue;
        };
        if seen.contains(&message_id) {
            continue;
        }
        if should_preserve(message, pending) {
            seen.insert(message_id);
            merged.push(message.clone());
        }
    }
    merged
}

/// Returns `true` when any part of the message reads as an upload
/// placeholder.
#[must_use]
pub fn is_upload_placeholder(message: &Message) -> bool {
    message.metadata().file_upload
        || message.parts().iter().any(|part| {
            matches!(part, Part::Text(text) if text.text.contains(UPLOAD_PLACEHOLDER_PREFIX)
                || text.text.contains(UPLOAD_MARKER))
        })
}
