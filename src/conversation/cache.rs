//! File cache: content store for binary payloads referenced by messages.
//!
//! Inline file parts are expensive to ship on every poll, so the store
//! rewrites them into lightweight retrieval references on the way out. Each
//! (message id, part index) pair maps to exactly one cache id, minted on
//! first sight and reused on every subsequent rewrite, so repeated polling
//! never re-stores a payload or changes a reference. Entries are never
//! evicted within the process lifetime.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

use super::domain::{FileContent, Message, MessageId, Part};
use super::error::{CacheError, CacheResult};

/// Opaque identifier referencing a cached binary payload.
///
/// # Examples
///
/// ```
/// use switchboard::conversation::cache::CacheId;
///
/// let id = CacheId::new();
/// let parsed: CacheId = id.to_string().parse().expect("round-trips");
/// assert_eq!(parsed, id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheId(Uuid);

impl CacheId {
    /// Creates a new random cache identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a cache identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for CacheId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CacheId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A cached payload: decoded bytes plus the stored MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFile {
    bytes: Vec<u8>,
    mime_type: String,
}

impl CachedFile {
    /// Creates a cached file from decoded bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the stored MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PartKey {
    message_id: MessageId,
    index: usize,
}

#[derive(Debug, Default)]
struct FileCacheState {
    by_part: HashMap<PartKey, CacheId>,
    files: HashMap<CacheId, CachedFile>,
}

/// Thread-safe in-memory file cache.
#[derive(Debug, Default)]
pub struct FileCache {
    state: RwLock<FileCacheState>,
}

impl FileCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the retrieval URI for a cache identifier.
    #[must_use]
    pub fn uri_for(id: CacheId) -> String {
        format!("/message/file/{id}")
    }

    /// Stores the inline payload at (message id, part index), returning its
    /// cache identifier.
    ///
    /// The mapping is write-once: a payload already cached for the same
    /// coordinates keeps its original identifier and is not re-stored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidPayload`] when the base64 payload does
    /// not decode, and [`CacheError::LockPoisoned`] on a poisoned lock.
    pub fn insert_part(
        &self,
        message_id: MessageId,
        index: usize,
        content: &FileContent,
    ) -> CacheResult<CacheId> {
        let key = PartKey { message_id, index };
        let mut state = self
            .state
            .write()
            .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;

        if let Some(&existing) = state.by_part.get(&key) {
            return Ok(existing);
        }

        let encoded = content.bytes.as_deref().unwrap_or_default();
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CacheError::InvalidPayload {
                message_id,
                index,
                reason: e.to_string(),
            })?;

        let cache_id = CacheId::new();
        state.by_part.insert(key, cache_id);
        state
            .files
            .insert(cache_id, CachedFile::new(bytes, content.mime_type.clone()));
        Ok(cache_id)
    }

    /// Retrieves a cached payload by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] for an unknown identifier and
    /// [`CacheError::LockPoisoned`] on a poisoned lock.
    pub fn get(&self, id: CacheId) -> CacheResult<CachedFile> {
        let state = self
            .state
            .read()
            .map_err(|e| CacheError::LockPoisoned(e.to_string()))?;
        state.files.get(&id).cloned().ok_or(CacheError::NotFound(id))
    }

    /// Rewrites inline file parts into cache references on outgoing copies.
    ///
    /// Messages without an assigned id pass through untouched (nothing to
    /// key the cache on); file parts already carrying a reference are left
    /// alone. Repeated calls over the same messages return identical
    /// references.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidPayload`] when an inline payload does
    /// not decode, and [`CacheError::LockPoisoned`] on a poisoned lock.
    pub fn cache_parts(&self, messages: Vec<Message>) -> CacheResult<Vec<Message>> {
        messages
            .into_iter()
            .map(|message| self.rewrite_message(message))
            .collect()
    }

    fn rewrite_message(&self, mut message: Message) -> CacheResult<Message> {
        let Some(message_id) = message.message_id() else {
            return Ok(message);
        };

        let mut rewritten = Vec::with_capacity(message.parts().len());
        for (index, part) in message.parts().iter().enumerate() {
            match part {
                Part::File(file_part) if file_part.file.is_inline() => {
                    let cache_id = self.insert_part(message_id, index, &file_part.file)?;
                    let mut reference =
                        FileContent::from_uri(file_part.file.mime_type.clone(), Self::uri_for(cache_id));
                    if let Some(name) = &file_part.file.name {
                        reference = reference.with_name(name.clone());
                    }
                    rewritten.push(Part::file(reference));
                }
                other => rewritten.push(other.clone()),
            }
        }

        message.replace_parts(rewritten);
        Ok(message)
    }
}
