//! Message part types: the polymorphic content structure of messages.
//!
//! Messages carry a "parts" array mixing text, file payloads, and structured
//! data. The union is closed: an unrecognised tag fails deserialisation
//! outright rather than passing through as an opaque blob.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single content part within a message.
///
/// # Serialisation
///
/// Parts are serialised with a `type` tag field:
///
/// ```json
/// { "type": "text", "text": "Hello!" }
/// { "type": "file", "file": { "mime_type": "image/png", "uri": "/message/file/..." } }
/// { "type": "data", "data": { "kind": "form" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain text content.
    Text(TextPart),
    /// A file payload, inline or by reference.
    File(FilePart),
    /// Structured JSON data.
    Data(DataPart),
}

impl Part {
    /// Creates a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart::new(text))
    }

    /// Creates a structured-data part.
    #[must_use]
    pub const fn data(data: Value) -> Self {
        Self::Data(DataPart { data })
    }

    /// Creates a file part.
    #[must_use]
    pub const fn file(file: FileContent) -> Self {
        Self::File(FilePart { file })
    }

    /// Returns the text content when this is a text part.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(part) => Some(&part.text),
            Self::File(_) | Self::Data(_) => None,
        }
    }
}

/// Plain text content within a message.
///
/// # Examples
///
/// ```
/// use switchboard::conversation::domain::TextPart;
///
/// let text = TextPart::new("Hello, switchboard!");
/// assert!(!text.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPart {
    /// The text content.
    pub text: String,
}

impl TextPart {
    /// Creates a new text part.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns `true` if the text content is empty or whitespace-only.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A file payload within a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// The file content or reference.
    pub file: FileContent,
}

/// File content carried by a [`FilePart`].
///
/// A file travels either inline (base64 `bytes`) or by reference (`uri`).
/// The store's cache rewrites inline payloads into references before
/// messages reach the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// A display name for the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The MIME type of the payload.
    pub mime_type: String,

    /// Base64-encoded payload bytes, when carried inline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,

    /// Retrieval URI, when the payload is held by the file cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl FileContent {
    /// Creates inline file content from base64-encoded bytes.
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: impl Into<String>) -> Self {
        Self {
            name: None,
            mime_type: mime_type.into(),
            bytes: Some(bytes.into()),
            uri: None,
        }
    }

    /// Creates file content referencing an already-cached payload.
    #[must_use]
    pub fn from_uri(mime_type: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: None,
            mime_type: mime_type.into(),
            bytes: None,
            uri: Some(uri.into()),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns `true` if the content has a payload or a reference to one.
    #[must_use]
    #[expect(
        clippy::missing_const_for_fn,
        reason = "String::is_empty is not const-stable"
    )]
    pub fn is_valid(&self) -> bool {
        !self.mime_type.is_empty() && (self.bytes.is_some() || self.uri.is_some())
    }

    /// Returns `true` if the payload is carried inline.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.bytes.is_some()
    }
}

/// Structured JSON data within a message.
///
/// # Examples
///
/// ```
/// use switchboard::conversation::domain::DataPart;
/// use serde_json::json;
///
/// let part = DataPart::new(json!({"kind": "form", "fields": []}));
/// assert!(part.data.is_object());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPart {
    /// The structured payload.
    pub data: Value,
}

impl DataPart {
    /// Creates a new structured-data part.
    #[must_use]
    pub const fn new(data: Value) -> Self {
        Self { data }
    }
}
