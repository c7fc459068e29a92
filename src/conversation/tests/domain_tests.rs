//! Unit tests for conversation domain types.

use rstest::rstest;
use serde_json::json;

use crate::conversation::domain::{
    ConversationId, FileContent, Message, MessageBuilderError, MessageId, MessageMetadata, Part,
    Role, TextPart,
};

// ============================================================================
// Role tests
// ============================================================================

#[rstest]
#[case("user", Role::User)]
#[case("agent", Role::Agent)]
#[case(" Agent ", Role::Agent)]
fn role_parses_known_values(#[case] input: &str, #[case] expected: Role) {
    assert_eq!(Role::try_from(input), Ok(expected));
}

#[rstest]
fn role_rejects_unknown_value() {
    assert!(Role::try_from("assistant").is_err());
}

#[rstest]
fn role_serialises_snake_case() {
    assert_eq!(serde_json::to_value(Role::User).ok(), Some(json!("user")));
}

// ============================================================================
// Part tests
// ============================================================================

#[rstest]
fn text_part_round_trips() {
    let part = Part::text("Hello!");
    let value = serde_json::to_value(&part).expect("serialises");
    assert_eq!(value, json!({"type": "text", "text": "Hello!"}));

    let back: Part = serde_json::from_value(value).expect("deserialises");
    assert_eq!(back, part);
}

#[rstest]
fn file_part_round_trips() {
    let part = Part::file(FileContent::from_bytes("image/png", "aGVsbG8=").with_name("pic.png"));
    let value = serde_json::to_value(&part).expect("serialises");
    let back: Part = serde_json::from_value(value).expect("deserialises");
    assert_eq!(back, part);
}

/// The part union is closed: an unrecognised tag is a hard decode error.
#[rstest]
fn unknown_part_tag_is_rejected() {
    let result: Result<Part, _> =
        serde_json::from_value(json!({"type": "video", "uri": "file.mp4"}));
    assert!(result.is_err());
}

#[rstest]
fn text_part_is_empty_ignores_whitespace() {
    assert!(TextPart::new("   ").is_empty());
    assert!(!TextPart::new("x").is_empty());
}

#[rstest]
#[case(FileContent::from_bytes("image/png", "aGVsbG8="), true, true)]
#[case(FileContent::from_uri("image/png", "/message/file/abc"), true, false)]
fn file_content_validity(
    #[case] content: FileContent,
    #[case] valid: bool,
    #[case] inline: bool,
) {
    assert_eq!(content.is_valid(), valid);
    assert_eq!(content.is_inline(), inline);
}

// ============================================================================
// Metadata tests
// ============================================================================

#[rstest]
fn metadata_extensions_flatten_on_the_wire() {
    let metadata = MessageMetadata::empty().with_extension("trace", json!("abc"));
    let value = serde_json::to_value(&metadata).expect("serialises");
    assert_eq!(value, json!({"trace": "abc"}));
}

#[rstest]
fn metadata_unknown_keys_land_in_extensions() {
    let metadata: MessageMetadata =
        serde_json::from_value(json!({"custom_flag": true})).expect("deserialises");
    assert_eq!(metadata.extensions.get("custom_flag"), Some(&json!(true)));
    assert!(metadata.message_id.is_none());
}

#[rstest]
fn metadata_is_empty_reflects_contents() {
    assert!(MessageMetadata::empty().is_empty());
    assert!(!MessageMetadata::for_conversation(ConversationId::new()).is_empty());
    assert!(!MessageMetadata::empty().marked_file_upload().is_empty());
}

// ============================================================================
// Message tests
// ============================================================================

#[rstest]
fn message_requires_at_least_one_part() {
    let result = Message::new(Role::User, Vec::new());
    assert_eq!(result.err(), Some(MessageBuilderError::EmptyParts));
}

#[rstest]
fn builder_carries_metadata_and_parts() {
    let conversation_id = ConversationId::new();
    let message_id = MessageId::new();
    let message = Message::builder(Role::Agent)
        .with_part(Part::text("first"))
        .with_part(Part::data(json!({"k": 1})))
        .with_metadata(
            MessageMetadata::for_conversation(conversation_id).with_message_id(message_id),
        )
        .build()
        .expect("valid message");

    assert_eq!(message.parts().len(), 2);
    assert_eq!(message.conversation_id(), Some(conversation_id));
    assert_eq!(message.message_id(), Some(message_id));
}

#[rstest]
fn text_content_joins_text_parts_only() {
    let message = Message::builder(Role::User)
        .with_part(Part::text("one"))
        .with_part(Part::data(json!({"skipped": true})))
        .with_part(Part::text("two"))
        .build()
        .expect("valid message");

    assert_eq!(message.text_content(), "one\ntwo");
}

#[rstest]
fn message_serde_round_trips() {
    let message = Message::builder(Role::User)
        .with_part(Part::text("hello"))
        .with_metadata(MessageMetadata::for_conversation(ConversationId::new()))
        .build()
        .expect("valid message");

    let value = serde_json::to_value(&message).expect("serialises");
    let back: Message = serde_json::from_value(value).expect("deserialises");
    assert_eq!(back, message);
}
