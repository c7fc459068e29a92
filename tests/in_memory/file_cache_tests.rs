//! Upload, rewrite, and retrieval of file payloads through the facade.

use std::sync::Arc;

use rstest::rstest;

use switchboard::api::envelope::FileUpload;
use switchboard::client::ConversationClient;
use switchboard::conversation::domain::Part;
use switchboard::host::router::StaticRouter;
use switchboard::remote::adapters::ScriptedTransport;

use crate::in_memory::helpers::{
    LocalTransport, cache_id_from_uri, card, service_with, user_message, wait_until_idle,
};

/// "hello world" in base64.
const PAYLOAD_B64: &str = "aGVsbG8gd29ybGQ=";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uploaded_file_is_cached_and_retrievable() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("received"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    service.send_message_with_file(
        user_message(conversation_id, "please review"),
        FileUpload::new("notes.txt", "text/plain", PAYLOAD_B64),
    )?;
    wait_until_idle(&service).await?;

    // The read path rewrites the inline payload into a reference.
    let messages = service.list_messages(conversation_id)?;
    let uri = messages
        .iter()
        .flat_map(|m| m.parts())
        .find_map(|part| match part {
            Part::File(fp) => fp.file.uri.clone(),
            _ => None,
        })
        .expect("file part rewritten to uri");

    let payload = service.get_file(cache_id_from_uri(&uri))?;
    assert_eq!(payload.mime_type, "text/plain");
    assert_eq!(payload.bytes, PAYLOAD_B64);

    // Repeated polling returns the same reference.
    let again = service.list_messages(conversation_id)?;
    let same_uri = again
        .iter()
        .flat_map(|m| m.parts())
        .find_map(|part| match part {
            Part::File(fp) => fp.file.uri.clone(),
            _ => None,
        })
        .expect("file part still referenced");
    assert_eq!(uri, same_uri);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn file_reference_is_propagated_to_metadata() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("received"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    service.send_message_with_file(
        user_message(conversation_id, "see file"),
        FileUpload::new("resume.pdf", "application/pdf", PAYLOAD_B64),
    )?;
    wait_until_idle(&service).await?;

    let messages = service.list_messages(conversation_id)?;
    assert_eq!(
        messages[0].metadata().file_reference.as_deref(),
        Some("resume.pdf")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_cache_id_is_not_found_through_the_client() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("ok"),
        StaticRouter::abstaining(),
        vec![card("alpha", false)],
    )
    .await;
    let client = ConversationClient::new(Arc::new(LocalTransport::new(service)));

    let result = client
        .get_file(switchboard::conversation::cache::CacheId::new())
        .await;
    assert!(result.is_err());
    Ok(())
}
