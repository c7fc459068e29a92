//! The polling client view: reconciliation and read degradation.

use std::sync::Arc;

use rstest::rstest;

use switchboard::client::view::ClientView;
use switchboard::client::ConversationClient;
use switchboard::conversation::domain::{Message, MessageMetadata, Part, Role};
use switchboard::conversation::store::ConversationStore;
use switchboard::host::router::StaticRouter;
use switchboard::remote::adapters::ScriptedTransport;

use crate::in_memory::helpers::{
    FailingTransport, LocalTransport, card, service_with, user_message, wait_until_idle,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn optimistic_message_survives_then_deduplicates() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("reply"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;
    let client = ConversationClient::new(Arc::new(LocalTransport::new(Arc::clone(&service))));

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    let mut view = ClientView::new();
    view.set_current_conversation(conversation_id);

    // The client appends optimistically, then sends.
    let message = ConversationStore::sanitize(user_message(conversation_id, "hi there"));
    view.push_local_message(message.clone());
    let info = client.send_message(&message).await?;
    assert_eq!(info.conversation_id, Some(conversation_id));

    // While the worker runs, the optimistic entry must survive a refresh.
    view.refresh(&client).await;
    assert!(
        view.messages()
            .iter()
            .any(|m| m.message_id() == message.message_id())
    );

    wait_until_idle(&service).await?;
    view.refresh(&client).await;

    // Server caught up: the id appears exactly once, and the reply follows.
    let occurrences = view
        .messages()
        .iter()
        .filter(|m| m.message_id() == message.message_id())
        .count();
    assert_eq!(occurrences, 1);
    assert!(view.messages().iter().any(|m| m.role() == Role::Agent));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upload_placeholder_survives_refresh() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("reply"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;
    let client = ConversationClient::new(Arc::new(LocalTransport::new(Arc::clone(&service))));

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    let mut view = ClientView::new();
    view.set_current_conversation(conversation_id);

    let placeholder = ConversationStore::sanitize(
        Message::builder(Role::User)
            .with_part(Part::text("[Uploaded file: notes.txt]"))
            .with_metadata(
                MessageMetadata::for_conversation(conversation_id).marked_file_upload(),
            )
            .build()
            .expect("valid message"),
    );
    view.push_local_message(placeholder.clone());

    view.refresh(&client).await;
    assert!(
        view.messages()
            .iter()
            .any(|m| m.message_id() == placeholder.message_id())
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_group_under_their_conversation() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("reply"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;
    let client = ConversationClient::new(Arc::new(LocalTransport::new(Arc::clone(&service))));

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();
    service.send_message(user_message(conversation_id, "work"))?;
    wait_until_idle(&service).await?;

    let mut view = ClientView::new();
    view.set_current_conversation(conversation_id);
    view.refresh(&client).await;

    assert_eq!(view.tasks().len(), 1);
    assert_eq!(view.tasks()[0].conversation_id, Some(conversation_id));
    Ok(())
}

/// A backend hiccup degrades every read to an empty result; nothing
/// errors and the next poll recovers.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_failures_degrade_to_empty() {
    let client = ConversationClient::new(Arc::new(FailingTransport));

    let mut view = ClientView::new();
    view.refresh(&client).await;

    assert!(view.conversations().is_empty());
    assert!(view.tasks().is_empty());
    assert!(view.pending().is_empty());
}
