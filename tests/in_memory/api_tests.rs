//! The typed client against the full envelope surface.

use std::sync::Arc;

use rstest::rstest;

use switchboard::client::ConversationClient;
use switchboard::conversation::domain::Role;
use switchboard::host::router::StaticRouter;
use switchboard::remote::adapters::ScriptedTransport;

use crate::in_memory::helpers::{
    LocalTransport, card, service_with, user_message, wait_until_idle,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_method_round_trips_through_the_envelope() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("over the wire"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;
    let client = ConversationClient::new(Arc::new(LocalTransport::new(Arc::clone(&service))));

    // Agent management.
    let registered = client.register_agent("http://alpha.example").await?;
    assert_eq!(registered.name.as_str(), "alpha");
    let agents = client.list_agents().await?;
    assert_eq!(agents.len(), 1);

    // Credential update.
    client.update_credential("wire-credential").await?;

    // Conversation lifecycle.
    let conversation = client.create_conversation().await?;
    let conversation_id = conversation.conversation_id();
    let conversations = client.list_conversations().await?;
    assert_eq!(conversations.len(), 1);

    // Send and poll.
    let info = client
        .send_message(&user_message(conversation_id, "hello"))
        .await?;
    assert_eq!(info.conversation_id, Some(conversation_id));
    wait_until_idle(&service).await?;
    assert!(client.pending_messages().await?.is_empty());

    let messages = client.list_messages(conversation_id).await?;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role(), Role::Agent);
    assert_eq!(messages[1].text_content(), "over the wire");

    // Tasks and events.
    assert_eq!(client.list_tasks().await?.len(), 1);
    assert!(!client.list_events().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backend_errors_surface_as_client_errors() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("unused"),
        StaticRouter::abstaining(),
        vec![card("alpha", false)],
    )
    .await;
    let client = ConversationClient::new(Arc::new(LocalTransport::new(service)));

    // Registering a dead peer travels back as an envelope error.
    let result = client.register_agent("http://nowhere.example").await;
    assert!(result.is_err());
    Ok(())
}
