//! End-to-end tests for the send → dispatch → poll pipeline.

use rstest::rstest;

use switchboard::conversation::domain::Role;
use switchboard::host::router::StaticRouter;
use switchboard::remote::adapters::ScriptedTransport;
use switchboard::task::domain::TaskState;

use crate::in_memory::helpers::{card, service_with, user_message, wait_until_idle};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn send_message_produces_agent_reply() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("hello from alpha"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    let info = service.send_message(user_message(conversation_id, "hi"))?;
    assert_eq!(info.conversation_id, Some(conversation_id));

    wait_until_idle(&service).await?;

    let messages = service.list_messages(conversation_id)?;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role(), Role::User);
    assert_eq!(messages[1].role(), Role::Agent);
    assert_eq!(messages[1].text_content(), "hello from alpha");

    let tasks = service.list_tasks()?;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status().state, TaskState::Completed);
    assert_eq!(tasks[0].conversation_id(), Some(conversation_id));

    // One event for the inbound message, one for the reply.
    assert_eq!(service.list_events()?.len(), 2);

    // The completed exchange leaves the session inactive.
    let session = service
        .orchestrator()
        .session(conversation_id)?
        .expect("session exists");
    assert!(!session.session_active);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sending_to_unknown_conversation_is_rejected() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("never runs"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;

    let result = service.send_message(user_message(
        switchboard::conversation::domain::ConversationId::new(),
        "into the void",
    ));
    assert!(result.is_err());
    Ok(())
}

/// A failed dispatch becomes an agent-role error entry in the
/// conversation, never a silent no-op.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_dispatch_leaves_error_entry() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::replying_in_state(TaskState::Failed),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    service.send_message(user_message(conversation_id, "doomed"))?;
    wait_until_idle(&service).await?;

    let messages = service.list_messages(conversation_id)?;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role(), Role::Agent);
    assert!(messages[1].text_content().contains("failed"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_failure_leaves_error_entry() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::failing_with("connection reset"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    service.send_message(user_message(conversation_id, "unlucky"))?;
    wait_until_idle(&service).await?;

    let messages = service.list_messages(conversation_id)?;
    assert_eq!(messages.len(), 2);
    assert!(messages[1].text_content().contains("connection reset"));
    Ok(())
}

/// Concurrent sends within one conversation all complete and none of the
/// appended messages is lost.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_sends_lose_nothing() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("ack"),
        StaticRouter::picking("alpha"),
        vec![card("alpha", false)],
    )
    .await;

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    for i in 0..8 {
        service.send_message(user_message(conversation_id, &format!("msg-{i}")))?;
    }
    wait_until_idle(&service).await?;

    let messages = service.list_messages(conversation_id)?;
    let users = messages.iter().filter(|m| m.role() == Role::User).count();
    let agents = messages.iter().filter(|m| m.role() == Role::Agent).count();
    assert_eq!(users, 8);
    assert_eq!(agents, 8);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn streaming_agent_round_trips() -> eyre::Result<()> {
    use switchboard::conversation::domain::Part;
    use switchboard::remote::domain::TaskUpdate;
    use switchboard::task::domain::{Artifact, TaskStatus};

    let updates = vec![
        TaskUpdate::Status {
            status: TaskStatus::new(TaskState::Working),
            is_final: false,
        },
        TaskUpdate::Artifact {
            artifact: Artifact::new(vec![Part::text("streamed result")]).with_name("out"),
        },
        TaskUpdate::Status {
            status: TaskStatus::new(TaskState::Completed),
            is_final: true,
        },
    ];
    let service = service_with(
        ScriptedTransport::streaming(updates),
        StaticRouter::picking("alpha"),
        vec![card("alpha", true)],
    )
    .await;

    let conversation = service.create_conversation()?;
    let conversation_id = conversation.conversation_id();

    service.send_message(user_message(conversation_id, "stream it"))?;
    wait_until_idle(&service).await?;

    let messages = service.list_messages(conversation_id)?;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text_content(), "streamed result");

    let tasks = service.list_tasks()?;
    assert_eq!(tasks[0].status().state, TaskState::Completed);
    assert_eq!(tasks[0].artifacts().len(), 1);
    Ok(())
}
