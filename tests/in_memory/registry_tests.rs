//! Agent registration over the service facade.

use rstest::rstest;

use switchboard::host::router::StaticRouter;
use switchboard::remote::adapters::ScriptedTransport;

use crate::in_memory::helpers::{card, service_with};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_registration_skips_dead_peers() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("ok"),
        StaticRouter::abstaining(),
        vec![card("alpha", false), card("beta", false)],
    )
    .await;

    // The two live agents are already registered by the helper; a second
    // batch mixing a dead peer must still succeed.
    let outcome = service
        .register_agents(["http://alpha.example", "http://nowhere.example"])
        .await?;

    assert_eq!(outcome.registered.len(), 1);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].url, "http://nowhere.example");

    let agents = service.list_agents()?;
    let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["alpha", "beta"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn single_registration_of_dead_peer_fails() -> eyre::Result<()> {
    let service = service_with(
        ScriptedTransport::completing_with("ok"),
        StaticRouter::abstaining(),
        vec![card("alpha", false)],
    )
    .await;

    let result = service.register_agent("http://nowhere.example").await;
    assert!(result.is_err());
    Ok(())
}
