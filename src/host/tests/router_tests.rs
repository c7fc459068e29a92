//! Unit tests for the routing prompt.

use rstest::rstest;

use crate::host::router::RoutingRequest;
use crate::registry::domain::AgentSummary;

#[rstest]
fn prompt_lists_agents_and_request() {
    let agents = vec![
        AgentSummary {
            name: "alpha".into(),
            description: "handles alpha things".into(),
            url: "http://alpha.example".into(),
        },
        AgentSummary {
            name: "beta".into(),
            description: "handles beta things".into(),
            url: "http://beta.example".into(),
        },
    ];

    let prompt = RoutingRequest::new("please check this resume", &agents)
        .prompt()
        .expect("renders");

    assert!(prompt.contains("alpha: handles alpha things (http://alpha.example)"));
    assert!(prompt.contains("beta: handles beta things (http://beta.example)"));
    assert!(prompt.contains("please check this resume"));
}

#[rstest]
fn prompt_renders_with_no_agents() {
    let prompt = RoutingRequest::new("anything", &[])
        .prompt()
        .expect("renders");
    assert!(prompt.contains("anything"));
}
