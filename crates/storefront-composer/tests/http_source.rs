#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_composer::policy::{GateSettings, GovernanceGate, GovernanceSource, HttpGovernanceSource};

fn source(server: &MockServer) -> HttpGovernanceSource {
    HttpGovernanceSource::new(format!("{}/", server.uri()), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn fetches_document_for_tenant() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants/acme/governance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authorities": [{ "id": "a1", "name": "EU Trade", "scope": "region", "priority": 10 }],
            "effective_policies": {
                "prohibited_verticals": ["Firearms"],
                "commerce_features": { "reviews": false }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let doc = source(&server).fetch("acme").await.unwrap().expect("document");
    assert_eq!(doc.authorities.len(), 1);
    assert_eq!(doc.authorities[0].id, "a1");
    let eff = doc.effective_policies.expect("effective policies");
    assert_eq!(eff.prohibited_verticals.unwrap(), vec!["Firearms".to_string()]);
}

#[tokio::test]
async fn not_found_means_no_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants/globex/governance"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(source(&server).fetch("globex").await.unwrap().is_none());
}

#[tokio::test]
async fn server_error_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = source(&server).fetch("acme").await.expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UPSTREAM");
}

#[tokio::test]
async fn malformed_body_fails_open_through_the_gate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let gate = GovernanceGate::new(Arc::new(source(&server)), GateSettings::default());
    assert!(gate.fetch_policy("acme").await.is_none());

    let view = gate.policy("acme");
    assert!(view.vertical_allowed("firearms"));
    assert!(view.feature_allowed("reviews"));
}
