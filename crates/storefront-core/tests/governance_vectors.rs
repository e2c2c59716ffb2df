//! Governance lane vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use storefront_core::protocol::governance::{GovernanceDocument, GovernancePolicy};

use vector_loader::load;

fn strings(v: &serde_json::Value) -> Vec<String> {
    v.as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn governance_vectors() {
    let files = [
        "governance_full.json",
        "governance_partial.json",
        "governance_empty.json",
        "governance_bad_shape.json",
        "governance_null_fields.json",
        "governance_authorities_malformed.json",
    ];

    for f in files {
        let v = load(f);
        let res = GovernanceDocument::from_json(&v.document_text());

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let doc = res.expect("expected ok document");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(
            doc.authorities.len() as u64,
            ex["authorities"].as_u64().unwrap(),
            "vector={}",
            v.description
        );

        let policy = doc
            .effective_policies
            .as_ref()
            .map(GovernancePolicy::from_effective)
            .unwrap_or_default();

        let prohibited: Vec<String> = policy.prohibited_verticals.iter().cloned().collect();
        assert_eq!(prohibited, strings(&ex["prohibited"]), "vector={}", v.description);

        for feat in strings(&ex["denied_features"]) {
            assert!(!policy.feature_allowed(&feat), "vector={} feature={feat}", v.description);
        }
        for feat in strings(&ex["allowed_features"]) {
            assert!(policy.feature_allowed(&feat), "vector={} feature={feat}", v.description);
        }
    }
}

#[test]
fn vertical_match_is_case_insensitive() {
    let doc = GovernanceDocument::from_json(
        r#"{ "effective_policies": { "prohibited_verticals": ["firearms"] } }"#,
    )
    .unwrap();
    let policy = GovernancePolicy::from_effective(doc.effective_policies.as_ref().unwrap());

    assert!(!policy.vertical_allowed("Firearms"));
    assert!(!policy.vertical_allowed(" FIREARMS "));
    assert!(policy.vertical_allowed("toys"));
    assert!(policy.vertical_allowed(""));
}

#[test]
fn null_authorities_keep_effective_policies() {
    let doc = GovernanceDocument::from_json(
        r#"{ "authorities": null, "effective_policies": { "prohibited_verticals": ["firearms"] } }"#,
    )
    .unwrap();
    assert!(doc.authorities.is_empty());
    let policy = GovernancePolicy::from_effective(doc.effective_policies.as_ref().unwrap());
    assert!(!policy.vertical_allowed("firearms"));
}

#[test]
fn one_bad_authority_does_not_drop_the_others() {
    let doc = GovernanceDocument::from_json(
        r#"{ "authorities": [{ "id": "ok", "priority": 1 }, { "priority": "high" }, 7] }"#,
    )
    .unwrap();
    assert_eq!(doc.authorities.len(), 1);
    assert_eq!(doc.authorities[0].id, "ok");
    assert_eq!(doc.authorities[0].priority, 1);
}
