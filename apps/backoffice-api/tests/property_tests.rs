//! Property-based tests for backoffice-api
//!
//! Tests the API model shapes and the render/compose pipeline the handlers
//! drive, using proptest.

use proptest::prelude::*;
use shared_types::{SignatureData, SignatureKind, SignaturePosition, SignatureSet};
use std::collections::HashMap;

// ============================================================
// Identifier and status shapes
// ============================================================

/// Valid document/template IDs are UUIDs (36 characters with hyphens)
fn valid_id() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

fn drawn_signature(name: &str) -> SignatureData {
    SignatureData {
        kind: SignatureKind::Drawn,
        data_url: "data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=".to_string(),
        file_name: None,
        timestamp: chrono::Utc::now(),
        signer_name: name.to_string(),
        signer_date: "2026-08-07".to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn valid_ids_are_36_chars(id in valid_id()) {
        prop_assert_eq!(id.len(), 36);
        prop_assert!(id.chars().all(|c| c.is_ascii_hexdigit() || c == '-'));
    }

    #[test]
    fn malformed_ids_dont_match_uuid_pattern(id in "[a-z]{1,10}") {
        let uuid_pattern = regex::Regex::new(
            r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"
        ).unwrap();
        prop_assert!(!uuid_pattern.is_match(&id));
    }

    #[test]
    fn status_strings_roundtrip(
        status in prop_oneof![
            Just(shared_types::DocumentStatus::Draft),
            Just(shared_types::DocumentStatus::Finalized),
            Just(shared_types::DocumentStatus::Signed),
        ]
    ) {
        let parsed: shared_types::DocumentStatus = status.to_string().parse().unwrap();
        prop_assert_eq!(parsed, status);
    }

    #[test]
    fn unknown_status_strings_are_rejected(s in "[a-z]{1,12}") {
        prop_assume!(!matches!(s.as_str(), "draft" | "finalized" | "signed"));
        prop_assert!(s.parse::<shared_types::DocumentStatus>().is_err());
    }

    // ============================================================
    // Render pipeline properties
    // ============================================================

    /// Every mapped placeholder is substituted; the mapped name never
    /// survives in token form.
    #[test]
    fn mapped_placeholders_never_survive(
        name in "[a-z_]{1,16}",
        value in "[A-Za-z0-9 ]{0,30}",
    ) {
        let template = format!("<p>{{{{{}}}}}</p>", name);
        let mut values = HashMap::new();
        values.insert(name.clone(), serde_json::json!(value));

        let out = render_engine::render(&template, &values, render_engine::RenderMode::Final);
        let placeholder = format!("{{{{{}}}}}", name);
        prop_assert!(!out.contains(&placeholder));
        prop_assert!(out.contains(&value));
    }

    /// Unmapped placeholders always survive byte-for-byte.
    #[test]
    fn unmapped_placeholders_survive(name in "[a-z_]{1,16}") {
        let template = format!("before {{{{{}}}}} after", name);
        let out = render_engine::render(&template, &HashMap::new(), render_engine::RenderMode::Final);
        prop_assert_eq!(out, template);
    }

    /// Final render of a template without placeholders is the identity.
    #[test]
    fn render_without_placeholders_is_identity(body in "[A-Za-z0-9 <>/.,]{0,100}") {
        prop_assume!(!body.contains("{{"));
        let out = render_engine::render(&body, &HashMap::new(), render_engine::RenderMode::Final);
        prop_assert_eq!(out, body);
    }

    // ============================================================
    // Compose pipeline properties
    // ============================================================

    /// End-mode composition never leaves marker tokens behind.
    #[test]
    fn end_mode_scrubs_tokens(
        body in "[A-Za-z0-9 ]{0,40}",
        seller_signed in any::<bool>(),
    ) {
        let template = format!(
            "<p>{}</p>{{{{SELLER_SIGNATURE_COMPONENT}}}}{{{{BROKER_SIGNATURE_COMPONENT}}}}",
            body
        );
        let set = SignatureSet {
            seller: seller_signed.then(|| drawn_signature("Jane Doe")),
            broker: None,
        };

        let out = signing_core::compose(&template, &set, SignaturePosition::End);
        prop_assert!(!out.contains("SIGNATURE_COMPONENT"));

        let expected_blocks = if seller_signed { 1 } else { 0 };
        prop_assert_eq!(out.matches("signature-block").count(), expected_blocks);
    }

    /// Finalize requires at least one signature, always.
    #[test]
    fn finalize_rejects_empty_set(body in "[A-Za-z0-9 ]{0,40}") {
        let result = signing_core::finalize(
            &body,
            &SignatureSet::default(),
            SignaturePosition::End,
            "nobody",
        );
        prop_assert!(result.is_err());
    }

    /// The signed-by attribution is preserved through finalize.
    #[test]
    fn finalize_preserves_attribution(signed_by in "[A-Za-z ]{1,30}") {
        let set = SignatureSet {
            seller: Some(drawn_signature("Jane Doe")),
            broker: None,
        };
        let signed = signing_core::finalize(
            "<p>The seller agrees.</p>",
            &set,
            SignaturePosition::Embedded,
            &signed_by,
        ).unwrap();
        prop_assert_eq!(signed.signed_by, signed_by);
    }

    // ============================================================
    // Signature payload shapes
    // ============================================================

    #[test]
    fn base64_data_url_format(data in "[A-Za-z0-9+/]{20,200}") {
        let data_url = format!("data:image/png;base64,{}", data);
        prop_assert!(data_url.starts_with("data:image/"));
        prop_assert!(data_url.contains(";base64,"));
    }

    #[test]
    fn signer_types_are_valid(
        signer_type in prop_oneof![Just("seller"), Just("broker")]
    ) {
        let valid_types = ["seller", "broker"];
        prop_assert!(valid_types.contains(&signer_type));
    }
}

// ============================================================
// Wire-format regression tests
// ============================================================

#[test]
fn signature_record_payload_uses_camel_case() {
    // The signing ceremony client sends camelCase keys; a rename must not
    // break silently.
    let payload = serde_json::json!({
        "documentId": "d-1",
        "signerName": "Jane Doe",
        "signerEmail": "jane@example.com",
        "signerType": "seller",
        "signatureData": "data:image/png;base64,AAAA",
        "signingSessionId": "s-1",
    });

    let parsed: shared_types::SignerRole =
        serde_json::from_value(payload["signerType"].clone()).unwrap();
    assert_eq!(parsed, shared_types::SignerRole::Seller);
}

#[test]
fn signature_set_wire_shape() {
    let set = SignatureSet {
        seller: Some(drawn_signature("Jane Doe")),
        broker: None,
    };
    let json = serde_json::to_value(&set).unwrap();
    assert!(json["seller"].is_object());
    assert!(json["broker"].is_null());
    assert_eq!(json["seller"]["kind"], "drawn");
}
