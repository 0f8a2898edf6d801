//! Signature compositor
//!
//! Splices captured signature blocks into rendered document HTML. Two
//! mutually exclusive placement modes, chosen once per signing session:
//!
//! - Embedded: heuristic insertion immediately before the first
//!   case-insensitive mention of a role keyword. A template that never
//!   mentions the keyword silently gets no block for that signer.
//! - End: the literal `{{SELLER_SIGNATURE_COMPONENT}}` and
//!   `{{BROKER_SIGNATURE_COMPONENT}}` tokens are each replaced with the
//!   signer's block, or with the empty string when that slot is unsigned.
//!   On finalize, a structural signatures section (or an "AGREED AND
//!   ACCEPTED" heading) takes precedence over token substitution and is
//!   replaced wholesale with a two-column container.
//!
//! The content is treated as a flat string; anchors are regex matches, not
//! parsed nodes. Re-invocation assumes the pristine unsigned render as
//! input; already-spliced output is never a valid argument, so callers keep
//! the pristine render separate from the live preview.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{SignatureData, SignaturePosition, SignatureSet, SignedDocument, SignerRole};
use thiserror::Error;

/// End-mode marker tokens
pub const SELLER_TOKEN: &str = "{{SELLER_SIGNATURE_COMPONENT}}";
pub const BROKER_TOKEN: &str = "{{BROKER_SIGNATURE_COMPONENT}}";

lazy_static! {
    static ref SELLER_ANCHOR: Regex = Regex::new(r"(?i)seller|landlord").unwrap();
    static ref BROKER_ANCHOR: Regex = Regex::new(r"(?i)broker|agent").unwrap();
    // Flat-string scan: the section ends at the first closing div.
    static ref SIGNATURES_SECTION: Regex =
        Regex::new(r#"(?is)<div class="signatures-section">.*?</div>"#).unwrap();
    static ref AGREED_HEADING: Regex =
        Regex::new(r"(?is)<h2>\s*AGREED AND ACCEPTED\s*</h2>.*$").unwrap();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Cannot finalize: no signatures have been captured")]
    NoSignatures,
}

/// Finalize is only offered once at least one slot is signed.
pub fn can_finalize(set: &SignatureSet) -> bool {
    set.has_any()
}

/// One framed signature block: image, role label with signer name, date.
fn signature_block(role: SignerRole, sig: &SignatureData) -> String {
    format!(
        r#"<div class="signature-block"><img src="{src}" alt="{label} signature" /><p class="signature-name">{label}: {name}</p><p class="signature-date">Date: {date}</p></div>"#,
        src = sig.data_url,
        label = role.label(),
        name = sig.signer_name,
        date = sig.signer_date,
    )
}

/// The two-column container used when a structural section is replaced.
/// Column widths are also pinned inline because the host document's styling
/// is unpredictable.
fn two_column_container(set: &SignatureSet) -> String {
    let mut columns = String::new();
    for (role, sig) in set.signed() {
        columns.push_str(&format!(
            r#"<div class="signature-column" style="display:inline-block;width:45%;margin-right:5%;vertical-align:top;">{}</div>"#,
            signature_block(role, sig)
        ));
    }
    format!(r#"<div class="signatures-section">{}</div>"#, columns)
}

/// Splice `insert` into `content` at byte offset `at`.
fn splice(content: &str, at: usize, end: usize, insert: &str) -> String {
    let mut out = String::with_capacity(content.len() + insert.len());
    out.push_str(&content[..at]);
    out.push_str(insert);
    out.push_str(&content[end..]);
    out
}

/// Embedded mode: insert the block immediately before the first anchor
/// match. No match means no attachment; the silent path is intentional and
/// only logged.
fn insert_before_anchor(
    content: &str,
    anchor: &Regex,
    role: SignerRole,
    sig: &SignatureData,
) -> String {
    match anchor.find(content) {
        Some(m) => {
            let at = m.start();
            splice(content, at, at, &signature_block(role, sig))
        }
        None => {
            tracing::debug!(
                role = %role,
                "no anchor keyword in document; signature not attached"
            );
            content.to_string()
        }
    }
}

/// End mode: marker tokens become the signer's block or the empty string.
fn substitute_tokens(content: &str, set: &SignatureSet) -> String {
    let seller = set
        .seller
        .as_ref()
        .map(|s| signature_block(SignerRole::Seller, s))
        .unwrap_or_default();
    let broker = set
        .broker
        .as_ref()
        .map(|s| signature_block(SignerRole::Broker, s))
        .unwrap_or_default();
    content
        .replace(SELLER_TOKEN, &seller)
        .replace(BROKER_TOKEN, &broker)
}

/// Apply the selected placement mode to the pristine rendered content.
pub fn compose(content: &str, set: &SignatureSet, position: SignaturePosition) -> String {
    match position {
        SignaturePosition::Embedded => {
            let mut out = content.to_string();
            if let Some(sig) = &set.seller {
                out = insert_before_anchor(&out, &SELLER_ANCHOR, SignerRole::Seller, sig);
            }
            if let Some(sig) = &set.broker {
                out = insert_before_anchor(&out, &BROKER_ANCHOR, SignerRole::Broker, sig);
            }
            out
        }
        SignaturePosition::End => substitute_tokens(content, set),
    }
}

/// Commit the captured signatures into the document content.
///
/// End mode prefers structural replacement: a
/// `<div class="signatures-section">` block is checked first, then an
/// `<h2>AGREED AND ACCEPTED</h2>` block; either is replaced wholesale by the
/// two-column container and any marker tokens left elsewhere are scrubbed so
/// no duplicate blocks or token artifacts remain. Only when neither
/// structure exists does finalize fall back to token substitution.
pub fn finalize(
    content: &str,
    set: &SignatureSet,
    position: SignaturePosition,
    signed_by: &str,
) -> Result<SignedDocument, ComposeError> {
    if !can_finalize(set) {
        return Err(ComposeError::NoSignatures);
    }

    let composed = match position {
        SignaturePosition::Embedded => compose(content, set, position),
        SignaturePosition::End => {
            if let Some(m) = SIGNATURES_SECTION.find(content) {
                let replaced = splice(content, m.start(), m.end(), &two_column_container(set));
                scrub_tokens(&replaced)
            } else if let Some(m) = AGREED_HEADING.find(content) {
                let replaced = splice(content, m.start(), m.end(), &two_column_container(set));
                scrub_tokens(&replaced)
            } else {
                substitute_tokens(content, set)
            }
        }
    };

    Ok(SignedDocument {
        content: composed,
        signed_by: signed_by.to_string(),
        signed_at: Utc::now(),
        signatures: set.clone(),
    })
}

fn scrub_tokens(content: &str) -> String {
    content.replace(SELLER_TOKEN, "").replace(BROKER_TOKEN, "")
}
