use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input kind of a template field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Checkbox,
}

/// One entry of a template's field-descriptor list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateField {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// A stored document template: HTML with `{{token}}` placeholders plus the
/// ordered field descriptors. Immutable once referenced by a document;
/// versioning means creating a new row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub id: String,
    pub name: String,
    pub document_type: String,
    pub template_content: String,
    pub template_fields: Vec<TemplateField>,
    pub created_at: DateTime<Utc>,
}

/// Document lifecycle status. Transition legality (draft -> finalized ->
/// signed) is caller convention, not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Finalized,
    Signed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Draft => write!(f, "draft"),
            DocumentStatus::Finalized => write!(f, "finalized"),
            DocumentStatus::Signed => write!(f, "signed"),
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DocumentStatus::Draft),
            "finalized" => Ok(DocumentStatus::Finalized),
            "signed" => Ok(DocumentStatus::Signed),
            other => Err(format!("Unknown document status: {}", other)),
        }
    }
}

/// A document instance. Owns its `field_values` snapshot; template changes
/// after creation are never re-resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub template_id: String,
    pub document_name: String,
    pub field_values: HashMap<String, serde_json::Value>,
    /// Rendered HTML. Pure function of (template_content, field_values)
    /// until a signature pass is applied.
    pub content: Option<String>,
    pub document_status: DocumentStatus,
    /// Populated by an external render step, never here.
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How a signature image was acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureKind {
    Drawn,
    Upload,
}

/// A captured signature. Transient client state until it is embedded into a
/// finalized document or written to a signature record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureData {
    pub kind: SignatureKind,
    /// Base64 image as a `data:` URL
    pub data_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub signer_name: String,
    pub signer_date: String,
}

/// Named signer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerRole {
    Seller,
    Broker,
}

impl SignerRole {
    /// Label printed next to the signature image
    pub fn label(&self) -> &'static str {
        match self {
            SignerRole::Seller => "Seller/Landlord",
            SignerRole::Broker => "Broker/Agent",
        }
    }
}

impl std::fmt::Display for SignerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignerRole::Seller => write!(f, "seller"),
            SignerRole::Broker => write!(f, "broker"),
        }
    }
}

/// Signature placement strategy, chosen once per signing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignaturePosition {
    /// Heuristic inline insertion near role keywords
    Embedded,
    /// Fixed marker tokens at the end of the document
    End,
}

/// The two signer slots of a signing session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureSet {
    pub seller: Option<SignatureData>,
    pub broker: Option<SignatureData>,
}

impl SignatureSet {
    pub fn get(&self, role: SignerRole) -> Option<&SignatureData> {
        match role {
            SignerRole::Seller => self.seller.as_ref(),
            SignerRole::Broker => self.broker.as_ref(),
        }
    }

    /// At least one slot captured
    pub fn has_any(&self) -> bool {
        self.seller.is_some() || self.broker.is_some()
    }

    /// Signed slots in seller-then-broker order
    pub fn signed(&self) -> Vec<(SignerRole, &SignatureData)> {
        let mut out = Vec::new();
        if let Some(sig) = &self.seller {
            out.push((SignerRole::Seller, sig));
        }
        if let Some(sig) = &self.broker {
            out.push((SignerRole::Broker, sig));
        }
        out
    }
}

/// Output of the finalize step: content with signature markup embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedDocument {
    pub content: String,
    pub signed_by: String,
    pub signed_at: DateTime<Utc>,
    pub signatures: SignatureSet,
}

/// One row of the back-office activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub activity_type: String,
    pub description: String,
    pub entity_type: String,
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}
