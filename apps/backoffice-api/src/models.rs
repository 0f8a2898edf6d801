//! Data models for the back-office API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{
    ActivityEntry, SignaturePosition, SignatureSet, SignerRole, TemplateField,
};
use sqlx::FromRow;
use std::collections::HashMap;

/// Template row as stored
#[derive(Debug, Clone, FromRow)]
pub struct DbTemplate {
    pub id: String,
    pub name: String,
    pub document_type: String,
    pub template_content: String,
    pub template_fields_json: String,
    pub created_at: DateTime<Utc>,
}

/// Document row as stored
#[derive(Debug, Clone, FromRow)]
pub struct DbDocument {
    pub id: String,
    pub template_id: String,
    pub document_name: String,
    pub field_values_json: String,
    pub content: Option<String>,
    pub content_hash: Option<String>,
    pub document_status: String,
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Activity row as stored
#[derive(Debug, Clone, FromRow)]
pub struct DbActivity {
    pub id: String,
    pub activity_type: String,
    pub description: String,
    pub entity_type: String,
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbActivity> for ActivityEntry {
    fn from(row: DbActivity) -> Self {
        ActivityEntry {
            id: row.id,
            activity_type: row.activity_type,
            description: row.description,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            created_at: row.created_at,
        }
    }
}

/// Request to create a template
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub document_type: String,
    pub template_content: String,
    pub template_fields: Vec<TemplateField>,
}

/// Request to create a document from a template
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub document_name: String,
    pub template_id: String,
    #[serde(default)]
    pub field_values: HashMap<String, serde_json::Value>,
}

/// Request to move a document along its lifecycle. Transition legality is
/// caller convention; the service records the new status as given.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub document_status: shared_types::DocumentStatus,
}

/// Which of the two render variants to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderModeParam {
    Preview,
    Final,
}

impl From<RenderModeParam> for render_engine::RenderMode {
    fn from(mode: RenderModeParam) -> Self {
        match mode {
            RenderModeParam::Preview => render_engine::RenderMode::Preview,
            RenderModeParam::Final => render_engine::RenderMode::Final,
        }
    }
}

/// Request to render a document
#[derive(Debug, Clone, Deserialize)]
pub struct RenderDocumentRequest {
    pub mode: RenderModeParam,
}

/// Rendered HTML
#[derive(Debug, Clone, Serialize)]
pub struct RenderDocumentResponse {
    pub html: String,
}

/// Request to commit captured signatures into a document
#[derive(Debug, Clone, Deserialize)]
pub struct SignDocumentRequest {
    pub signatures: SignatureSet,
    pub signature_position: SignaturePosition,
    pub signed_by: String,
}

/// Signature persistence payload from the signing ceremony
#[derive(Debug, Clone, Deserialize)]
pub struct RecordSignatureRequest {
    #[serde(rename = "documentId")]
    pub document_id: String,
    #[serde(rename = "signerName")]
    pub signer_name: String,
    #[serde(rename = "signerEmail")]
    pub signer_email: String,
    #[serde(rename = "signerType")]
    pub signer_type: SignerRole,
    #[serde(rename = "signatureData")]
    pub signature_data: String,
    #[serde(rename = "signatureCoordinates", default)]
    pub signature_coordinates: Option<serde_json::Value>,
    #[serde(rename = "deviceInfo", default)]
    pub device_info: Option<serde_json::Value>,
    #[serde(rename = "signingSessionId")]
    pub signing_session_id: String,
}

/// Response after persisting a signature record
#[derive(Debug, Clone, Serialize)]
pub struct RecordSignatureResponse {
    pub success: bool,
    pub signature_id: String,
}

/// Dashboard aggregation
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub documents_total: i64,
    pub documents_draft: i64,
    pub documents_finalized: i64,
    pub documents_signed: i64,
    pub templates_total: i64,
    pub signatures_total: i64,
    pub recent_activity: i64,
}
