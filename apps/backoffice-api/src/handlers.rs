//! HTTP handlers for the back-office API

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use render_engine::{collect_values, render};
use shared_types::{Document, DocumentStatus, DocumentTemplate};
use signing_core::finalize;

use crate::error::ApiError;
use crate::leads::{score_lead, LeadProfile, LeadScore};
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

// ============================================================
// Templates
// ============================================================

/// Create a new document template
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<Json<DocumentTemplate>, ApiError> {
    if req.template_content.is_empty() {
        return Err(ApiError::InvalidRequest(
            "Template content must not be empty".into(),
        ));
    }

    let template_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let fields_json = serde_json::to_string(&req.template_fields)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid template fields: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO templates (id, name, document_type, template_content, template_fields_json, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&template_id)
    .bind(&req.name)
    .bind(&req.document_type)
    .bind(&req.template_content)
    .bind(&fields_json)
    .bind(now.to_rfc3339())
    .execute(&state.db)
    .await?;

    tracing::info!("Created template: {}", template_id);

    // Independent write: not transactional with the insert above
    log_activity(
        &state,
        "template_created",
        &format!("Template '{}' created", req.name),
        "template",
        &template_id,
    )
    .await?;

    Ok(Json(DocumentTemplate {
        id: template_id,
        name: req.name,
        document_type: req.document_type,
        template_content: req.template_content,
        template_fields: req.template_fields,
        created_at: now,
    }))
}

/// List all templates
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DocumentTemplate>>, ApiError> {
    let rows: Vec<DbTemplate> = sqlx::query_as(
        r#"
        SELECT id, name, document_type, template_content, template_fields_json, created_at
        FROM templates
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    let templates = rows
        .into_iter()
        .map(parse_template)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(templates))
}

/// Get a template by ID
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentTemplate>, ApiError> {
    let template = fetch_template(&state, &id).await?;
    Ok(Json(parse_template(template)?))
}

// ============================================================
// Documents
// ============================================================

/// Create a document from a template.
///
/// The field values are validated against the template's descriptors and
/// the final render is snapshotted; the document never re-resolves template
/// changes after this point.
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<Json<Document>, ApiError> {
    let template = parse_template(fetch_template(&state, &req.template_id).await?)?;

    let values = collect_values(&template.template_fields, &req.field_values)?;
    let content = render(
        &template.template_content,
        &values,
        render_engine::RenderMode::Final,
    );
    let content_hash = hex::encode(Sha256::digest(content.as_bytes()));

    let document_id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let values_json =
        serde_json::to_string(&values).map_err(|e| ApiError::Internal(e.into()))?;

    sqlx::query(
        r#"
        INSERT INTO documents (id, template_id, document_name, field_values_json, content, content_hash, document_status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 'draft', ?, ?)
        "#,
    )
    .bind(&document_id)
    .bind(&req.template_id)
    .bind(&req.document_name)
    .bind(&values_json)
    .bind(&content)
    .bind(&content_hash)
    .bind(now.to_rfc3339())
    .bind(now.to_rfc3339())
    .execute(&state.db)
    .await?;

    tracing::info!("Created document: {}", document_id);

    // Independent write: not transactional with the insert above
    log_activity(
        &state,
        "document_created",
        &format!("Document '{}' created", req.document_name),
        "document",
        &document_id,
    )
    .await?;

    Ok(Json(Document {
        id: document_id,
        template_id: req.template_id,
        document_name: req.document_name,
        field_values: values,
        content: Some(content),
        document_status: DocumentStatus::Draft,
        pdf_url: None,
        created_at: now,
        updated_at: now,
    }))
}

/// Get a document by ID
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let row = fetch_document(&state, &id).await?;
    Ok(Json(parse_document(row)?))
}

/// Update a document's lifecycle status. The draft -> finalized -> signed
/// convention is enforced by the caller, not validated here.
pub async fn update_document_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Document>, ApiError> {
    // Existence check first so a miss is a 404, not a silent no-op
    fetch_document(&state, &id).await?;

    sqlx::query(
        r#"
        UPDATE documents SET document_status = ?, updated_at = ? WHERE id = ?
        "#,
    )
    .bind(req.document_status.to_string())
    .bind(Utc::now().to_rfc3339())
    .bind(&id)
    .execute(&state.db)
    .await?;

    tracing::info!("Document {} status -> {}", id, req.document_status);

    let row = fetch_document(&state, &id).await?;
    Ok(Json(parse_document(row)?))
}

/// Render a document in preview or final mode.
///
/// The template is looked up live (weak reference); the stored snapshot is
/// untouched by this endpoint.
pub async fn render_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RenderDocumentRequest>,
) -> Result<Json<RenderDocumentResponse>, ApiError> {
    let row = fetch_document(&state, &id).await?;
    let document = parse_document(row)?;
    let template = parse_template(fetch_template(&state, &document.template_id).await?)?;

    let html = render(
        &template.template_content,
        &document.field_values,
        req.mode.into(),
    );

    Ok(Json(RenderDocumentResponse { html }))
}

/// Commit captured signatures into a document.
///
/// Applies the compositor against the pristine stored content, persists the
/// spliced result, records one signature row per signer, then logs activity.
/// The writes are individual awaited calls with no shared transaction; a
/// failure midway leaves earlier writes in place.
pub async fn sign_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SignDocumentRequest>,
) -> Result<Json<Document>, ApiError> {
    let row = fetch_document(&state, &id).await?;
    let document = parse_document(row)?;

    let content = document.content.as_deref().ok_or_else(|| {
        ApiError::InvalidRequest("Document has no rendered content to sign".into())
    })?;

    let signed = finalize(
        content,
        &req.signatures,
        req.signature_position,
        &req.signed_by,
    )?;
    let content_hash = hex::encode(Sha256::digest(signed.content.as_bytes()));
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE documents
        SET content = ?, content_hash = ?, document_status = 'signed', updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&signed.content)
    .bind(&content_hash)
    .bind(now.to_rfc3339())
    .bind(&id)
    .execute(&state.db)
    .await?;

    for (role, sig) in signed.signatures.signed() {
        sqlx::query(
            r#"
            INSERT INTO document_signatures (id, document_id, signer_name, signer_type, signature_data, signing_session_id, created_at)
            VALUES (?, ?, ?, ?, ?, '', ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&id)
        .bind(&sig.signer_name)
        .bind(role.to_string())
        .bind(&sig.data_url)
        .bind(sig.timestamp.to_rfc3339())
        .execute(&state.db)
        .await?;
    }

    log_activity(
        &state,
        "document_signed",
        &format!("Document '{}' signed by {}", document.document_name, req.signed_by),
        "document",
        &id,
    )
    .await?;

    tracing::info!("Document {} signed by {}", id, req.signed_by);

    let row = fetch_document(&state, &id).await?;
    Ok(Json(parse_document(row)?))
}

// ============================================================
// Signature records
// ============================================================

/// Persist a signature record from the signing ceremony
pub async fn record_signature(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordSignatureRequest>,
) -> Result<Json<RecordSignatureResponse>, ApiError> {
    if req.signature_data.is_empty() {
        return Err(ApiError::InvalidRequest(
            "Signature data must not be empty".into(),
        ));
    }

    // The document must exist; the rest of the payload is stored as-is
    fetch_document(&state, &req.document_id).await?;

    let signature_id = Uuid::new_v4().to_string();
    let coordinates_json = req
        .signature_coordinates
        .as_ref()
        .map(|v| v.to_string());
    let device_json = req.device_info.as_ref().map(|v| v.to_string());

    sqlx::query(
        r#"
        INSERT INTO document_signatures (id, document_id, signer_name, signer_email, signer_type, signature_data, signature_coordinates, device_info, signing_session_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&signature_id)
    .bind(&req.document_id)
    .bind(&req.signer_name)
    .bind(&req.signer_email)
    .bind(req.signer_type.to_string())
    .bind(&req.signature_data)
    .bind(coordinates_json)
    .bind(device_json)
    .bind(&req.signing_session_id)
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    tracing::info!(
        "Recorded {} signature for document {}",
        req.signer_type,
        req.document_id
    );

    Ok(Json(RecordSignatureResponse {
        success: true,
        signature_id,
    }))
}

// ============================================================
// Leads and dashboard
// ============================================================

/// Score a lead profile
pub async fn score_lead_handler(
    Json(profile): Json<LeadProfile>,
) -> Json<LeadScore> {
    Json(score_lead(&profile))
}

/// Dashboard aggregation over documents, templates, and signatures
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, ApiError> {
    let documents_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(&state.db)
        .await?;
    let documents_draft: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE document_status = 'draft'")
            .fetch_one(&state.db)
            .await?;
    let documents_finalized: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE document_status = 'finalized'")
            .fetch_one(&state.db)
            .await?;
    let documents_signed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE document_status = 'signed'")
            .fetch_one(&state.db)
            .await?;
    let templates_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM templates")
        .fetch_one(&state.db)
        .await?;
    let signatures_total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM document_signatures")
        .fetch_one(&state.db)
        .await?;
    let recent_activity: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM activity_log WHERE created_at >= datetime('now', '-7 days')",
    )
    .fetch_one(&state.db)
    .await?;

    Ok(Json(DashboardStats {
        documents_total,
        documents_draft,
        documents_finalized,
        documents_signed,
        templates_total,
        signatures_total,
        recent_activity,
    }))
}

/// Most recent activity entries, newest first
pub async fn list_activity(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<shared_types::ActivityEntry>>, ApiError> {
    let rows: Vec<DbActivity> = sqlx::query_as(
        r#"
        SELECT id, activity_type, description, entity_type, entity_id, created_at
        FROM activity_log
        ORDER BY created_at DESC
        LIMIT 50
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

// ============================================================
// Helpers
// ============================================================

async fn fetch_template(state: &AppState, id: &str) -> Result<DbTemplate, ApiError> {
    let template: Option<DbTemplate> = sqlx::query_as(
        r#"
        SELECT id, name, document_type, template_content, template_fields_json, created_at
        FROM templates
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    template.ok_or_else(|| ApiError::TemplateNotFound(id.to_string()))
}

async fn fetch_document(state: &AppState, id: &str) -> Result<DbDocument, ApiError> {
    let document: Option<DbDocument> = sqlx::query_as(
        r#"
        SELECT id, template_id, document_name, field_values_json, content, content_hash,
               document_status, pdf_url, created_at, updated_at
        FROM documents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;

    document.ok_or_else(|| ApiError::DocumentNotFound(id.to_string()))
}

fn parse_template(row: DbTemplate) -> Result<DocumentTemplate, ApiError> {
    let template_fields = serde_json::from_str(&row.template_fields_json)
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(DocumentTemplate {
        id: row.id,
        name: row.name,
        document_type: row.document_type,
        template_content: row.template_content,
        template_fields,
        created_at: row.created_at,
    })
}

fn parse_document(row: DbDocument) -> Result<Document, ApiError> {
    let field_values = serde_json::from_str(&row.field_values_json)
        .map_err(|e| ApiError::Internal(e.into()))?;

    let document_status = row
        .document_status
        .parse()
        .unwrap_or(DocumentStatus::Draft);

    Ok(Document {
        id: row.id,
        template_id: row.template_id,
        document_name: row.document_name,
        field_values,
        content: row.content,
        document_status,
        pdf_url: row.pdf_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Append one activity row. Deliberately a separate call from whatever write
/// preceded it; there is no transaction spanning the two.
async fn log_activity(
    state: &AppState,
    activity_type: &str,
    description: &str,
    entity_type: &str,
    entity_id: &str,
) -> Result<(), ApiError> {
    sqlx::query(
        r#"
        INSERT INTO activity_log (id, activity_type, description, entity_type, entity_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(activity_type)
    .bind(description)
    .bind(entity_type)
    .bind(entity_id)
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await?;

    Ok(())
}
