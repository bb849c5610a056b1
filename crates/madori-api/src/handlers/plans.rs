//! Plan catalog HTTP handlers.
//!
//! Every route is scoped to the caller's company; a plan owned by another
//! company is reported as not found.

use std::time::Instant;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use madori_core::{
    decode_analysis, generate_filename, parse_filename, parse_multiple_filenames,
    sanitize_filename, validate_for_upload, validate_plan_pdf, FilenameError, NewPlan, Plan,
    PlanFields, PlanMetadata, SearchFilters, UpdatePlanRequest, UploadMetadata,
};
use madori_db::{compute_content_hash, plan_storage_path};

use crate::{ApiError, AppState, Principal};

// =============================================================================
// RESPONSE TYPES
// =============================================================================

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlanListResponse {
    pub plans: Vec<Plan>,
    pub total: usize,
}

impl From<Vec<Plan>> for PlanListResponse {
    fn from(plans: Vec<Plan>) -> Self {
        Self {
            total: plans.len(),
            plans,
        }
    }
}

/// Where an uploaded plan's metadata came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    /// Explicit `metadata` form field.
    Metadata,
    /// Parsed from the canonical filename.
    Filename,
    /// Decoded from an AI analysis response.
    Analysis,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadPlanResponse {
    pub plan: Plan,
    pub source: MetadataSource,
    /// Non-fatal notes from analysis decoding.
    pub warnings: Vec<String>,
}

/// Multipart body of `POST /api/v1/plans`.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct UploadPlanForm {
    /// Plan PDF.
    #[schema(format = Binary)]
    pub file: String,
    /// JSON-encoded [`UploadMetadata`]; takes precedence over the filename.
    pub metadata: Option<String>,
    /// Raw AI analysis response, used when the filename does not parse.
    pub analysis: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ParseFilenamesRequest {
    pub filenames: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ParseFilenameResult {
    pub filename: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PlanMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FilenameError>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ParseFilenamesResponse {
    pub results: Vec<ParseFilenameResult>,
    pub parsed: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GenerateFilenameResponse {
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeletePlanResponse {
    pub success: bool,
    pub id: Uuid,
}

// =============================================================================
// READ
// =============================================================================

/// List the company's plans, newest first.
#[utoipa::path(get, path = "/api/v1/plans", tag = "Plans",
    responses((status = 200, description = "Plans", body = PlanListResponse)))]
pub async fn list_plans(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<PlanListResponse>, ApiError> {
    let plans = state.plans.list(principal.company_id).await?;
    Ok(Json(plans.into()))
}

#[utoipa::path(get, path = "/api/v1/plans/{id}", tag = "Plans",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan", body = Plan),
        (status = 404, description = "Plan not found")
    ))]
pub async fn get_plan(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<Plan>, ApiError> {
    let plan = state.plans.fetch(principal.company_id, id).await?;
    Ok(Json(plan))
}

/// Filter the company's catalog.
///
/// All constraints combine with AND; an empty filter returns every plan.
#[utoipa::path(post, path = "/api/v1/plans/search", tag = "Search",
    request_body = SearchFilters,
    responses((status = 200, description = "Matching plans, newest first", body = PlanListResponse)))]
pub async fn search(
    State(state): State<AppState>,
    principal: Principal,
    Json(filters): Json<SearchFilters>,
) -> Result<Json<PlanListResponse>, ApiError> {
    let plans = state.search.search(principal.company_id, &filters).await?;
    Ok(Json(plans.into()))
}

/// Stream the stored PDF inline.
#[utoipa::path(get, path = "/api/v1/plans/{id}/pdf", tag = "Plans",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "PDF bytes"),
        (status = 404, description = "Plan or PDF not found")
    ))]
pub async fn download_pdf(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let plan = state.plans.fetch(principal.company_id, id).await?;
    let pdf_path = plan
        .pdf_path
        .as_deref()
        .ok_or_else(|| ApiError::NotFound(format!("Plan {} has no PDF", id)))?;

    let data = state.storage.read(pdf_path).await?;
    let disposition = format!(
        "inline; filename*=UTF-8''{}",
        urlencoding::encode(&plan.original_filename)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

// =============================================================================
// FILENAME TOOLS
// =============================================================================

/// Parse a batch of filenames. One bad name never fails the batch.
#[utoipa::path(post, path = "/api/v1/plans/parse-filenames", tag = "Filenames",
    request_body = ParseFilenamesRequest,
    responses((status = 200, description = "Per-filename results in input order", body = ParseFilenamesResponse)))]
pub async fn parse_filenames(
    _principal: Principal,
    Json(req): Json<ParseFilenamesRequest>,
) -> Json<ParseFilenamesResponse> {
    let outcomes = parse_multiple_filenames(&req.filenames);

    let results: Vec<ParseFilenameResult> = req
        .filenames
        .into_iter()
        .zip(outcomes)
        .map(|(filename, outcome)| match outcome {
            Ok(metadata) => ParseFilenameResult {
                filename,
                success: true,
                metadata: Some(metadata),
                error: None,
            },
            Err(error) => ParseFilenameResult {
                filename,
                success: false,
                metadata: None,
                error: Some(error),
            },
        })
        .collect();

    let parsed = results.iter().filter(|r| r.success).count();
    let failed = results.len() - parsed;
    debug!(
        subsystem = "api",
        op = "parse_filenames",
        input_count = results.len(),
        failure_count = failed,
        "Parsed filename batch"
    );

    Json(ParseFilenamesResponse {
        results,
        parsed,
        failed,
    })
}

/// Render metadata as a canonical filename.
#[utoipa::path(post, path = "/api/v1/plans/generate-filename", tag = "Filenames",
    request_body = PlanFields,
    responses((status = 200, description = "Canonical filename", body = GenerateFilenameResponse)))]
pub async fn generate_plan_filename(
    _principal: Principal,
    Json(fields): Json<PlanFields>,
) -> Json<GenerateFilenameResponse> {
    Json(GenerateFilenameResponse {
        filename: generate_filename(&fields),
    })
}

// =============================================================================
// WRITE
// =============================================================================

/// Metadata precedence: explicit form metadata, then the filename, then the
/// analysis response when the filename does not parse.
fn resolve_metadata(
    filename: &str,
    metadata: Option<String>,
    analysis: Option<String>,
) -> Result<(PlanMetadata, MetadataSource, Vec<String>), ApiError> {
    if let Some(raw) = metadata {
        let upload: UploadMetadata = serde_json::from_str(&raw)
            .map_err(|e| ApiError::BadRequest(format!("Invalid metadata: {}", e)))?;
        return Ok((
            upload.into_metadata(filename)?,
            MetadataSource::Metadata,
            Vec::new(),
        ));
    }

    match parse_filename(filename) {
        Ok(parsed) => {
            validate_for_upload(&parsed)?;
            Ok((parsed, MetadataSource::Filename, Vec::new()))
        }
        Err(parse_err) => match analysis {
            Some(raw) => {
                debug!(
                    subsystem = "api",
                    filename = %filename,
                    error = %parse_err,
                    "Filename did not parse, decoding analysis"
                );
                let decoded = decode_analysis(&raw)?;
                let warnings = decoded.warnings.clone();
                let resolved = decoded.into_metadata(filename);
                validate_for_upload(&resolved)?;
                Ok((resolved, MetadataSource::Analysis, warnings))
            }
            None => Err(parse_err.into()),
        },
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Upload a plan PDF.
///
/// # Multipart Fields
/// - `file`: the PDF (required)
/// - `metadata`: JSON [`UploadMetadata`] (optional)
/// - `analysis`: raw AI analysis text (optional)
///
/// # Returns
/// - 201 Created with the stored plan and where its metadata came from
/// - 400 Bad Request if the file is rejected or no metadata source works
/// - 413 Payload Too Large if the file exceeds the upload limit
#[utoipa::path(post, path = "/api/v1/plans", tag = "Plans",
    request_body(content = UploadPlanForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Plan created", body = UploadPlanResponse),
        (status = 400, description = "Rejected file or unusable metadata"),
        (status = 413, description = "File too large")
    ))]
pub async fn upload_plan(
    State(state): State<AppState>,
    principal: Principal,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadPlanResponse>), ApiError> {
    let start = Instant::now();

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut metadata: Option<String> = None;
    let mut analysis: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(format!("Multipart error: {}", e))
        }
    })? {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                file = Some((name, data.to_vec()));
            }
            Some("metadata") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                metadata = non_blank(text);
            }
            Some("analysis") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
                analysis = non_blank(text);
            }
            _ => {}
        }
    }

    let (raw_name, data) =
        file.ok_or_else(|| ApiError::BadRequest("Missing file in multipart form".to_string()))?;
    let filename = sanitize_filename(&raw_name);

    let check = validate_plan_pdf(&filename, &data, state.max_upload_bytes);
    if !check.allowed && check.detected_type.as_deref() == Some("oversized") {
        return Err(ApiError::PayloadTooLarge(
            check.block_reason.unwrap_or_default(),
        ));
    }
    check.into_result()?;

    let (resolved, source, warnings) = resolve_metadata(&filename, metadata, analysis)?;

    let plan_id = Uuid::now_v7();
    let pdf_path = plan_storage_path(&principal.company_id, &plan_id);
    let content_hash = compute_content_hash(&data);
    state.storage.write(&pdf_path, &data).await?;

    let new_plan = NewPlan {
        id: plan_id,
        company_id: principal.company_id,
        uploaded_by: Some(principal.user_id),
        metadata: resolved,
        pdf_path: Some(pdf_path.clone()),
        content_hash: Some(content_hash),
    };

    let plan = match state.plans.insert(new_plan).await {
        Ok(plan) => plan,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&pdf_path).await {
                warn!(
                    subsystem = "api",
                    storage_path = %pdf_path,
                    error = %cleanup,
                    "Failed to remove orphaned PDF"
                );
            }
            return Err(e.into());
        }
    };

    info!(
        subsystem = "api",
        op = "upload_plan",
        plan_id = %plan.id,
        filename = %plan.original_filename,
        size_bytes = data.len(),
        source = ?source,
        duration_ms = start.elapsed().as_millis() as u64,
        "Plan uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadPlanResponse {
            plan,
            source,
            warnings,
        }),
    ))
}

/// Edit metadata. The title is regenerated from the merged fields.
#[utoipa::path(patch, path = "/api/v1/plans/{id}", tag = "Plans",
    params(("id" = Uuid, Path, description = "Plan id")),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Updated plan", body = Plan),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Plan not found"),
        (status = 409, description = "Stale version")
    ))]
pub async fn update_plan(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<Json<Plan>, ApiError> {
    let plan = state.plans.update(principal.company_id, id, req).await?;
    info!(subsystem = "api", op = "update_plan", plan_id = %id, version = plan.version, "Plan updated");
    Ok(Json(plan))
}

#[utoipa::path(post, path = "/api/v1/plans/{id}/favorite", tag = "Plans",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan with flipped favorite flag", body = Plan),
        (status = 404, description = "Plan not found")
    ))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<Plan>, ApiError> {
    let plan = state.plans.toggle_favorite(principal.company_id, id).await?;
    Ok(Json(plan))
}

/// Delete the record, then its PDF. A leftover blob is only logged.
#[utoipa::path(delete, path = "/api/v1/plans/{id}", tag = "Plans",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan deleted", body = DeletePlanResponse),
        (status = 404, description = "Plan not found")
    ))]
pub async fn delete_plan(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletePlanResponse>, ApiError> {
    let plan = state.plans.delete(principal.company_id, id).await?;

    if let Some(pdf_path) = plan.pdf_path.as_deref() {
        if let Err(e) = state.storage.delete(pdf_path).await {
            warn!(
                subsystem = "api",
                plan_id = %id,
                storage_path = %pdf_path,
                error = %e,
                "Plan deleted but PDF removal failed"
            );
        }
    }

    info!(subsystem = "api", op = "delete_plan", plan_id = %id, "Plan deleted");
    Ok(Json(DeletePlanResponse { success: true, id }))
}
