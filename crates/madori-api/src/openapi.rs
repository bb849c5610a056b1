//! OpenAPI document served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::handlers::{plans, system};
use madori_core::{
    FilenameError, FilenameErrorKind, Plan, PlanAnalysis, PlanFields, PlanMetadata,
    SearchFilters, UpdatePlanRequest, UploadMetadata,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Madori Plan Catalog API",
        description = "Floor-plan PDF catalog with canonical filename metadata and attribute search"
    ),
    paths(
        system::health_check,
        system::openapi_json,
        plans::list_plans,
        plans::upload_plan,
        plans::search,
        plans::parse_filenames,
        plans::generate_plan_filename,
        plans::get_plan,
        plans::update_plan,
        plans::toggle_favorite,
        plans::delete_plan,
        plans::download_pdf,
    ),
    components(schemas(
        Plan,
        PlanFields,
        PlanMetadata,
        PlanAnalysis,
        SearchFilters,
        UpdatePlanRequest,
        UploadMetadata,
        FilenameError,
        FilenameErrorKind,
        plans::PlanListResponse,
        plans::MetadataSource,
        plans::UploadPlanResponse,
        plans::UploadPlanForm,
        plans::ParseFilenamesRequest,
        plans::ParseFilenameResult,
        plans::ParseFilenamesResponse,
        plans::GenerateFilenameResponse,
        plans::DeletePlanResponse,
    )),
    tags(
        (name = "Plans", description = "Plan upload, CRUD and PDF download"),
        (name = "Search", description = "Attribute search over the catalog"),
        (name = "Filenames", description = "Canonical filename parsing and generation"),
        (name = "System", description = "Health checks and API description")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_plan_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/api/v1/plans",
            "/api/v1/plans/search",
            "/api/v1/plans/parse-filenames",
            "/api/v1/plans/generate-filename",
            "/api/v1/plans/{id}",
            "/api/v1/plans/{id}/favorite",
            "/api/v1/plans/{id}/pdf",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }
}
