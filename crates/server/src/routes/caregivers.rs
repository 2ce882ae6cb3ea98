use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use models::caregiver_document::{self, DocType};
use models::caregiver_profile::VerificationStatus;
use models::user::Role;
use service::caregiver_service::{
    self, CaregiverSearchFilters, CaregiverSearchHit, CreateProfileInput, UpdateProfileInput,
    UserSummary,
};
use service::pagination::Pagination;

use crate::errors::ApiError;
use crate::response::{created, ok, paginated, ApiResponse, ListResponse};
use crate::routes::auth::{AuthContext, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub city: Option<String>,
    pub service: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<f32>,
    #[serde(rename = "maxPriceCents")]
    pub max_price_cents: Option<i32>,
    #[serde(rename = "verificationStatus")]
    pub verification_status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDocumentInput {
    pub doc_type: DocType,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct VerificationInput {
    pub status: VerificationStatus,
}

fn page_opts(page: Option<u32>, limit: Option<u32>) -> Pagination {
    let default = Pagination::default();
    Pagination {
        page: page.unwrap_or(default.page),
        per_page: limit.unwrap_or(default.per_page),
    }
}

#[utoipa::path(get, path = "/api/v1/caregivers/search", tag = "caregivers",
    params(SearchQuery),
    responses((status = 200, description = "Search results"), (status = 400, description = "Bad Request")))]
pub async fn search(
    State(state): State<ServerState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<ListResponse<CaregiverSearchHit>>, ApiError> {
    let verification_status = match q.verification_status.as_deref() {
        Some(s) => Some(s.parse::<VerificationStatus>().map_err(|e| ApiError::bad_request(e.to_string()))?),
        None => None,
    };
    let filters = CaregiverSearchFilters {
        city: q.city,
        service: q.service,
        min_rating: q.min_rating,
        max_price_cents: q.max_price_cents,
        verification_status,
    };
    let page = caregiver_service::search(&state.db, filters, page_opts(q.page, q.limit)).await?;
    Ok(paginated(page))
}

#[utoipa::path(get, path = "/api/v1/caregivers/{user_id}", tag = "caregivers",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    responses((status = 200, description = "Public profile"), (status = 404, description = "Not Found")))]
pub async fn get_public_profile(
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CaregiverSearchHit>>, ApiError> {
    let (profile, owner) = caregiver_service::get_profile_with_user(&state.db, user_id).await?;
    Ok(ok(CaregiverSearchHit {
        profile,
        user: Some(UserSummary { id: owner.id, name: owner.name, city: owner.city }),
    }))
}

#[utoipa::path(post, path = "/api/v1/caregivers/profile", tag = "caregivers",
    request_body = crate::openapi::CreateProfileRequest,
    responses((status = 201, description = "Created"), (status = 403, description = "Forbidden"), (status = 409, description = "Conflict")))]
pub async fn create_profile(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<CreateProfileInput>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<models::caregiver_profile::Model>>), ApiError> {
    ctx.require_role(Role::Caregiver)?;
    let profile = caregiver_service::create_profile(&state.db, ctx.0.user_id, input).await?;
    Ok(created(profile))
}

#[utoipa::path(get, path = "/api/v1/caregivers/profile/me", tag = "caregivers",
    responses((status = 200, description = "Own profile"), (status = 404, description = "Not Found")))]
pub async fn my_profile(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<models::caregiver_profile::Model>>, ApiError> {
    ctx.require_role(Role::Caregiver)?;
    let profile = caregiver_service::get_profile_by_user(&state.db, ctx.0.user_id).await?;
    Ok(ok(profile))
}

#[utoipa::path(patch, path = "/api/v1/caregivers/profile/me", tag = "caregivers",
    request_body = crate::openapi::UpdateProfileRequest,
    responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request")))]
pub async fn update_my_profile(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<ApiResponse<models::caregiver_profile::Model>>, ApiError> {
    ctx.require_role(Role::Caregiver)?;
    let profile = caregiver_service::update_profile(&state.db, ctx.0.user_id, input).await?;
    Ok(ok(profile))
}

#[utoipa::path(post, path = "/api/v1/caregivers/profile/me/documents", tag = "caregivers",
    request_body = crate::openapi::AddDocumentRequest,
    responses((status = 201, description = "Attached"), (status = 404, description = "Not Found")))]
pub async fn add_document(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<AddDocumentInput>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<caregiver_document::Model>>), ApiError> {
    ctx.require_role(Role::Caregiver)?;
    let doc = caregiver_service::add_document(&state.db, ctx.0.user_id, input.doc_type, &input.url).await?;
    Ok(created(doc))
}

#[utoipa::path(patch, path = "/api/v1/caregivers/{user_id}/verification", tag = "caregivers",
    params(("user_id" = Uuid, Path, description = "Owning user ID")),
    request_body = crate::openapi::VerificationRequest,
    responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update_verification(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<VerificationInput>,
) -> Result<Json<ApiResponse<models::caregiver_profile::Model>>, ApiError> {
    ctx.require_admin()?;
    let profile = caregiver_service::update_verification(&state.db, user_id, input.status).await?;
    Ok(ok(profile))
}
