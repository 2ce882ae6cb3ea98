use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use models::caregiver_profile;
use service::admin_service::{self, AdminReport};
use service::pagination::Pagination;

use crate::errors::ApiError;
use crate::response::{ok, paginated, ApiResponse, ListResponse};
use crate::routes::auth::{AuthContext, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[utoipa::path(get, path = "/api/v1/admin/reports", tag = "admin",
    responses((status = 200, description = "Platform counters"), (status = 403, description = "Forbidden")))]
pub async fn reports(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<AdminReport>>, ApiError> {
    ctx.require_admin()?;
    let report = admin_service::report(&state.db).await?;
    Ok(ok(report))
}

#[utoipa::path(get, path = "/api/v1/admin/verifications/pending", tag = "admin",
    params(ListQuery),
    responses((status = 200, description = "Profiles awaiting review"), (status = 403, description = "Forbidden")))]
pub async fn pending_verifications(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListResponse<caregiver_profile::Model>>, ApiError> {
    ctx.require_admin()?;
    let default = Pagination::default();
    let opts = Pagination {
        page: q.page.unwrap_or(default.page),
        per_page: q.limit.unwrap_or(default.per_page),
    };
    let page = admin_service::pending_verifications(&state.db, opts).await?;
    Ok(paginated(page))
}
