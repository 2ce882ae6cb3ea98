use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use models::user::{self, Role};
use service::pagination::Pagination;
use service::user_service::{self, UpdateUserInput, UserListFilters};

use crate::errors::ApiError;
use crate::response::{ok, paginated, ApiResponse, ListResponse};
use crate::routes::auth::{AuthContext, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

fn page_opts(page: Option<u32>, limit: Option<u32>) -> Pagination {
    let default = Pagination::default();
    Pagination {
        page: page.unwrap_or(default.page),
        per_page: limit.unwrap_or(default.per_page),
    }
}

#[utoipa::path(get, path = "/api/v1/users/profile", tag = "users",
    responses((status = 200, description = "Own profile"), (status = 401, description = "Unauthorized")))]
pub async fn get_profile(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    let found = user_service::get_user(&state.db, ctx.0.user_id).await?;
    Ok(ok(found))
}

#[utoipa::path(patch, path = "/api/v1/users/profile", tag = "users",
    request_body = crate::openapi::UpdateUserRequest,
    responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    let updated = user_service::update_profile(&state.db, ctx.0.user_id, input).await?;
    Ok(ok(updated))
}

#[utoipa::path(get, path = "/api/v1/users", tag = "users",
    params(ListUsersQuery),
    responses((status = 200, description = "User listing"), (status = 403, description = "Forbidden")))]
pub async fn list_users(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Query(q): Query<ListUsersQuery>,
) -> Result<Json<ListResponse<user::Model>>, ApiError> {
    ctx.require_admin()?;
    let role = match q.role.as_deref() {
        Some(s) => Some(s.parse::<Role>().map_err(|e| ApiError::bad_request(e.to_string()))?),
        None => None,
    };
    let filters = UserListFilters { role, city: q.city, is_active: q.is_active };
    let page = user_service::list_users(&state.db, filters, page_opts(q.page, q.limit)).await?;
    Ok(paginated(page))
}

#[utoipa::path(get, path = "/api/v1/users/{id}", tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "User"), (status = 404, description = "Not Found")))]
pub async fn get_user(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<user::Model>>, ApiError> {
    ctx.require_admin()?;
    let found = user_service::get_user(&state.db, id).await?;
    Ok(ok(found))
}
