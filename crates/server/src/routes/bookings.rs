use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use models::booking::{self, BookingStatus};
use service::booking::domain::{CreateBookingInput, UpdateBookingInput};
use service::booking::repo::seaorm::SeaOrmBookingRepository;
use service::booking::BookingService;
use service::pagination::Pagination;

use crate::errors::ApiError;
use crate::response::{created, ok, paginated, ApiResponse, ListResponse};
use crate::routes::auth::{AuthContext, ServerState};

fn booking_service(state: &ServerState) -> BookingService<SeaOrmBookingRepository> {
    BookingService::new(Arc::new(SeaOrmBookingRepository { db: state.db.clone() }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub caregiver_id: Uuid,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingBody {
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[utoipa::path(post, path = "/api/v1/bookings", tag = "bookings",
    request_body = crate::openapi::CreateBookingRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 404, description = "Caregiver Not Found")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<CreateBookingBody>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<booking::Model>>), ApiError> {
    let input = CreateBookingInput {
        customer_id: ctx.0.user_id,
        caregiver_id: body.caregiver_id,
        start_time: body.start_time,
        end_time: body.end_time,
        address: body.address,
        notes: body.notes,
    };
    let booking = booking_service(&state).create(input).await?;
    Ok(created(booking))
}

#[utoipa::path(get, path = "/api/v1/bookings/me", tag = "bookings",
    params(ListQuery),
    responses((status = 200, description = "Own bookings"), (status = 401, description = "Unauthorized")))]
pub async fn my_bookings(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ListResponse<booking::Model>>, ApiError> {
    let default = Pagination::default();
    let opts = Pagination {
        page: q.page.unwrap_or(default.page),
        per_page: q.limit.unwrap_or(default.per_page),
    };
    let page = booking_service(&state).list_for_actor(ctx.actor(), opts).await?;
    Ok(paginated(page))
}

#[utoipa::path(get, path = "/api/v1/bookings/{id}", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses((status = 200, description = "Booking"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<booking::Model>>, ApiError> {
    let booking = booking_service(&state).get(id).await?;
    Ok(ok(booking))
}

#[utoipa::path(patch, path = "/api/v1/bookings/{id}", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = crate::openapi::UpdateBookingRequest,
    responses((status = 200, description = "Updated"), (status = 400, description = "Invalid Transition"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBookingBody>,
) -> Result<Json<ApiResponse<booking::Model>>, ApiError> {
    let input = UpdateBookingInput { status: body.status, end_time: body.end_time, notes: body.notes };
    let booking = booking_service(&state).update(id, ctx.actor(), input).await?;
    Ok(ok(booking))
}

#[utoipa::path(post, path = "/api/v1/bookings/{id}/cancel", tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses((status = 200, description = "Cancelled"), (status = 400, description = "Already Terminal"), (status = 403, description = "Forbidden")))]
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<booking::Model>>, ApiError> {
    let booking = booking_service(&state).cancel(id, ctx.actor()).await?;
    Ok(ok(booking))
}
