use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use service::pagination::{Page, PageMeta};

/// Success envelope: `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

/// Listing envelope adds `pagination` next to `data`.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { success: true, data })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(data))
}

pub fn paginated<T: Serialize>(page: Page<T>) -> Json<ListResponse<T>> {
    Json(ListResponse { success: true, data: page.items, pagination: page.meta })
}
