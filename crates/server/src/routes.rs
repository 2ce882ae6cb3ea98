use axum::routing::{get, patch, post};
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod auth;
pub mod users;
pub mod caregivers;
pub mod bookings;
pub mod admin;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public routes, the bearer-guarded
/// API tree, and the swagger UI.
pub fn build_router(state: auth::ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .route("/caregivers/search", get(caregivers::search))
        .route("/caregivers/:user_id", get(caregivers::get_public_profile));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/users/profile", get(users::get_profile).patch(users::update_profile))
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/caregivers/profile", post(caregivers::create_profile))
        .route("/caregivers/profile/me", get(caregivers::my_profile).patch(caregivers::update_my_profile))
        .route("/caregivers/profile/me/documents", post(caregivers::add_document))
        .route("/caregivers/:user_id/verification", patch(caregivers::update_verification))
        .route("/bookings", post(bookings::create))
        .route("/bookings/me", get(bookings::my_bookings))
        .route("/bookings/:id", get(bookings::get).patch(bookings::update))
        .route("/bookings/:id/cancel", post(bookings::cancel))
        .route("/admin/reports", get(admin::reports))
        .route("/admin/verifications/pending", get(admin::pending_verifications))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", public.merge(protected))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
