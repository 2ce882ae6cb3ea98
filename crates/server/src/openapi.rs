use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// customer | caregiver | vendor
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub services: Vec<String>,
    pub experience_years: i32,
    pub hourly_rate_cents: Option<i32>,
    pub bio: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub services: Option<Vec<String>>,
    pub experience_years: Option<i32>,
    pub hourly_rate_cents: Option<i32>,
    pub bio: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct AddDocumentRequest {
    /// id_proof | qualification | background_check | other
    pub doc_type: String,
    pub url: String,
}

#[derive(ToSchema)]
pub struct VerificationRequest {
    /// pending | verified | rejected
    pub status: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub caregiver_id: String,
    /// RFC 3339 timestamp
    pub start_time: String,
    pub end_time: Option<String>,
    pub address: String,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    /// requested | confirmed | in_progress | completed | cancelled
    pub status: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh_token,
        crate::routes::auth::me,
        crate::routes::users::get_profile,
        crate::routes::users::update_profile,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::caregivers::search,
        crate::routes::caregivers::get_public_profile,
        crate::routes::caregivers::create_profile,
        crate::routes::caregivers::my_profile,
        crate::routes::caregivers::update_my_profile,
        crate::routes::caregivers::add_document,
        crate::routes::caregivers::update_verification,
        crate::routes::bookings::create,
        crate::routes::bookings::my_bookings,
        crate::routes::bookings::get,
        crate::routes::bookings::update,
        crate::routes::bookings::cancel,
        crate::routes::admin::reports,
        crate::routes::admin::pending_verifications,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            UpdateUserRequest,
            CreateProfileRequest,
            UpdateProfileRequest,
            AddDocumentRequest,
            VerificationRequest,
            CreateBookingRequest,
            UpdateBookingRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "caregivers"),
        (name = "bookings"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
