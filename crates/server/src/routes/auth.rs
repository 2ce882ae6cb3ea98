use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use models::user::Role;
use service::auth::domain::{AuthUser, LoginInput, RegisterInput, TokenPayload};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{verify_access_token, AuthConfig, AuthService};
use service::booking::domain::Actor;

use crate::errors::ApiError;
use crate::response::{created, ok, ApiResponse};

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub access_ttl_hours: i64,
    pub refresh_ttl_hours: i64,
}

impl AuthSettings {
    fn service_config(&self) -> AuthConfig {
        AuthConfig::new(
            self.jwt_secret.clone(),
            self.jwt_refresh_secret.clone(),
            self.access_ttl_hours,
            self.refresh_ttl_hours,
        )
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: AuthSettings,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(repo, self.auth.service_config())
    }
}

/// Verified identity attached to every authenticated request.
#[derive(Clone)]
pub struct AuthContext(pub TokenPayload);

impl AuthContext {
    pub fn actor(&self) -> Actor {
        Actor { user_id: self.0.user_id, role: self.0.role }
    }

    pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
        if self.0.role == role {
            Ok(())
        } else {
            Err(ApiError::forbidden("you do not have permission to perform this action"))
        }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        self.require_role(Role::Admin)
    }
}

/// Bearer-token middleware guarding the protected route tree.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("no token provided"))?;
    let payload = verify_access_token(&state.auth.jwt_secret, token)?;
    req.extensions_mut().insert(AuthContext(payload));
    Ok(next.run(req).await)
}

/// Wire shape for sessions: camelCase `refreshToken` for the SPA.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutput {
    pub user: AuthUser,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshInput {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshOutput {
    pub token: String,
}

#[utoipa::path(post, path = "/api/v1/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<SessionOutput>>), ApiError> {
    let session = state.auth_service().register(input).await?;
    Ok(created(SessionOutput {
        user: session.user,
        token: session.token,
        refresh_token: session.refresh_token,
    }))
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<ApiResponse<SessionOutput>>, ApiError> {
    let session = state.auth_service().login(input).await?;
    Ok(ok(SessionOutput {
        user: session.user,
        token: session.token,
        refresh_token: session.refresh_token,
    }))
}

#[utoipa::path(post, path = "/api/v1/auth/refresh-token", tag = "auth",
    request_body = crate::openapi::RefreshRequest,
    responses((status = 200, description = "Refreshed"), (status = 401, description = "Unauthorized")))]
pub async fn refresh_token(
    State(state): State<ServerState>,
    Json(input): Json<RefreshInput>,
) -> Result<Json<ApiResponse<RefreshOutput>>, ApiError> {
    let token = state.auth_service().refresh(&input.refresh_token).await?;
    Ok(ok(RefreshOutput { token }))
}

#[utoipa::path(get, path = "/api/v1/auth/me", tag = "auth",
    responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized")))]
pub async fn me(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<AuthUser>>, ApiError> {
    let user = state.auth_service().current_user(ctx.0.user_id).await?;
    Ok(ok(user))
}
