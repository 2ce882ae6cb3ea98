use std::sync::Arc;

use argon2::{Argon2, PasswordHash, password_hash::{PasswordHasher, PasswordVerifier, SaltString}};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use models::user::Role;

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput, TokenPayload};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub access_ttl: chrono::Duration,
    pub refresh_ttl: chrono::Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: impl Into<String>,
        jwt_refresh_secret: impl Into<String>,
        access_ttl_hours: i64,
        refresh_ttl_hours: i64,
    ) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_refresh_secret: jwt_refresh_secret.into(),
            access_ttl: chrono::Duration::hours(access_ttl_hours),
            refresh_ttl: chrono::Duration::hours(refresh_ttl_hours),
        }
    }
}

/// Decode and validate an access token without touching the repository.
/// Used by the HTTP middleware on every protected request.
pub fn verify_access_token(secret: &str, token: &str) -> Result<TokenPayload, AuthError> {
    decode_token(secret, token)
}

fn decode_token(secret: &str, token: &str) -> Result<TokenPayload, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidToken)?;
    let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
    Ok(TokenPayload { user_id, email: data.claims.email, role: data.claims.role })
}

fn sign_token(secret: &str, user: &AuthUser, ttl: chrono::Duration) -> Result<String, AuthError> {
    let exp = (chrono::Utc::now() + ttl).timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp,
    };
    encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Auth business service independent of the web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password and issue a session.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("access-secret", "refresh-secret", 1, 24));
    /// let input = RegisterInput { name: "Test".into(), email: "user@example.com".into(), password: "Secret123".into(), phone: None, role: None };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "user@example.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        models::user::validate_name(&input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        models::user::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        if input.password.len() < 6 {
            return Err(AuthError::Validation("password too short (>=6)".into()));
        }
        let role = input.role.unwrap_or_default();
        if role == Role::Admin {
            return Err(AuthError::Validation("cannot self-register as admin".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo
            .create_user(&input.name, &input.email, input.phone.as_deref(), role)
            .await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        let _cred = self.repo.upsert_password(user.id, hash, "argon2".into()).await?;

        let session = self.issue_session(user)?;
        info!(user_id = %session.user.id, email = %session.user.email, role = %session.user.role.as_str(), "user_registered");
        Ok(session)
    }

    /// Authenticate a user and issue access + refresh tokens.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("access-secret", "refresh-secret", 1, 24));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "Nina".into(), email: "n@e.com".into(), password: "Passw0rd".into(), phone: None, role: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "n@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "n@e.com");
    /// assert!(!session.refresh_token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;
        if !user.is_active {
            return Err(AuthError::Deactivated);
        }

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let session = self.issue_session(user)?;
        info!(user_id = %session.user.id, "user_logged_in");
        Ok(session)
    }

    /// Exchange a valid refresh token for a fresh access token.
    /// The user must still exist and be active.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let payload = decode_token(&self.cfg.jwt_refresh_secret, refresh_token)?;
        let user = self.repo
            .find_user_by_id(payload.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::Unauthorized)?;
        sign_token(&self.cfg.jwt_secret, &user, self.cfg.access_ttl)
    }

    /// Look up the authenticated user behind a token payload.
    pub async fn current_user(&self, user_id: Uuid) -> Result<AuthUser, AuthError> {
        self.repo.find_user_by_id(user_id).await?.ok_or(AuthError::NotFound)
    }

    fn issue_session(&self, user: AuthUser) -> Result<AuthSession, AuthError> {
        let token = sign_token(&self.cfg.jwt_secret, &user, self.cfg.access_ttl)?;
        let refresh_token = sign_token(&self.cfg.jwt_refresh_secret, &user, self.cfg.refresh_ttl)?;
        Ok(AuthSession { user, token, refresh_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc(repo: Arc<MockAuthRepository>) -> AuthService<MockAuthRepository> {
        AuthService::new(repo, AuthConfig::new("access-secret", "refresh-secret", 1, 24))
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            name: "Test User".into(),
            email: email.into(),
            password: "Sup3rSecret".into(),
            phone: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo);
        let session = svc.register(register_input("round@example.com")).await.expect("register");
        assert_eq!(session.user.role, Role::Customer);

        let login = svc
            .login(LoginInput { email: "round@example.com".into(), password: "Sup3rSecret".into() })
            .await
            .expect("login");
        assert_eq!(login.user.id, session.user.id);

        let payload = verify_access_token("access-secret", &login.token).expect("verify");
        assert_eq!(payload.user_id, session.user.id);
        assert_eq!(payload.role, Role::Customer);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo);
        svc.register(register_input("dup@example.com")).await.expect("first");
        let err = svc.register(register_input("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo);
        svc.register(register_input("wrong@example.com")).await.expect("register");
        let err = svc
            .login(LoginInput { email: "wrong@example.com".into(), password: "nope-nope".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn deactivated_account_cannot_login() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = AuthService::new(repo.clone(), AuthConfig::new("access-secret", "refresh-secret", 1, 24));
        let session = svc.register(register_input("inactive@example.com")).await.expect("register");
        repo.set_active(session.user.id, false);
        let err = svc
            .login(LoginInput { email: "inactive@example.com".into(), password: "Sup3rSecret".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Deactivated));
    }

    #[tokio::test]
    async fn short_password_rejected() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo);
        let mut input = register_input("short@example.com");
        input.password = "abc".into();
        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn admin_self_registration_rejected() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo);
        let mut input = register_input("admin@example.com");
        input.role = Some(Role::Admin);
        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn refresh_issues_new_access_token() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo);
        let session = svc.register(register_input("refresh@example.com")).await.expect("register");
        let token = svc.refresh(&session.refresh_token).await.expect("refresh");
        let payload = verify_access_token("access-secret", &token).expect("verify");
        assert_eq!(payload.user_id, session.user.id);
    }

    #[tokio::test]
    async fn access_token_is_not_a_refresh_token() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo);
        let session = svc.register(register_input("mixed@example.com")).await.expect("register");
        // Signed with the access secret, so the refresh path must reject it
        let err = svc.refresh(&session.token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn garbage_token_rejected() {
        let err = verify_access_token("access-secret", "not-a-jwt").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
