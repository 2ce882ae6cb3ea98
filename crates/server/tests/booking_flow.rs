use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::{json, Value};
use tower::Service;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use models::user::{self, Role};
use server::routes::{self, auth};

async fn build_app() -> anyhow::Result<(Router, DatabaseConnection)> {
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    let state = auth::ServerState {
        db: db.clone(),
        auth: auth::AuthSettings {
            jwt_secret: "test-secret".into(),
            jwt_refresh_secret: "test-refresh-secret".into(),
            access_ttl_hours: 1,
            refresh_ttl_hours: 24,
        },
    };
    Ok((routes::build_router(state, CorsLayer::very_permissive()), db))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

/// Register a user with the given role and return (token, user_id).
async fn register(app: &Router, role: &str) -> anyhow::Result<(String, Uuid)> {
    let email = format!("{}_{}@example.com", role, Uuid::new_v4());
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({"name": "Flow Tester", "email": email, "password": "StrongPass123", "role": role})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "register failed: {status} {body}");
    let token = body["data"]["token"].as_str().expect("token").to_string();
    let user_id = Uuid::parse_str(body["data"]["user"]["id"].as_str().expect("id"))?;
    Ok((token, user_id))
}

/// Promote a registered user to admin directly in the DB, then log in
/// again so the token carries the admin role.
async fn admin_token(app: &Router, db: &DatabaseConnection) -> anyhow::Result<String> {
    let email = format!("admin_{}@example.com", Uuid::new_v4());
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({"name": "Admin Tester", "email": email, "password": "StrongPass123"})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "register failed: {body}");
    let user_id = Uuid::parse_str(body["data"]["user"]["id"].as_str().expect("id"))?;

    let mut am: user::ActiveModel = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .expect("user exists")
        .into();
    am.role = Set(Role::Admin);
    am.update(db).await?;

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": email, "password": "StrongPass123"})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {body}");
    Ok(body["data"]["token"].as_str().expect("token").to_string())
}

/// Caregiver with a verified profile at 25.00/h; returns (token, user_id, profile_id).
async fn verified_caregiver(
    app: &Router,
    admin: &str,
) -> anyhow::Result<(String, Uuid, Uuid)> {
    let (token, user_id) = register(app, "caregiver").await?;
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/caregivers/profile",
        Some(&token),
        Some(json!({"services": ["nursing"], "experienceYears": 5, "hourlyRateCents": 2500})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "profile failed: {body}");
    let profile_id = Uuid::parse_str(body["data"]["id"].as_str().expect("profile id"))?;

    let (status, body) = send(
        app,
        "PATCH",
        &format!("/api/v1/caregivers/{user_id}/verification"),
        Some(admin),
        Some(json!({"status": "verified"})),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "verification failed: {body}");
    anyhow::ensure!(body["data"]["verified"] == true, "profile not verified");
    Ok((token, user_id, profile_id))
}

#[tokio::test]
async fn test_booking_lifecycle_happy_path() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (app, db) = match build_app().await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("skip: cannot set up db: {e}");
            return Ok(());
        }
    };
    let admin = admin_token(&app, &db).await?;
    let (cg_token, _, profile_id) = verified_caregiver(&app, &admin).await?;
    let (cust_token, _) = register(&app, "customer").await?;

    // Three-hour window at 25.00/h
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(&cust_token),
        Some(json!({
            "caregiverId": profile_id,
            "startTime": "2030-06-01T09:00:00Z",
            "endTime": "2030-06-01T12:00:00Z",
            "address": "221B Baker Street, London"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "requested");
    assert_eq!(body["data"]["priceCents"], 7500);
    let booking_id = body["data"]["id"].as_str().expect("id").to_string();

    // Caregiver walks the lifecycle forward
    for target in ["confirmed", "in_progress", "completed"] {
        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/v1/bookings/{booking_id}"),
            Some(&cg_token),
            Some(json!({"status": target})),
        )
        .await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["status"], target);
    }

    // Terminal: no further transitions, no cancellation
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/v1/bookings/{booking_id}"),
        Some(&cg_token),
        Some(json!({"status": "cancelled"})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        Some(&cust_token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_booking_defaults_to_one_hour_price() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (app, db) = match build_app().await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("skip: cannot set up db: {e}");
            return Ok(());
        }
    };
    let admin = admin_token(&app, &db).await?;
    let (_, _, profile_id) = verified_caregiver(&app, &admin).await?;
    let (cust_token, _) = register(&app, "customer").await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(&cust_token),
        Some(json!({
            "caregiverId": profile_id,
            "startTime": "2030-06-01T09:00:00Z",
            "address": "42 Long Enough Street, Springfield"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["priceCents"], 2500);
    Ok(())
}

#[tokio::test]
async fn test_unverified_caregiver_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (app, _db) = match build_app().await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("skip: cannot set up db: {e}");
            return Ok(());
        }
    };
    let (cg_token, _) = register(&app, "caregiver").await?;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/caregivers/profile",
        Some(&cg_token),
        Some(json!({"services": ["adl"], "experienceYears": 2, "hourlyRateCents": 2000})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let profile_id = body["data"]["id"].as_str().expect("id").to_string();

    let (cust_token, _) = register(&app, "customer").await?;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(&cust_token),
        Some(json!({
            "caregiverId": profile_id,
            "startTime": "2030-06-01T09:00:00Z",
            "address": "42 Long Enough Street, Springfield"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn test_invalid_window_and_address_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (app, db) = match build_app().await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("skip: cannot set up db: {e}");
            return Ok(());
        }
    };
    let admin = admin_token(&app, &db).await?;
    let (_, _, profile_id) = verified_caregiver(&app, &admin).await?;
    let (cust_token, _) = register(&app, "customer").await?;

    // endTime before startTime
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(&cust_token),
        Some(json!({
            "caregiverId": profile_id,
            "startTime": "2030-06-01T09:00:00Z",
            "endTime": "2030-06-01T08:00:00Z",
            "address": "42 Long Enough Street, Springfield"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // address below the minimum length
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(&cust_token),
        Some(json!({
            "caregiverId": profile_id,
            "startTime": "2030-06-01T09:00:00Z",
            "address": "short"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_cancel_rules() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (app, db) = match build_app().await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("skip: cannot set up db: {e}");
            return Ok(());
        }
    };
    let admin = admin_token(&app, &db).await?;
    let (cg_token, _, profile_id) = verified_caregiver(&app, &admin).await?;
    let (cust_token, _) = register(&app, "customer").await?;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(&cust_token),
        Some(json!({
            "caregiverId": profile_id,
            "startTime": "2030-06-01T09:00:00Z",
            "address": "42 Long Enough Street, Springfield"
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let booking_id = body["data"]["id"].as_str().expect("id").to_string();

    // The assigned caregiver may transition, but not cancel on the
    // customer's behalf
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        Some(&cg_token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        Some(&cust_token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");
    Ok(())
}

#[tokio::test]
async fn test_stranger_cannot_update_booking() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (app, db) = match build_app().await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("skip: cannot set up db: {e}");
            return Ok(());
        }
    };
    let admin = admin_token(&app, &db).await?;
    let (_, _, profile_id) = verified_caregiver(&app, &admin).await?;
    let (cust_token, _) = register(&app, "customer").await?;
    let (stranger_token, _) = register(&app, "customer").await?;

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(&cust_token),
        Some(json!({
            "caregiverId": profile_id,
            "startTime": "2030-06-01T09:00:00Z",
            "address": "42 Long Enough Street, Springfield"
        })),
    )
    .await?;
    let booking_id = body["data"]["id"].as_str().expect("id").to_string();

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/v1/bookings/{booking_id}"),
        Some(&stranger_token),
        Some(json!({"status": "confirmed"})),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn test_my_bookings_listing_is_scoped() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (app, db) = match build_app().await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("skip: cannot set up db: {e}");
            return Ok(());
        }
    };
    let admin = admin_token(&app, &db).await?;
    let (cg_token, _, profile_id) = verified_caregiver(&app, &admin).await?;
    let (cust_token, _) = register(&app, "customer").await?;

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(&cust_token),
            Some(json!({
                "caregiverId": profile_id,
                "startTime": "2030-06-01T09:00:00Z",
                "address": "42 Long Enough Street, Springfield"
            })),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/v1/bookings/me?page=1&limit=2", Some(&cust_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);

    // The caregiver sees the same three bookings from their side
    let (status, body) = send(&app, "GET", "/api/v1/bookings/me", Some(&cg_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);

    // A fresh customer sees none of them
    let (other_token, _) = register(&app, "customer").await?;
    let (_, body) = send(&app, "GET", "/api/v1/bookings/me", Some(&other_token), None).await?;
    assert_eq!(body["pagination"]["total"], 0);
    Ok(())
}

#[tokio::test]
async fn test_admin_surfaces() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (app, db) = match build_app().await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("skip: cannot set up db: {e}");
            return Ok(());
        }
    };
    let admin = admin_token(&app, &db).await?;

    // Pending profile shows up in the review queue
    let (cg_token, cg_user_id) = register(&app, "caregiver").await?;
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/caregivers/profile",
        Some(&cg_token),
        Some(json!({"services": ["companionship"], "experienceYears": 1})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/api/v1/admin/verifications/pending?limit=100", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    let pending = body["data"].as_array().expect("array");
    assert!(pending.iter().any(|p| p["userId"] == json!(cg_user_id.to_string())));

    let (status, body) = send(&app, "GET", "/api/v1/admin/reports", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["totalUsers"].as_u64().unwrap_or(0) >= 2);
    assert!(body["data"]["bookingsByStatus"].as_array().map(Vec::len) == Some(5));

    // Non-admin callers are rejected
    let (status, _) = send(&app, "GET", "/api/v1/admin/reports", Some(&cg_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "GET", "/api/v1/users", Some(&cg_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
