use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, Value,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::caregiver_document::{self, DocType};
use models::caregiver_profile::{self, ServiceTags, VerificationStatus};
use models::user::{self, Role};

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileInput {
    pub services: Vec<String>,
    pub experience_years: i32,
    #[serde(default)]
    pub hourly_rate_cents: Option<i32>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[serde(default)]
    pub services: Option<Vec<String>>,
    #[serde(default)]
    pub experience_years: Option<i32>,
    #[serde(default)]
    pub hourly_rate_cents: Option<i32>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CaregiverSearchFilters {
    pub city: Option<String>,
    pub service: Option<String>,
    pub min_rating: Option<f32>,
    pub max_price_cents: Option<i32>,
    pub verification_status: Option<VerificationStatus>,
}

/// Public view of the owning user embedded in search results.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaregiverSearchHit {
    #[serde(flatten)]
    pub profile: caregiver_profile::Model,
    pub user: Option<UserSummary>,
}

/// Create a caregiver profile for a user holding the caregiver role.
/// One profile per user.
#[instrument(skip(db, input), fields(user_id = %user_id))]
pub async fn create_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: CreateProfileInput,
) -> Result<caregiver_profile::Model, ServiceError> {
    let owner = user::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    if owner.role != Role::Caregiver {
        return Err(ServiceError::Validation("user must have caregiver role".into()));
    }
    if caregiver_profile::find_by_user(db, user_id).await?.is_some() {
        return Err(ServiceError::Conflict("caregiver profile already exists".into()));
    }
    let created = caregiver_profile::create(
        db,
        user_id,
        input.services,
        input.experience_years,
        input.hourly_rate_cents,
        input.bio,
    )
    .await?;
    info!(profile_id = %created.id, "caregiver_profile_created");
    Ok(created)
}

/// Get a caregiver profile by owning user id.
pub async fn get_profile_by_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<caregiver_profile::Model, ServiceError> {
    caregiver_profile::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("caregiver profile"))
}

/// Profile plus the owning user, for public profile pages.
pub async fn get_profile_with_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<(caregiver_profile::Model, user::Model), ServiceError> {
    let profile = get_profile_by_user(db, user_id).await?;
    let owner = user::Entity::find_by_id(profile.user_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    Ok((profile, owner))
}

/// Patch the caller's own profile.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    input: UpdateProfileInput,
) -> Result<caregiver_profile::Model, ServiceError> {
    let existing = get_profile_by_user(db, user_id).await?;

    if let Some(services) = &input.services {
        caregiver_profile::validate_services(services)?;
    }
    if let Some(years) = input.experience_years {
        caregiver_profile::validate_experience_years(years)?;
    }
    if let Some(rate) = input.hourly_rate_cents {
        if rate < 0 {
            return Err(ServiceError::Validation("hourly rate cannot be negative".into()));
        }
    }
    if let Some(bio) = &input.bio {
        caregiver_profile::validate_bio(bio)?;
    }

    let mut am: caregiver_profile::ActiveModel = existing.into();
    if let Some(services) = input.services {
        am.services = Set(ServiceTags(services));
    }
    if let Some(years) = input.experience_years {
        am.experience_years = Set(years);
    }
    if let Some(rate) = input.hourly_rate_cents {
        am.hourly_rate_cents = Set(Some(rate));
    }
    if let Some(bio) = input.bio {
        am.bio = Set(Some(bio));
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Search caregivers. Unless a verification status filter is given, only
/// verified profiles are returned. City matches the owning user's city,
/// case-insensitively. Ordered best-rated first, then newest.
pub async fn search(
    db: &DatabaseConnection,
    filters: CaregiverSearchFilters,
    opts: Pagination,
) -> Result<Page<CaregiverSearchHit>, ServiceError> {
    // find_also_related joins the owning user, which the city filter and
    // the embedded summary both rely on
    let mut query = caregiver_profile::Entity::find().find_also_related(user::Entity);

    match filters.verification_status {
        Some(status) => {
            query = query.filter(caregiver_profile::Column::VerificationStatus.eq(status));
        }
        None => {
            query = query.filter(caregiver_profile::Column::Verified.eq(true));
        }
    }
    if let Some(tag) = &filters.service {
        let tag_array = serde_json::json!([tag]);
        query = query.filter(Expr::cust_with_values(
            r#""caregiver_profile"."services" @> ?"#,
            [Value::Json(Some(Box::new(tag_array)))],
        ));
    }
    if let Some(min_rating) = filters.min_rating {
        query = query.filter(caregiver_profile::Column::Rating.gte(min_rating));
    }
    if let Some(max_price) = filters.max_price_cents {
        query = query.filter(caregiver_profile::Column::HourlyRateCents.lte(max_price));
    }
    if let Some(city) = &filters.city {
        let pattern = format!("%{}%", city.to_lowercase());
        query = query.filter(
            Expr::expr(Func::lower(Expr::col((user::Entity, user::Column::City)))).like(pattern),
        );
    }

    let (page_idx, per_page) = opts.normalize();
    let paginator = query
        .order_by_desc(caregiver_profile::Column::Rating)
        .order_by_desc(caregiver_profile::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let rows = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;

    let hits = rows
        .into_iter()
        .map(|(profile, owner)| CaregiverSearchHit {
            profile,
            user: owner.map(|u| UserSummary { id: u.id, name: u.name, city: u.city }),
        })
        .collect();
    Ok(Page::new(hits, opts, total))
}

/// Admin decision on a caregiver's verification. The boolean `verified`
/// flag always tracks the status.
#[instrument(skip(db), fields(user_id = %user_id, status = status.as_str()))]
pub async fn update_verification(
    db: &DatabaseConnection,
    user_id: Uuid,
    status: VerificationStatus,
) -> Result<caregiver_profile::Model, ServiceError> {
    let existing = get_profile_by_user(db, user_id).await?;
    let mut am: caregiver_profile::ActiveModel = existing.into();
    am.verified = Set(status == VerificationStatus::Verified);
    am.verification_status = Set(status);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(profile_id = %updated.id, "caregiver_verification_updated");
    Ok(updated)
}

/// Attach an uploaded credential document to the caller's profile.
pub async fn add_document(
    db: &DatabaseConnection,
    user_id: Uuid,
    doc_type: DocType,
    url: &str,
) -> Result<caregiver_document::Model, ServiceError> {
    let profile = get_profile_by_user(db, user_id).await?;
    let doc = caregiver_document::create(db, profile.id, doc_type, url).await?;
    Ok(doc)
}

/// Documents uploaded for the caller's profile.
pub async fn list_documents(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<caregiver_document::Model>, ServiceError> {
    let profile = get_profile_by_user(db, user_id).await?;
    Ok(caregiver_document::list_for_profile(db, profile.id).await?)
}
