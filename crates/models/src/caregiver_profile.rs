use sea_orm::{entity::prelude::*, Set, DatabaseConnection, FromJsonQueryResult};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::user;

/// Service tags a caregiver can offer.
pub const SERVICE_TAGS: &[&str] = &[
    "nursing",
    "physiotherapy",
    "adl",
    "companionship",
    "medication",
    "other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "verified")]
    Verified,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(errors::ModelError::Validation(format!("unknown verification status: {other}"))),
        }
    }
}

/// JSON-backed list of service tags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ServiceTags(pub Vec<String>);

impl ServiceTags {
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "caregiver_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub services: ServiceTags,
    pub experience_years: i32,
    pub verified: bool,
    pub verification_status: VerificationStatus,
    pub rating: Option<f32>,
    pub hourly_rate_cents: Option<i32>,
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_services(services: &[String]) -> Result<(), errors::ModelError> {
    if services.is_empty() {
        return Err(errors::ModelError::Validation("at least one service is required".into()));
    }
    for s in services {
        if !SERVICE_TAGS.contains(&s.as_str()) {
            return Err(errors::ModelError::Validation(format!("unknown service tag: {s}")));
        }
    }
    Ok(())
}

pub fn validate_experience_years(years: i32) -> Result<(), errors::ModelError> {
    if !(0..=50).contains(&years) {
        return Err(errors::ModelError::Validation("experience years must be 0..=50".into()));
    }
    Ok(())
}

pub fn validate_bio(bio: &str) -> Result<(), errors::ModelError> {
    if bio.chars().count() > 500 {
        return Err(errors::ModelError::Validation("bio cannot exceed 500 characters".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    services: Vec<String>,
    experience_years: i32,
    hourly_rate_cents: Option<i32>,
    bio: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_services(&services)?;
    validate_experience_years(experience_years)?;
    if let Some(rate) = hourly_rate_cents {
        if rate < 0 {
            return Err(errors::ModelError::Validation("hourly rate cannot be negative".into()));
        }
    }
    if let Some(b) = &bio {
        validate_bio(b)?;
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        services: Set(ServiceTags(services)),
        experience_years: Set(experience_years),
        verified: Set(false),
        verification_status: Set(VerificationStatus::Pending),
        rating: Set(None),
        hourly_rate_cents: Set(hourly_rate_cents),
        bio: Set(bio),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
