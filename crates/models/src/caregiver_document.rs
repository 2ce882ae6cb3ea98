use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::caregiver_profile;
use crate::errors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    #[sea_orm(string_value = "id_proof")]
    IdProof,
    #[sea_orm(string_value = "qualification")]
    Qualification,
    #[sea_orm(string_value = "background_check")]
    BackgroundCheck,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "caregiver_document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub profile_id: Uuid,
    pub doc_type: DocType,
    pub url: String,
    pub verified: bool,
    pub uploaded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Profile }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Profile => Entity::belongs_to(caregiver_profile::Entity)
                .from(Column::ProfileId)
                .to(caregiver_profile::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    profile_id: Uuid,
    doc_type: DocType,
    url: &str,
) -> Result<Model, errors::ModelError> {
    if url.trim().is_empty() || url.len() > 1024 {
        return Err(errors::ModelError::Validation("document url must be 1..=1024 characters".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        profile_id: Set(profile_id),
        doc_type: Set(doc_type),
        url: Set(url.trim().to_string()),
        verified: Set(false),
        uploaded_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_for_profile(
    db: &DatabaseConnection,
    profile_id: Uuid,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::ProfileId.eq(profile_id))
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
