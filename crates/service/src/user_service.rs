use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use models::user::{self, Role};

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Admin listing filters.
#[derive(Debug, Clone, Default)]
pub struct UserListFilters {
    pub role: Option<Role>,
    pub city: Option<String>,
    pub is_active: Option<bool>,
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// Get a user by email (lowercased).
pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>, ServiceError> {
    Ok(user::find_by_email(db, email).await?)
}

/// Update a user's own profile fields.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateUserInput,
) -> Result<user::Model, ServiceError> {
    if let Some(name) = &input.name {
        user::validate_name(name)?;
    }
    if let Some(city) = &input.city {
        user::validate_city(city)?;
    }
    let mut am: user::ActiveModel = user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?
        .into();
    if let Some(name) = input.name {
        am.name = Set(name.trim().to_string());
    }
    if let Some(phone) = input.phone {
        am.phone = Set(Some(phone.trim().to_string()));
    }
    if let Some(city) = input.city {
        am.city = Set(Some(city.trim().to_string()));
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Paginated admin listing with optional role / city / activity filters,
/// newest first.
pub async fn list_users(
    db: &DatabaseConnection,
    filters: UserListFilters,
    opts: Pagination,
) -> Result<Page<user::Model>, ServiceError> {
    let mut query = user::Entity::find();
    if let Some(role) = filters.role {
        query = query.filter(user::Column::Role.eq(role));
    }
    if let Some(city) = filters.city {
        query = query.filter(user::Column::City.eq(city));
    }
    if let Some(active) = filters.is_active {
        query = query.filter(user::Column::IsActive.eq(active));
    }
    let (page_idx, per_page) = opts.normalize();
    let paginator = query
        .order_by_desc(user::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(Page::new(items, opts, total))
}

async fn set_active(db: &DatabaseConnection, id: Uuid, active: bool) -> Result<user::Model, ServiceError> {
    let mut am: user::ActiveModel = user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?
        .into();
    am.is_active = Set(active);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Deactivate a user account (blocks login).
pub async fn deactivate_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    set_active(db, id, false).await
}

/// Reactivate a user account.
pub async fn activate_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    set_active(db, id, true).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = match get_db().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {e}");
                return Ok(());
            }
        };

        let email = format!("svc_{}@example.com", Uuid::new_v4());
        let u = user::create(&db, "Svc User", &email, None, Role::Customer).await?;
        assert_eq!(u.email, email);

        let found = get_user(&db, u.id).await?;
        assert_eq!(found.id, u.id);

        let updated = update_profile(
            &db,
            u.id,
            UpdateUserInput { name: Some("New Name".into()), phone: Some("+15550100".into()), city: Some("Pune".into()) },
        )
        .await?;
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.city.as_deref(), Some("Pune"));

        let deactivated = deactivate_user(&db, u.id).await?;
        assert!(!deactivated.is_active);
        let reactivated = activate_user(&db, u.id).await?;
        assert!(reactivated.is_active);

        let page = list_users(
            &db,
            UserListFilters { city: Some("Pune".into()), ..Default::default() },
            Pagination { page: 1, per_page: 10 },
        )
        .await?;
        assert!(page.items.iter().any(|m| m.id == u.id));

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }
}
