//! User business logic - admin accounts that own inventory.
//!
//! Credentials and login are handled outside this service; this module only keeps the
//! identity rows that every other table points at.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Finds a user by primary key.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by login name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new admin user.
///
/// Name and username are trimmed; blank email is stored as `None`.
///
/// # Errors
/// Returns an error if:
/// - The name or username is empty or whitespace-only
/// - The username is already taken
/// - The database insert operation fails
pub async fn create_user(
    db: &DatabaseConnection,
    name: String,
    username: String,
    email: Option<String>,
) -> Result<user::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::MissingField { field: "name" });
    }
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::MissingField { field: "username" });
    }

    if get_user_by_username(db, username).await?.is_some() {
        return Err(Error::DuplicateUsername {
            username: username.to_string(),
        });
    }

    let user = user::ActiveModel {
        name: Set(name.to_string()),
        username: Set(username.to_string()),
        email: Set(email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let user = user.insert(db).await?;
    info!(user_id = user.id, "Created user {}", user.username);
    Ok(user)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_user_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_user(&db, "  ".to_string(), "jdoe".to_string(), None).await;
        assert!(matches!(result, Err(Error::MissingField { field: "name" })));

        let result = create_user(&db, "John".to_string(), String::new(), None).await;
        assert!(matches!(
            result,
            Err(Error::MissingField { field: "username" })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let user = create_user(
            &db,
            " John Doe ".to_string(),
            "johndoe".to_string(),
            Some("  ".to_string()),
        )
        .await?;
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.username, "johndoe");
        assert_eq!(user.email, None);

        let found = get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(found, user);
        let found = get_user_by_username(&db, "johndoe").await?.unwrap();
        assert_eq!(found.id, user.id);
        assert!(get_user_by_username(&db, "nobody").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() -> Result<()> {
        let (db, admin) = setup_with_admin().await?;

        let result = create_user(&db, "Other".to_string(), admin.username.clone(), None).await;
        assert!(matches!(
            result,
            Err(Error::DuplicateUsername { username }) if username == admin.username
        ));

        Ok(())
    }
}
