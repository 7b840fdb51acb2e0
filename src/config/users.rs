//! Admin accounts listed in config.toml.
//!
//! Accounts are seeded on start so that the ids the authenticating proxy forwards resolve to
//! real users. Usernames already present are left untouched.

use crate::{core::user, errors::Result};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// One `[[admins]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Display name
    pub name: String,
    /// Unique login name
    pub username: String,
    /// Contact address
    pub email: Option<String>,
}

/// Creates the configured admins that do not exist yet.
///
/// # Returns
/// Number of admins created
///
/// # Errors
/// Returns an error if an entry has a blank name or username, or a database operation fails.
#[instrument(skip(db, admins))]
pub async fn seed_admins(db: &DatabaseConnection, admins: &[AdminConfig]) -> Result<usize> {
    let mut created = 0;

    for admin in admins {
        if user::get_user_by_username(db, admin.username.trim())
            .await?
            .is_some()
        {
            debug!("Admin '{}' already exists, skipping", admin.username);
            continue;
        }

        user::create_user(
            db,
            admin.name.clone(),
            admin.username.clone(),
            admin.email.clone(),
        )
        .await?;
        created += 1;
    }

    info!("Seeded {} of {} configured admins", created, admins.len());
    Ok(created)
}
