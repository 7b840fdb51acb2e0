//! User entity - The admin account that owns every other record.
//!
//! All suppliers, products and transactions carry an `admin_id` pointing here, which is
//! how one tenant's inventory is kept apart from another's.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login name, unique across the system
    #[sea_orm(unique)]
    pub username: String,
    /// Contact email, if known
    pub email: Option<String>,
    /// When the user was created
    pub created_at: DateTimeUtc,
}

/// Users are only referenced from other tables
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
