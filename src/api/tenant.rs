//! Tenant extraction.
//!
//! Authentication happens in front of this service. The authenticating proxy forwards the
//! caller's user id in the `x-admin-id` header; every handler scopes its queries by it.

use super::ApiState;
use crate::{core::user, errors::Error};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

/// Header carrying the authenticated admin's user id
pub const ADMIN_HEADER: &str = "x-admin-id";

/// Id of the admin the request acts for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminId(pub i64);

impl FromRequestParts<ApiState> for AdminId {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let admin_id: i64 = parts
            .headers
            .get(ADMIN_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .ok_or(Error::Unauthorized)?;

        if user::get_user_by_id(&state.database, admin_id)
            .await?
            .is_none()
        {
            debug!(admin_id, "Rejected request for unknown admin");
            return Err(Error::Unauthorized);
        }

        Ok(Self(admin_id))
    }
}
