//! Session-based caller identification.
//!
//! Authentication itself (login, session issuance) lives outside this core.
//! Handlers here only read the established session and turn the stored user
//! id into the [`ActorId`] stamped on mutations.

use actix_session::Session;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ActorId;

use super::error::ApiError;

/// Session key holding the authenticated user's id.
pub const SESSION_USER_KEY: &str = "user_id";

/// The actor behind the current session, or a 401 error.
pub fn require_actor(session: &Session) -> Result<ActorId, ApiError> {
    let user_id = session.get::<Uuid>(SESSION_USER_KEY).map_err(|error| {
        warn!(error = %error, "failed to read session");
        ApiError::unauthorized()
    })?;
    user_id
        .map(ActorId::from_uuid)
        .ok_or_else(ApiError::unauthorized)
}
