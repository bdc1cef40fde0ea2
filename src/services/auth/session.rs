use super::AuthService;
use crate::errors::{CampusError, Result};
use crate::models::users::entities::User;

pub async fn current_user(service: &AuthService, session: Option<i64>) -> Result<Option<User>> {
    match session {
        Some(user_id) => service.get_storage().get_user_by_id(user_id).await,
        None => Ok(None),
    }
}

pub async fn require_user(service: &AuthService, session: Option<i64>) -> Result<User> {
    current_user(service, session)
        .await?
        .ok_or_else(|| CampusError::authentication("Login required"))
}
