use tracing::{debug, info};

use super::AuthService;
use crate::errors::{CampusError, Result};
use crate::models::users::{entities::User, requests::LoginRequest};
use crate::utils::validate_email;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub async fn login(service: &AuthService, req: LoginRequest) -> Result<User> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(CampusError::authentication(INVALID_CREDENTIALS));
    };

    let email = email.trim();
    if validate_email(email).is_err() {
        debug!("Login rejected: malformed email");
        return Err(CampusError::authentication(INVALID_CREDENTIALS));
    }

    let storage = service.get_storage();
    match storage.get_user_by_credentials(email, &password).await? {
        Some(user) => {
            info!("User {} logged in", user.id);
            Ok(user)
        }
        None => Err(CampusError::authentication(INVALID_CREDENTIALS)),
    }
}
