pub mod login;
pub mod session;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::users::{entities::User, requests::LoginRequest};
use crate::storage::Storage;

pub struct AuthService {
    storage: Arc<dyn Storage>,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub(crate) fn get_storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    // 邮箱密码登录
    pub async fn login(&self, req: LoginRequest) -> Result<User> {
        login::login(self, req).await
    }

    // 根据会话中的用户 ID 解析当前用户
    pub async fn current_user(&self, session: Option<i64>) -> Result<Option<User>> {
        session::current_user(self, session).await
    }

    // 同上，但必须已登录
    pub async fn require_user(&self, session: Option<i64>) -> Result<User> {
        session::require_user(self, session).await
    }
}
