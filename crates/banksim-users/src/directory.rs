use async_trait::async_trait;
use banksim_types::{BankError, RequestContext, Result, UserId, UserInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::lookup::{LookupError, UserLookup};

/// Partial update of a user record; absent or empty fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// In-memory user directory
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<UserId, UserInfo>>,
}

impl UserDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return its freshly generated id
    pub async fn create_user(
        &self,
        _ctx: &RequestContext,
        login: &str,
        email: &str,
    ) -> Result<UserId> {
        if login.is_empty() {
            return Err(BankError::invalid_argument("login must not be empty"));
        }
        if email.is_empty() {
            return Err(BankError::invalid_argument("email must not be empty"));
        }

        let id = UserId::new(Uuid::new_v4().to_string());
        let user = UserInfo {
            id: id.clone(),
            login: login.to_string(),
            email: email.to_string(),
        };

        self.users.write().await.insert(id.clone(), user);
        info!(user_id = %id, login, "user created");
        Ok(id)
    }

    pub async fn get_user(&self, _ctx: &RequestContext, id: &UserId) -> Result<UserInfo> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| BankError::not_found(format!("user does not exist {}", id)))
    }

    /// All users, in no particular order. The only directory call that
    /// looks at the caller's context.
    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<UserInfo>> {
        ctx.ensure_active()?;

        Ok(self.users.read().await.values().cloned().collect())
    }

    pub async fn update_user(
        &self,
        _ctx: &RequestContext,
        id: &UserId,
        update: UserUpdate,
    ) -> Result<UserInfo> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| BankError::not_found("user doesn't exist"))?;

        if let Some(email) = update.email.filter(|e| !e.is_empty()) {
            user.email = email;
        }
        if let Some(login) = update.login.filter(|l| !l.is_empty()) {
            user.login = login;
        }

        info!(user_id = %id, "user updated");
        Ok(user.clone())
    }

    /// Remove a user. Ledger accounts keep their owner snapshot.
    pub async fn delete_user(&self, _ctx: &RequestContext, id: &UserId) -> Result<()> {
        if self.users.write().await.remove(id).is_none() {
            return Err(BankError::not_found("user doesn't exist"));
        }

        info!(user_id = %id, "user deleted");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserLookup for UserDirectory {
    async fn get_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
    ) -> std::result::Result<UserInfo, LookupError> {
        UserDirectory::get_user(self, ctx, id)
            .await
            .map_err(LookupError::Status)
    }
}
