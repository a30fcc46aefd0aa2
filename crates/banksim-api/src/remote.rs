use async_trait::async_trait;
use banksim_types::{RequestContext, Result, UserId, UserInfo};
use banksim_users::{LookupError, UserLookup};

use crate::client::UserClient;

/// [`UserLookup`] backed by a user service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpUserLookup {
    client: UserClient,
}

impl HttpUserLookup {
    pub fn new(user_service_url: &str) -> Result<Self> {
        Ok(HttpUserLookup {
            client: UserClient::new(user_service_url)?,
        })
    }

    pub fn from_client(client: UserClient) -> Self {
        HttpUserLookup { client }
    }
}

#[async_trait]
impl UserLookup for HttpUserLookup {
    async fn get_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
    ) -> std::result::Result<UserInfo, LookupError> {
        self.client.fetch_user(ctx, id).await
    }
}
