use std::sync::Arc;

use log::info;

use crate::api_client::types::{endpoints, Payload};
use crate::api_client::ApiClient;
use crate::error_handling::types::ApiError;
use crate::session_management::session::User;

use super::types::UserPayload;

/// Account administration, reserved to administrators by the server.
pub struct UserService {
    api: Arc<ApiClient>,
}

impl UserService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn user_path(id: u64) -> String {
        format!("{}/{}", endpoints::USERS, id)
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.api.get::<Payload<Vec<User>>>(endpoints::USERS).await?.into_inner())
    }

    pub async fn get(&self, id: u64) -> Result<User, ApiError> {
        Ok(self.api.get::<Payload<User>>(&Self::user_path(id)).await?.into_inner())
    }

    pub async fn create(&self, payload: &UserPayload) -> Result<User, ApiError> {
        let user = self
            .api
            .post::<_, Payload<User>>(endpoints::USERS, payload)
            .await?
            .into_inner();
        info!("Created user {} ({})", user.id, user.role);
        Ok(user)
    }

    pub async fn update(&self, id: u64, payload: &UserPayload) -> Result<User, ApiError> {
        Ok(self
            .api
            .put::<_, Payload<User>>(&Self::user_path(id), payload)
            .await?
            .into_inner())
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete(&Self::user_path(id)).await?;
        info!("Deleted user {}", id);
        Ok(())
    }
}
