// src/api/admin.rs

use crate::{
    api::ApiClient,
    error::ClientError,
    models::{
        stats::AdminStats,
        user::{User, UserAction},
    },
};

impl ApiClient {
    pub async fn admin_stats(&self) -> Result<AdminStats, ClientError> {
        self.get("/admin/stats").await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.get("/users").await
    }

    /// Applies a moderation action and returns the updated account.
    pub async fn moderate_user(&self, user_id: i64, action: UserAction) -> Result<User, ClientError> {
        let user: User = self
            .post(
                &format!("/users/{}/{}", user_id, action.as_path()),
                &serde_json::json!({}),
            )
            .await?;
        tracing::info!("Applied {:?} to user {}", action, user.username);
        Ok(user)
    }
}
