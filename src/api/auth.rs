// src/api/auth.rs

use reqwest::Method;
use validator::Validate;

use crate::{
    api::ApiClient,
    error::ClientError,
    models::user::{LoginRequest, RegisterRequest, User},
};

impl ApiClient {
    /// Authenticates and returns the account.
    /// The server keeps its own session cookie; the caller decides where to store the identity.
    pub async fn login(&self, req: &LoginRequest) -> Result<User, ClientError> {
        req.validate()?;
        self.post("/auth/login", req).await
    }

    /// Registers a new account. Password confirmation is checked locally.
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, ClientError> {
        req.validate()?;
        self.post("/auth/register", req).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.command(Method::POST, "/auth/logout").await?;
        Ok(())
    }
}
