use std::sync::Arc;

use crate::{
    api::ApiClient, config::Config, controller::Scorer, error::ClientError,
    identity::SessionStore,
};

/// Everything a screen needs, built once on startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub session: SessionStore,
    pub config: Config,
}

impl AppState {
    /// Builds the API client and restores the persisted identity.
    pub fn from_config(config: Config) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config)?;
        let session = SessionStore::load(&config.session_file)?;
        Ok(Self {
            api,
            session,
            config,
        })
    }

    /// The API client as the scoring collaborator of a test session.
    pub fn scorer(&self) -> Arc<dyn Scorer> {
        Arc::new(self.api.clone())
    }
}
