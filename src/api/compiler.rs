// src/api/compiler.rs

use crate::{
    api::ApiClient,
    error::ClientError,
    models::compiler::{CompilerStatus, ExecuteRequest, ExecuteResponse},
};

impl ApiClient {
    /// Sends a snippet to the remote execution service.
    /// `Ok` with `success: false` means the snippet itself failed.
    pub async fn execute_code(&self, code: &str) -> Result<ExecuteResponse, ClientError> {
        if code.trim().is_empty() {
            return Err(ClientError::Validation("No code to run".to_string()));
        }

        let path = "/compiler/execute";
        let url = self.compiler_endpoint(path)?;
        let request = self.http().post(url).json(&ExecuteRequest {
            code: code.to_string(),
        });

        self.compiler_request(request, path).await
    }

    pub async fn compiler_status(&self) -> Result<CompilerStatus, ClientError> {
        let path = "/compiler/check";
        let url = self.compiler_endpoint(path)?;
        self.compiler_request(self.http().get(url), path).await
    }
}
