//! Account endpoints: signup, login, logout, profile, withdrawal.

use serde_json::json;

use crate::auth::Tokens;
use crate::error::ApiError;
use crate::models::{LoginRequest, Profile, ProfileUpdate, SignupRequest};
use crate::transport::ApiRequest;

use super::ApiClient;

impl ApiClient {
    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.transport()
            .execute(ApiRequest::post("/signup", body))
            .await?;
        Ok(())
    }

    /// Log in and store the returned token pair in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body = serde_json::to_value(&request).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self
            .transport()
            .execute(ApiRequest::post("/login", body))
            .await?;

        let tokens: Tokens = response.json()?;
        self.session().set_tokens(tokens).await?;
        Ok(())
    }

    /// Log out: drop the stored tokens, then tell the backend (best effort,
    /// matching the original client which discards tokens first).
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session().clear().await?;
        if let Err(e) = self
            .transport()
            .execute(ApiRequest::post("/logout", json!({})))
            .await
        {
            tracing::debug!(error = %e, "logout call failed after clearing tokens");
        }
        Ok(())
    }

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.transport()
            .execute(ApiRequest::get("/profile"))
            .await?
            .json()
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.transport()
            .execute(ApiRequest::put("/profile", body))
            .await?;
        Ok(())
    }

    /// Delete the account and drop the stored tokens.
    pub async fn delete_account(&self) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::delete("/delete"))
            .await?;
        self.session().clear().await?;
        Ok(())
    }
}
