//! AI recommendation session endpoints.
//!
//! The backend contract is a fixed call sequence: `start` issues an opaque
//! session id, each preference call carries that id, and `ingredients`
//! terminates the session and returns the recommendations. The sequencing
//! itself lives in [`crate::wizard`].

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::transport::ApiRequest;

use super::ApiClient;

/// Opaque id for one AI recommendation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSession(pub String);

impl std::fmt::Display for AiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ApiClient {
    /// Start an AI session. A missing session id in the response is fatal
    /// for this submission.
    pub async fn ai_start(&self) -> Result<AiSession, ApiError> {
        let response = self
            .transport()
            .execute(ApiRequest::post("/ai/start", json!({})))
            .await?;
        response
            .body
            .get("sessionId")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| AiSession(s.to_string()))
            .ok_or(ApiError::MissingSessionId)
    }

    pub async fn ai_set_preference(
        &self,
        session: &AiSession,
        value: &str,
    ) -> Result<(), ApiError> {
        self.ai_set("/ai/preference", session, value).await
    }

    pub async fn ai_set_meal_time(&self, session: &AiSession, value: &str) -> Result<(), ApiError> {
        self.ai_set("/ai/mealtime", session, value).await
    }

    pub async fn ai_set_weather(&self, session: &AiSession, value: &str) -> Result<(), ApiError> {
        self.ai_set("/ai/weather", session, value).await
    }

    pub async fn ai_set_difficulty(
        &self,
        session: &AiSession,
        value: &str,
    ) -> Result<(), ApiError> {
        self.ai_set("/ai/difficulty", session, value).await
    }

    pub async fn ai_set_flavor(&self, session: &AiSession, value: &str) -> Result<(), ApiError> {
        self.ai_set("/ai/flavor", session, value).await
    }

    /// One call per allergy value; the backend accumulates them per session.
    pub async fn ai_set_allergy(&self, session: &AiSession, value: &str) -> Result<(), ApiError> {
        self.ai_set("/ai/allergy", session, value).await
    }

    /// Terminal call: submit the ingredient text and receive the raw
    /// recommendation payload.
    pub async fn ai_recommend(
        &self,
        session: &AiSession,
        ingredients: &str,
    ) -> Result<Value, ApiError> {
        let response = self
            .transport()
            .execute(ApiRequest::post(
                "/ai/ingredients",
                json!({ "sessionId": session.0, "value": ingredients }),
            ))
            .await?;
        Ok(response.body)
    }

    async fn ai_set(&self, path: &str, session: &AiSession, value: &str) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::post(
                path,
                json!({ "sessionId": session.0, "value": value }),
            ))
            .await?;
        Ok(())
    }
}
