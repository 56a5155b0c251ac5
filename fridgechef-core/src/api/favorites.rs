//! Favorite endpoints.

use serde_json::json;

use crate::error::ApiError;
use crate::models::Favorite;
use crate::transport::ApiRequest;

use super::ApiClient;

impl ApiClient {
    pub async fn favorites(&self) -> Result<Vec<Favorite>, ApiError> {
        self.transport()
            .execute(ApiRequest::get("/favorites"))
            .await?
            .json()
    }

    pub async fn add_favorite(&self, recipe_id: i64) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::post(
                format!("/favorites/{recipe_id}"),
                json!({}),
            ))
            .await?;
        Ok(())
    }

    pub async fn remove_favorite(&self, recipe_id: i64) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::delete(format!("/favorites/{recipe_id}")))
            .await?;
        Ok(())
    }
}
