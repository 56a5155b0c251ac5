//! Rating endpoints.

use crate::error::ApiError;
use crate::models::{MyRating, RateRequest, RatingAverage, RecipeType, TopRatedEntry};
use crate::transport::ApiRequest;

use super::ApiClient;

impl ApiClient {
    pub async fn top10(&self) -> Result<Vec<TopRatedEntry>, ApiError> {
        self.transport()
            .execute(ApiRequest::get("/rating/top10"))
            .await?
            .json()
    }

    pub async fn rating_average(
        &self,
        recipe_type: RecipeType,
        recipe_id: i64,
    ) -> Result<RatingAverage, ApiError> {
        self.transport()
            .execute(ApiRequest::get(format!(
                "/rating/{}/{recipe_id}",
                recipe_type.as_str()
            )))
            .await?
            .json()
    }

    /// Submit a rating; if the backend rejects it because one already exists,
    /// fall back to updating the existing rating.
    pub async fn rate(&self, request: &RateRequest) -> Result<(), ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
        match self
            .transport()
            .execute(ApiRequest::post("/rating/rate", body.clone()))
            .await
        {
            Ok(_) => Ok(()),
            Err(ApiError::Status { status, .. }) => {
                tracing::debug!(status, "rate rejected, trying update");
                self.transport()
                    .execute(ApiRequest::put("/rating/update", body))
                    .await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update_rating(&self, request: &RateRequest) -> Result<(), ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.transport()
            .execute(ApiRequest::put("/rating/update", body))
            .await?;
        Ok(())
    }

    pub async fn my_ratings(&self) -> Result<Vec<MyRating>, ApiError> {
        self.transport()
            .execute(ApiRequest::get("/rating/my"))
            .await?
            .json()
    }

    pub async fn delete_rating(&self, rating_id: i64) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::delete(format!("/rating/delete/{rating_id}")))
            .await?;
        Ok(())
    }
}
