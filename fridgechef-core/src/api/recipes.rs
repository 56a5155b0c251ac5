//! Recipe search, detail, and user-recipe CRUD endpoints.

use serde_json::json;

use crate::error::ApiError;
use crate::models::{RecipeDetail, RecipeSummary, UserRecipe, UserRecipeUpsert};
use crate::transport::ApiRequest;

use super::ApiClient;

impl ApiClient {
    /// Search recipes by a free-text ingredient list.
    pub async fn search_recipes(&self, ingredients: &str) -> Result<Vec<RecipeSummary>, ApiError> {
        if ingredients.trim().is_empty() {
            return Err(ApiError::Validation("재료를 입력해주세요".to_string()));
        }
        self.transport()
            .execute(ApiRequest::get("/recipes/search").with_query("ingredients", ingredients))
            .await?
            .json()
    }

    /// Detail lookup by title: public-dataset recipe plus user uploads.
    pub async fn recipe_detail(&self, title: &str) -> Result<RecipeDetail, ApiError> {
        let path = format!("/recipes/details/{}", urlencoding::encode(title));
        self.transport().execute(ApiRequest::get(path)).await?.json()
    }

    pub async fn recipe_by_id(&self, recipe_id: i64) -> Result<RecipeSummary, ApiError> {
        self.transport()
            .execute(ApiRequest::get(format!("/recipes/{recipe_id}")))
            .await?
            .json()
    }

    pub async fn my_recipes(&self) -> Result<Vec<UserRecipe>, ApiError> {
        self.transport()
            .execute(ApiRequest::get("/recipes/my"))
            .await?
            .json()
    }

    pub async fn create_user_recipe(&self, recipe: &UserRecipeUpsert) -> Result<(), ApiError> {
        let body = serde_json::to_value(recipe).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.transport()
            .execute(ApiRequest::post("/recipes/user", body))
            .await?;
        Ok(())
    }

    pub async fn update_user_recipe(
        &self,
        user_recipe_id: i64,
        recipe: &UserRecipeUpsert,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_value(recipe).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.transport()
            .execute(ApiRequest::put(format!("/recipes/{user_recipe_id}"), body))
            .await?;
        Ok(())
    }

    pub async fn delete_user_recipe(&self, user_recipe_id: i64) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::delete(format!("/recipes/{user_recipe_id}")))
            .await?;
        Ok(())
    }

    /// Plain (non-session) recommendation by ingredients.
    pub async fn recommend(&self, ingredients: &str) -> Result<Vec<RecipeSummary>, ApiError> {
        if ingredients.trim().is_empty() {
            return Err(ApiError::Validation("재료를 입력해주세요".to_string()));
        }
        self.transport()
            .execute(ApiRequest::post(
                "/recommend",
                json!({ "ingredients": ingredients }),
            ))
            .await?
            .json()
    }
}
