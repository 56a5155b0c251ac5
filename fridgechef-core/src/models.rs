//! Backend payload models.
//!
//! The backend mixes three payload dialects: public-dataset recipes
//! (upper-case `RCP_*` fields), AI-generated recipes, and user-submitted
//! recipes. Structured models cover the stable shapes; the alias helpers and
//! [`RecipeSummary`] cover the heterogeneous ones without throwing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// First string value among the given keys.
pub(crate) fn str_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| value.get(k).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

/// First integer value among the given keys; numeric strings count.
pub(crate) fn num_field(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| match value.get(k) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    /// Empty when the password is unchanged, matching the profile form.
    pub password: String,
}

/// Whether a recipe came from the public dataset or a user upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecipeType {
    Public,
    User,
}

impl RecipeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::Public => "PUBLIC",
            RecipeType::User => "USER",
        }
    }
}

/// A recipe in a list response, kept as raw JSON because the backend mixes
/// dialects in one array. Accessors pick the first populated alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeSummary {
    pub raw: Value,
}

impl RecipeSummary {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn title(&self) -> &str {
        str_field(&self.raw, &["title", "name", "foodName", "RCP_NM"]).unwrap_or("제목 없음")
    }

    pub fn image_url(&self) -> Option<&str> {
        str_field(&self.raw, &["imageUrl", "image", "ATT_FILE_NO_MAIN"])
    }

    pub fn id(&self) -> Option<i64> {
        num_field(&self.raw, &["recipeId", "userRecipeId", "RCP_SEQ"])
    }

    pub fn recipe_type(&self) -> RecipeType {
        if self.raw.get("userRecipeId").is_some() {
            RecipeType::User
        } else {
            RecipeType::Public
        }
    }

    pub fn ingredients_text(&self) -> Option<&str> {
        str_field(&self.raw, &["ingredients", "RCP_PARTS_DTLS"])
    }

    pub fn description_text(&self) -> Option<&str> {
        str_field(&self.raw, &["description", "RCP_WAY2", "manual"])
    }
}

/// Response of `GET /recipes/details/{title}`.
///
/// `publicRecipe` has been observed both as an object and as an array with
/// one element; `userRecipe` is an array of user uploads for the same title.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(default)]
    pub public_recipe: Option<Value>,
    #[serde(default)]
    pub user_recipe: Option<Value>,
}

impl RecipeDetail {
    /// The public-dataset recipe, unwrapping the single-element-array variant.
    pub fn public_recipe(&self) -> Option<&Value> {
        match self.public_recipe.as_ref() {
            Some(Value::Array(items)) => items.first(),
            Some(Value::Null) | None => None,
            other => other,
        }
    }

    pub fn user_recipes(&self) -> Vec<&Value> {
        match self.user_recipe.as_ref() {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecipe {
    pub user_recipe_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub base_recipe_name: String,
}

/// Payload for creating or updating a user recipe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecipeUpsert {
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub ingredients: String,
    pub base_recipe_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRatedEntry {
    pub recipe_id: i64,
    #[serde(default)]
    pub average_rating: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAverage {
    #[serde(default)]
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    pub recipe_id: i64,
    pub recipe_type: RecipeType,
    pub rating_score: f64,
    pub like_flag: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyRating {
    pub rating_id: i64,
    pub recipe_id: i64,
    #[serde(default)]
    pub recipe_name: String,
    #[serde(default)]
    pub rating_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub recipe_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardAuthor {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPost {
    pub board_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub user: Option<BoardAuthor>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub comment_id: Option<i64>,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub user: Option<BoardAuthor>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One AI recommendation. The backend wraps the list under varying keys and
/// varies the item fields, so this stays raw like [`RecipeSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recommendation {
    pub raw: Value,
}

impl Recommendation {
    pub fn title(&self) -> &str {
        str_field(&self.raw, &["title", "foodName", "name"]).unwrap_or("추천 레시피")
    }

    pub fn image_url(&self) -> Option<&str> {
        str_field(&self.raw, &["imageUrl", "image"])
    }

    /// Pull the recommendation list out of the response payload, whichever
    /// key the backend used this time.
    pub fn list_from_payload(payload: &Value) -> Vec<Recommendation> {
        let items = ["recommendations", "items", "titles", "list"]
            .iter()
            .find_map(|k| payload.get(*k).and_then(Value::as_array))
            .or_else(|| payload.as_array());

        items
            .map(|arr| arr.iter().cloned().map(|raw| Recommendation { raw }).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_public_dataset_aliases() {
        let summary = RecipeSummary::new(json!({
            "RCP_NM": "김치찌개",
            "RCP_SEQ": "28",
            "ATT_FILE_NO_MAIN": "http://img/1.jpg",
            "RCP_PARTS_DTLS": "김치, 돼지고기"
        }));
        assert_eq!(summary.title(), "김치찌개");
        assert_eq!(summary.id(), Some(28));
        assert_eq!(summary.image_url(), Some("http://img/1.jpg"));
        assert_eq!(summary.recipe_type(), RecipeType::Public);
    }

    #[test]
    fn test_summary_user_recipe_aliases() {
        let summary = RecipeSummary::new(json!({
            "userRecipeId": 5,
            "name": "우리집 볶음밥",
            "ingredients": "밥, 달걀"
        }));
        assert_eq!(summary.title(), "우리집 볶음밥");
        assert_eq!(summary.id(), Some(5));
        assert_eq!(summary.recipe_type(), RecipeType::User);
        assert!(summary.image_url().is_none());
    }

    #[test]
    fn test_summary_missing_title_falls_back() {
        let summary = RecipeSummary::new(json!({ "recipeId": 1 }));
        assert_eq!(summary.title(), "제목 없음");
    }

    #[test]
    fn test_detail_public_recipe_array_variant() {
        let detail: RecipeDetail = serde_json::from_value(json!({
            "publicRecipe": [{ "RCP_NM": "비빔밥" }],
            "userRecipe": null
        }))
        .unwrap();
        assert_eq!(
            detail.public_recipe().and_then(|v| v.get("RCP_NM")),
            Some(&json!("비빔밥"))
        );
        assert!(detail.user_recipes().is_empty());
    }

    #[test]
    fn test_recommendation_payload_key_variants() {
        let wrapped = json!({ "items": [{ "foodName": "된장찌개" }] });
        let list = Recommendation::list_from_payload(&wrapped);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title(), "된장찌개");

        let bare = json!([{ "title": "부대찌개" }]);
        let list = Recommendation::list_from_payload(&bare);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title(), "부대찌개");

        let empty = json!({ "message": "no results" });
        assert!(Recommendation::list_from_payload(&empty).is_empty());
    }
}
