//! API client behavior against the mock transport: token lifecycle and
//! endpoint shapes.

use std::sync::Arc;

use serde_json::json;

use fridgechef_core::models::{RateRequest, RecipeType};
use fridgechef_core::{
    ApiClient, ApiError, MemoryTokenStore, MockTransport, Session, Tokens,
};

fn session_with_tokens() -> Arc<Session> {
    Arc::new(Session::new(Box::new(MemoryTokenStore::with_tokens(
        Tokens {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        },
    ))))
}

fn empty_session() -> Arc<Session> {
    Arc::new(Session::new(Box::new(MemoryTokenStore::new())))
}

#[tokio::test]
async fn test_login_stores_token_pair() {
    let transport = Arc::new(MockTransport::new().with_json(
        "/login",
        json!({ "accessToken": "new-access", "refreshToken": "new-refresh" }),
    ));
    let session = empty_session();
    let client = ApiClient::new(transport, Arc::clone(&session));

    client.login("chef@example.com", "hunter2").await.unwrap();
    assert_eq!(session.access_token().await, Some("new-access".to_string()));
    assert_eq!(
        session.refresh_token().await,
        Some("new-refresh".to_string())
    );
}

#[tokio::test]
async fn test_logout_clears_tokens_even_if_call_fails() {
    let transport =
        Arc::new(MockTransport::new().with_error("/logout", 500, "backend unavailable"));
    let session = session_with_tokens();
    let client = ApiClient::new(transport, Arc::clone(&session));

    client.logout().await.unwrap();
    assert!(!session.is_logged_in().await);
}

#[tokio::test]
async fn test_delete_account_clears_tokens() {
    let transport = Arc::new(MockTransport::new().with_json("/delete", json!({})));
    let session = session_with_tokens();
    let client = ApiClient::new(transport, Arc::clone(&session));

    client.delete_account().await.unwrap();
    assert!(!session.is_logged_in().await);
}

#[tokio::test]
async fn test_search_rejects_blank_input_without_network() {
    let transport = Arc::new(MockTransport::new());
    let client = ApiClient::new(transport.clone(), session_with_tokens());

    let err = client.search_recipes("  ").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_search_parses_mixed_dialect_results() {
    let transport = Arc::new(MockTransport::new().with_json(
        "/recipes/search",
        json!([
            { "RCP_NM": "김치찌개", "RCP_SEQ": 3, "ATT_FILE_NO_MAIN": "http://img/3.jpg" },
            { "userRecipeId": 9, "name": "우리집 볶음밥" }
        ]),
    ));
    let client = ApiClient::new(transport, session_with_tokens());

    let results = client.search_recipes("김치").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title(), "김치찌개");
    assert_eq!(results[0].recipe_type(), RecipeType::Public);
    assert_eq!(results[1].title(), "우리집 볶음밥");
    assert_eq!(results[1].recipe_type(), RecipeType::User);
}

#[tokio::test]
async fn test_recipe_detail_encodes_title() {
    let encoded = format!("/recipes/details/{}", urlencoding::encode("김치 찌개"));
    let transport = Arc::new(
        MockTransport::new().with_json(&encoded, json!({ "publicRecipe": { "RCP_NM": "김치 찌개" } })),
    );
    let client = ApiClient::new(transport.clone(), session_with_tokens());

    let detail = client.recipe_detail("김치 찌개").await.unwrap();
    assert!(detail.public_recipe().is_some());
    assert_eq!(transport.calls()[0].path, encoded);
}

#[tokio::test]
async fn test_rate_falls_back_to_update_when_rejected() {
    let transport = Arc::new(
        MockTransport::new()
            .with_error("/rating/rate", 409, "already rated")
            .with_json("/rating/update", json!({})),
    );
    let client = ApiClient::new(transport.clone(), session_with_tokens());

    let request = RateRequest {
        recipe_id: 3,
        recipe_type: RecipeType::Public,
        rating_score: 4.0,
        like_flag: false,
    };
    client.rate(&request).await.unwrap();

    let paths: Vec<String> = transport.calls().iter().map(|c| c.path.clone()).collect();
    assert_eq!(paths, vec!["/rating/rate", "/rating/update"]);
    assert_eq!(
        transport.calls()[1].body.as_ref().unwrap()["recipeType"],
        "PUBLIC"
    );
}

#[tokio::test]
async fn test_update_rating_puts_existing_rating() {
    let transport = Arc::new(MockTransport::new().with_json("/rating/update", json!({})));
    let client = ApiClient::new(transport.clone(), session_with_tokens());

    let request = RateRequest {
        recipe_id: 7,
        recipe_type: RecipeType::User,
        rating_score: 2.5,
        like_flag: false,
    };
    client.update_rating(&request).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method.as_str(), "PUT");
    assert_eq!(calls[0].path, "/rating/update");
    let body = calls[0].body.as_ref().unwrap();
    assert_eq!(body["recipeId"], 7);
    assert_eq!(body["recipeType"], "USER");
    assert_eq!(body["ratingScore"], 2.5);
}

#[tokio::test]
async fn test_my_board_posts_filters_by_profile_email() {
    let transport = Arc::new(
        MockTransport::new()
            .with_json(
                "/profile",
                json!({ "username": "chef", "email": "chef@example.com" }),
            )
            .with_json(
                "/board",
                json!([
                    { "boardId": 1, "title": "내 글", "user": { "email": "chef@example.com" } },
                    { "boardId": 2, "title": "남의 글", "user": { "email": "other@example.com" } },
                    { "boardId": 3, "title": "작성자 없음" }
                ]),
            ),
    );
    let client = ApiClient::new(transport, session_with_tokens());

    let posts = client.my_board_posts().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].board_id, 1);
    assert_eq!(posts[0].title, "내 글");
}
