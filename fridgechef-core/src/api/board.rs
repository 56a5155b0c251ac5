//! Community board and comment endpoints.

use serde_json::json;

use crate::error::ApiError;
use crate::models::{BoardPost, Comment};
use crate::transport::ApiRequest;

use super::ApiClient;

impl ApiClient {
    pub async fn board_posts(&self) -> Result<Vec<BoardPost>, ApiError> {
        self.transport()
            .execute(ApiRequest::get("/board"))
            .await?
            .json()
    }

    /// Board posts authored by the logged-in user, matched on profile email.
    pub async fn my_board_posts(&self) -> Result<Vec<BoardPost>, ApiError> {
        let me = self.profile().await?;
        let mut posts = self.board_posts().await?;
        posts.retain(|post| {
            post.user.as_ref().and_then(|u| u.email.as_deref()) == Some(me.email.as_str())
        });
        Ok(posts)
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<(), ApiError> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(ApiError::Validation(
                "제목과 내용을 입력하세요".to_string(),
            ));
        }
        self.transport()
            .execute(ApiRequest::post(
                "/board",
                json!({ "title": title, "content": content }),
            ))
            .await?;
        Ok(())
    }

    pub async fn update_post(
        &self,
        board_id: i64,
        title: &str,
        content: &str,
    ) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::put(
                format!("/board/{board_id}"),
                json!({ "title": title, "content": content }),
            ))
            .await?;
        Ok(())
    }

    pub async fn delete_post(&self, board_id: i64) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::delete(format!("/board/{board_id}")))
            .await?;
        Ok(())
    }

    pub async fn comments(&self, board_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.transport()
            .execute(ApiRequest::get(format!("/comment/{board_id}")))
            .await?
            .json()
    }

    pub async fn add_comment(
        &self,
        board_id: i64,
        content: &str,
        parent_id: Option<i64>,
    ) -> Result<(), ApiError> {
        if content.trim().is_empty() {
            return Err(ApiError::Validation("내용을 입력하세요".to_string()));
        }
        self.transport()
            .execute(ApiRequest::post(
                format!("/comment/{board_id}"),
                json!({ "content": content, "parentId": parent_id }),
            ))
            .await?;
        Ok(())
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ApiError> {
        self.transport()
            .execute(ApiRequest::delete(format!("/comment/{comment_id}")))
            .await?;
        Ok(())
    }
}
