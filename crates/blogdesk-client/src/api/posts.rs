use super::item_path;
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Post, PostPayload};
use crate::types::ApiRequest;

const POSTS: &str = "/api/v1/posts/";
const ADMIN_POSTS: &str = "/api/v1/admin/posts/";

impl ApiClient {
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        self.request(ApiRequest::get(POSTS)).await?.decode()
    }

    pub async fn read_post(&self, id: &str) -> Result<Post> {
        self.request(ApiRequest::get(item_path(POSTS, id)))
            .await?
            .decode()
    }

    pub async fn admin_list_posts(&self) -> Result<Vec<Post>> {
        self.request(ApiRequest::get(ADMIN_POSTS)).await?.decode()
    }

    pub async fn admin_create_post(&self, payload: &PostPayload) -> Result<Post> {
        let request = ApiRequest::post(ADMIN_POSTS).with_json(payload)?;
        self.request(request).await?.decode()
    }

    pub async fn admin_get_post(&self, id: &str) -> Result<Post> {
        self.request(ApiRequest::get(item_path(ADMIN_POSTS, id)))
            .await?
            .decode()
    }

    pub async fn admin_update_post(&self, id: &str, payload: &PostPayload) -> Result<Post> {
        let request = ApiRequest::put(item_path(ADMIN_POSTS, id)).with_json(payload)?;
        self.request(request).await?.decode()
    }

    pub async fn admin_delete_post(&self, id: &str) -> Result<()> {
        self.request(ApiRequest::delete(item_path(ADMIN_POSTS, id)))
            .await?;
        Ok(())
    }
}
