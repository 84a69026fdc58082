use super::item_path;
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Category, CategoryPayload, Post};
use crate::types::ApiRequest;

const CATEGORIES: &str = "/api/v1/categories/";
const ADMIN_CATEGORIES: &str = "/api/v1/admin/categories/";

impl ApiClient {
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.request(ApiRequest::get(CATEGORIES)).await?.decode()
    }

    pub async fn read_category(&self, id: &str) -> Result<Category> {
        self.request(ApiRequest::get(item_path(CATEGORIES, id)))
            .await?
            .decode()
    }

    /// Posts filed under one category.
    pub async fn list_category_posts(&self, id: &str) -> Result<Vec<Post>> {
        let path = format!("{}/posts", item_path(CATEGORIES, id));
        self.request(ApiRequest::get(path)).await?.decode()
    }

    pub async fn admin_list_categories(&self) -> Result<Vec<Category>> {
        self.request(ApiRequest::get(ADMIN_CATEGORIES))
            .await?
            .decode()
    }

    pub async fn admin_create_category(&self, payload: &CategoryPayload) -> Result<Category> {
        let request = ApiRequest::post(ADMIN_CATEGORIES).with_json(payload)?;
        self.request(request).await?.decode()
    }

    pub async fn admin_get_category(&self, id: &str) -> Result<Category> {
        self.request(ApiRequest::get(item_path(ADMIN_CATEGORIES, id)))
            .await?
            .decode()
    }

    pub async fn admin_update_category(
        &self,
        id: &str,
        payload: &CategoryPayload,
    ) -> Result<Category> {
        let request = ApiRequest::put(item_path(ADMIN_CATEGORIES, id)).with_json(payload)?;
        self.request(request).await?.decode()
    }

    pub async fn admin_delete_category(&self, id: &str) -> Result<()> {
        self.request(ApiRequest::delete(item_path(ADMIN_CATEGORIES, id)))
            .await?;
        Ok(())
    }
}
