use super::item_path;
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Role, RoleUpdate, UserProfile};
use crate::types::ApiRequest;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const ADMIN_USERS: &str = "/api/v1/users/admin/";

impl ApiClient {
    /// One page of accounts, newest first as ordered by the server.
    pub async fn admin_list_users(&self, page: u32, page_size: u32) -> Result<Vec<UserProfile>> {
        let request = ApiRequest::get(ADMIN_USERS)
            .with_query("page", page)
            .with_query("page_size", page_size);
        self.request(request).await?.decode()
    }

    pub async fn admin_get_user(&self, id: &str) -> Result<UserProfile> {
        self.request(ApiRequest::get(item_path(ADMIN_USERS, id)))
            .await?
            .decode()
    }

    pub async fn admin_update_user_role(&self, id: &str, role: Role) -> Result<UserProfile> {
        let request = ApiRequest::put(item_path(ADMIN_USERS, id)).with_json(&RoleUpdate { role })?;
        self.request(request).await?.decode()
    }

    pub async fn admin_delete_user(&self, id: &str) -> Result<()> {
        self.request(ApiRequest::delete(item_path(ADMIN_USERS, id)))
            .await?;
        Ok(())
    }
}
