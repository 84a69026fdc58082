use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{AuthGrant, Credentials, UserProfile};
use crate::types::ApiRequest;

const REGISTER_PATH: &str = "/api/v1/auth/register";
const LOGIN_PATH: &str = "/api/v1/auth/login";
const ME_PATH: &str = "/api/v1/users/me";

impl ApiClient {
    /// Create an account and sign in as it.
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthGrant> {
        self.authenticate(REGISTER_PATH, credentials).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        self.authenticate(LOGIN_PATH, credentials).await
    }

    /// Silent re-authentication through the refresh cookie. See
    /// [`ApiClient::refresh_session`].
    pub async fn refresh(&self) -> bool {
        self.refresh_session().await
    }

    pub async fn get_me(&self) -> Result<UserProfile> {
        self.request(ApiRequest::get(ME_PATH)).await?.decode()
    }

    /// Local sign-out: the server keeps no session to revoke.
    pub fn logout(&self) {
        self.session().clear_auth();
    }

    async fn authenticate(&self, path: &str, credentials: &Credentials) -> Result<AuthGrant> {
        let request = ApiRequest::post(path).anonymous().with_json(credentials)?;
        let grant: AuthGrant = self.request(request).await?.decode()?;
        tracing::info!("Signed in as {} ({})", grant.user.email, grant.user.role);
        self.session().set_auth(grant.clone());
        Ok(grant)
    }
}
