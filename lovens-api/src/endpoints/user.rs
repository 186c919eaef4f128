//! User endpoints.

use lovens_core::error::LvResult;
use lovens_models::User;

use crate::client::LovensClient;

impl LovensClient {
    /// Profile of the authenticated user.
    pub async fn get_user(&self) -> LvResult<User> {
        let value = self.get("/user/me", &[]).await?;
        User::from_server_map(&value)
    }
}
