use super::dto::{LoginRequest, RegisterRequest};
use super::{decode, seg, ApiClient, ApiResult};
use crate::models::{Id, ResourceFamily, User};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

#[async_trait(?Send)]
pub(crate) trait AuthApi {
    /// Raw login body; its shape varies and is interpreted by the session.
    async fn login(&self, req: &LoginRequest) -> ApiResult<Value>;
    async fn register(&self, req: &RegisterRequest) -> ApiResult<()>;
    async fn list_users(&self) -> ApiResult<Vec<User>>;
    async fn allowed_ids(&self, user_id: &Id, family: ResourceFamily) -> ApiResult<Vec<Id>>;
    async fn set_allowed_ids(
        &self,
        user_id: &Id,
        family: ResourceFamily,
        ids: &[Id],
    ) -> ApiResult<()>;
}

fn allow_list_path(user_id: &Id, family: ResourceFamily) -> String {
    format!("/auth/users/{}/{}", seg(user_id), family.path_segment())
}

#[async_trait(?Send)]
impl AuthApi for ApiClient {
    async fn login(&self, req: &LoginRequest) -> ApiResult<Value> {
        self.send(Method::POST, "/auth/login", Some(super::to_body(req)?))
            .await
    }

    async fn register(&self, req: &RegisterRequest) -> ApiResult<()> {
        self.write(Method::POST, "/auth/register", req).await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get_list("/auth/users").await
    }

    async fn allowed_ids(&self, user_id: &Id, family: ResourceFamily) -> ApiResult<Vec<Id>> {
        let body = self.get_value(&allow_list_path(user_id, family)).await?;
        Ok(decode::id_list(&body, family.envelope_keys()))
    }

    async fn set_allowed_ids(
        &self,
        user_id: &Id,
        family: ResourceFamily,
        ids: &[Id],
    ) -> ApiResult<()> {
        let mut body = serde_json::Map::new();
        body.insert(family.ids_key().to_string(), serde_json::to_value(ids).unwrap_or_default());
        self.write(Method::PUT, &allow_list_path(user_id, family), &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_paths() {
        let id = Id::from("u 1");
        assert_eq!(allow_list_path(&id, ResourceFamily::Pages), "/auth/users/u%201/pages");
        assert_eq!(
            allow_list_path(&id, ResourceFamily::Collections),
            "/auth/users/u%201/collections"
        );
        assert_eq!(allow_list_path(&id, ResourceFamily::Forms), "/auth/users/u%201/forms");
    }
}
