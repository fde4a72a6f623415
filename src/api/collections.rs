use super::dto::{CollectionItemRequest, CollectionRequest};
use super::{seg, ApiClient, ApiResult};
use crate::models::{Collection, CollectionItem, Id};
use async_trait::async_trait;
use reqwest::Method;

#[async_trait(?Send)]
pub(crate) trait CollectionApi {
    async fn list_collections(&self) -> ApiResult<Vec<Collection>>;
    async fn get_collection(&self, id: &Id) -> ApiResult<Collection>;
    async fn create_collection(&self, req: &CollectionRequest) -> ApiResult<Collection>;
    async fn update_collection(&self, id: &Id, req: &CollectionRequest) -> ApiResult<()>;
    async fn delete_collection(&self, id: &Id) -> ApiResult<()>;

    async fn list_items(&self, collection_id: &Id) -> ApiResult<Vec<CollectionItem>>;
    async fn get_item(&self, id: &Id) -> ApiResult<CollectionItem>;
    async fn create_item(&self, req: &CollectionItemRequest) -> ApiResult<CollectionItem>;
    async fn update_item(&self, id: &Id, req: &CollectionItemRequest) -> ApiResult<()>;
    async fn delete_item(&self, id: &Id) -> ApiResult<()>;
}

#[async_trait(?Send)]
impl CollectionApi for ApiClient {
    async fn list_collections(&self) -> ApiResult<Vec<Collection>> {
        self.get_list("/collections").await
    }

    async fn get_collection(&self, id: &Id) -> ApiResult<Collection> {
        self.get_entity(&format!("/collections/{}", seg(id))).await
    }

    async fn create_collection(&self, req: &CollectionRequest) -> ApiResult<Collection> {
        self.post_entity("/collections", req).await
    }

    async fn update_collection(&self, id: &Id, req: &CollectionRequest) -> ApiResult<()> {
        self.write(Method::PUT, &format!("/collections/{}", seg(id)), req)
            .await
    }

    async fn delete_collection(&self, id: &Id) -> ApiResult<()> {
        self.delete(&format!("/collections/{}", seg(id))).await
    }

    async fn list_items(&self, collection_id: &Id) -> ApiResult<Vec<CollectionItem>> {
        self.get_list(&format!("/collection-items/{}", seg(collection_id)))
            .await
    }

    async fn get_item(&self, id: &Id) -> ApiResult<CollectionItem> {
        self.get_entity(&format!("/collection-items/item/{}", seg(id)))
            .await
    }

    async fn create_item(&self, req: &CollectionItemRequest) -> ApiResult<CollectionItem> {
        self.post_entity("/collection-items", req).await
    }

    async fn update_item(&self, id: &Id, req: &CollectionItemRequest) -> ApiResult<()> {
        self.write(Method::PUT, &format!("/collection-items/{}", seg(id)), req)
            .await
    }

    async fn delete_item(&self, id: &Id) -> ApiResult<()> {
        self.delete(&format!("/collection-items/{}", seg(id))).await
    }
}
