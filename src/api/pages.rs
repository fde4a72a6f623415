use super::dto::{FieldContentRequest, FieldRequest, PageRequest, SectionRequest};
use super::{seg, ApiClient, ApiResult};
use crate::models::{Field, Id, Page, Section};
use async_trait::async_trait;
use reqwest::Method;

/// Page → Section → Field hierarchy. Collection schemas reuse the field endpoints.
#[async_trait(?Send)]
pub(crate) trait PageApi {
    async fn list_pages(&self) -> ApiResult<Vec<Page>>;
    async fn create_page(&self, req: &PageRequest) -> ApiResult<Page>;
    async fn update_page(&self, id: &Id, req: &PageRequest) -> ApiResult<()>;
    async fn delete_page(&self, id: &Id) -> ApiResult<()>;

    async fn list_sections(&self, page_id: &Id) -> ApiResult<Vec<Section>>;
    async fn create_section(&self, req: &SectionRequest) -> ApiResult<Section>;
    async fn update_section(&self, id: &Id, req: &SectionRequest) -> ApiResult<()>;
    async fn delete_section(&self, id: &Id) -> ApiResult<()>;

    async fn list_fields(&self, section_id: &Id) -> ApiResult<Vec<Field>>;
    async fn create_field(&self, req: &FieldRequest) -> ApiResult<Field>;
    async fn update_field(&self, id: &Id, req: &FieldRequest) -> ApiResult<()>;
    async fn update_field_content(&self, id: &Id, content: &str) -> ApiResult<()>;
    async fn delete_field(&self, id: &Id) -> ApiResult<()>;
}

#[async_trait(?Send)]
impl PageApi for ApiClient {
    async fn list_pages(&self) -> ApiResult<Vec<Page>> {
        self.get_list("/pages").await
    }

    async fn create_page(&self, req: &PageRequest) -> ApiResult<Page> {
        self.post_entity("/pages", req).await
    }

    async fn update_page(&self, id: &Id, req: &PageRequest) -> ApiResult<()> {
        self.write(Method::PUT, &format!("/pages/{}", seg(id)), req)
            .await
    }

    async fn delete_page(&self, id: &Id) -> ApiResult<()> {
        self.delete(&format!("/pages/{}", seg(id))).await
    }

    async fn list_sections(&self, page_id: &Id) -> ApiResult<Vec<Section>> {
        self.get_list(&format!("/sections/{}", seg(page_id))).await
    }

    async fn create_section(&self, req: &SectionRequest) -> ApiResult<Section> {
        self.post_entity("/sections", req).await
    }

    async fn update_section(&self, id: &Id, req: &SectionRequest) -> ApiResult<()> {
        self.write(Method::PUT, &format!("/sections/{}", seg(id)), req)
            .await
    }

    async fn delete_section(&self, id: &Id) -> ApiResult<()> {
        self.delete(&format!("/sections/{}", seg(id))).await
    }

    async fn list_fields(&self, section_id: &Id) -> ApiResult<Vec<Field>> {
        self.get_list(&format!("/fields/{}", seg(section_id))).await
    }

    async fn create_field(&self, req: &FieldRequest) -> ApiResult<Field> {
        self.post_entity("/fields", req).await
    }

    async fn update_field(&self, id: &Id, req: &FieldRequest) -> ApiResult<()> {
        self.write(Method::PUT, &format!("/fields/{}", seg(id)), req)
            .await
    }

    async fn update_field_content(&self, id: &Id, content: &str) -> ApiResult<()> {
        let body = FieldContentRequest {
            content: content.to_string(),
        };
        self.write(Method::PATCH, &format!("/fields/{}/content", seg(id)), &body)
            .await
    }

    async fn delete_field(&self, id: &Id) -> ApiResult<()> {
        self.delete(&format!("/fields/{}", seg(id))).await
    }
}
