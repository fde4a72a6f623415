use super::dto::{FormFieldRequest, FormRequest, SubmissionRequest};
use super::{seg, ApiClient, ApiResult};
use crate::models::{Form, FormField, FormResponse, Id};
use async_trait::async_trait;
use reqwest::Method;

#[async_trait(?Send)]
pub(crate) trait FormApi {
    async fn list_forms(&self) -> ApiResult<Vec<Form>>;
    async fn get_form(&self, id: &Id) -> ApiResult<Form>;
    async fn create_form(&self, req: &FormRequest) -> ApiResult<Form>;
    async fn update_form(&self, id: &Id, req: &FormRequest) -> ApiResult<()>;
    async fn delete_form(&self, id: &Id) -> ApiResult<()>;

    async fn list_form_fields(&self, form_id: &Id) -> ApiResult<Vec<FormField>>;
    async fn create_form_field(&self, form_id: &Id, req: &FormFieldRequest)
        -> ApiResult<FormField>;
    async fn update_form_field(
        &self,
        form_id: &Id,
        field_id: &Id,
        req: &FormFieldRequest,
    ) -> ApiResult<()>;
    async fn delete_form_field(&self, form_id: &Id, field_id: &Id) -> ApiResult<()>;

    async fn list_responses(&self, form_id: &Id) -> ApiResult<Vec<FormResponse>>;
    async fn submit_response(&self, form_id: &Id, req: &SubmissionRequest) -> ApiResult<()>;
}

fn form_path(id: &Id) -> String {
    format!("/forms/{}", seg(id))
}

fn submit_path(id: &Id) -> String {
    format!("{}/submit", form_path(id))
}

impl ApiClient {
    /// Public endpoint that accepts submissions for a form.
    pub fn form_submit_url(&self, form_id: &Id) -> String {
        self.url(&submit_path(form_id))
    }
}

#[async_trait(?Send)]
impl FormApi for ApiClient {
    async fn list_forms(&self) -> ApiResult<Vec<Form>> {
        self.get_list("/forms").await
    }

    async fn get_form(&self, id: &Id) -> ApiResult<Form> {
        self.get_entity(&form_path(id)).await
    }

    async fn create_form(&self, req: &FormRequest) -> ApiResult<Form> {
        self.post_entity("/forms", req).await
    }

    async fn update_form(&self, id: &Id, req: &FormRequest) -> ApiResult<()> {
        self.write(Method::PUT, &form_path(id), req).await
    }

    async fn delete_form(&self, id: &Id) -> ApiResult<()> {
        self.delete(&form_path(id)).await
    }

    async fn list_form_fields(&self, form_id: &Id) -> ApiResult<Vec<FormField>> {
        self.get_list(&format!("{}/fields", form_path(form_id))).await
    }

    async fn create_form_field(
        &self,
        form_id: &Id,
        req: &FormFieldRequest,
    ) -> ApiResult<FormField> {
        self.post_entity(&format!("{}/fields", form_path(form_id)), req)
            .await
    }

    async fn update_form_field(
        &self,
        form_id: &Id,
        field_id: &Id,
        req: &FormFieldRequest,
    ) -> ApiResult<()> {
        let path = format!("{}/fields/{}", form_path(form_id), seg(field_id));
        self.write(Method::PUT, &path, req).await
    }

    async fn delete_form_field(&self, form_id: &Id, field_id: &Id) -> ApiResult<()> {
        self.delete(&format!("{}/fields/{}", form_path(form_id), seg(field_id)))
            .await
    }

    async fn list_responses(&self, form_id: &Id) -> ApiResult<Vec<FormResponse>> {
        self.get_list(&format!("{}/responses", form_path(form_id)))
            .await
    }

    async fn submit_response(&self, form_id: &Id, req: &SubmissionRequest) -> ApiResult<()> {
        self.write(Method::POST, &submit_path(form_id), req)
            .await
    }
}
