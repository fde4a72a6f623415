//! Submit paths for the CRUD dialogs. Each call validates first and never issues a request for
//! an invalid draft; results are returned for the caller to patch into its local list.

use super::drafts::*;
use crate::api::dto::ImageUpload;
use crate::api::{ApiError, ApiResult, CollectionApi, FormApi, PageApi, UploadApi};
use crate::models::{
    Collection, CollectionItem, Field, Form, FormField, HasId, Id, Page, Section,
};
use crate::navigator::Level;
use serde_json::Value;
use thiserror::Error;

/// Why a dialog action did not go through: a validation message or a failed call.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub(crate) struct Rejected {
    pub message: String,
    /// The call failed because the session is no longer valid.
    pub session_expired: bool,
}

impl Rejected {
    fn from_api(e: ApiError, fallback: &str) -> Self {
        log::error!("{fallback}: {e}");
        Self {
            message: e.user_message(fallback),
            session_expired: e.is_session_expired(),
        }
    }
}

impl From<String> for Rejected {
    fn from(message: String) -> Self {
        Self {
            message,
            session_expired: false,
        }
    }
}

impl PartialEq<&str> for Rejected {
    fn eq(&self, other: &&str) -> bool {
        self.message == *other
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Saved<T> {
    Created(T),
    Updated(T),
}

impl<T: HasId + Clone> Saved<T> {
    /// Append a created entity, or replace the edited one by id.
    pub fn apply_to(self, level: &mut Level<T>) {
        match self {
            Saved::Created(item) => level.push(item),
            Saved::Updated(item) => {
                if !level.replace(item.clone()) {
                    level.push(item);
                }
            }
        }
    }

    pub fn message(&self, noun: &str) -> String {
        match self {
            Saved::Created(_) => format!("{noun} created successfully"),
            Saved::Updated(_) => format!("{noun} updated successfully"),
        }
    }

    pub fn entity(&self) -> &T {
        match self {
            Saved::Created(item) | Saved::Updated(item) => item,
        }
    }
}

fn save_failed(noun: &str) -> impl Fn(ApiError) -> Rejected + '_ {
    move |e| Rejected::from_api(e, &format!("Failed to save {}", noun.to_lowercase()))
}

/// Map a delete result to the success text or the rejection.
pub(crate) fn deleted(result: ApiResult<()>, noun: &str) -> Result<String, Rejected> {
    result
        .map(|_| format!("{noun} deleted successfully"))
        .map_err(|e| Rejected::from_api(e, &format!("Failed to delete {}", noun.to_lowercase())))
}

pub(crate) async fn save_page(
    api: &impl PageApi,
    existing: Option<&Page>,
    draft: &PageDraft,
) -> Result<Saved<Page>, Rejected> {
    let req = draft.to_request()?;
    match existing {
        Some(page) => {
            api.update_page(&page.id, &req).await.map_err(save_failed("Page"))?;
            Ok(Saved::Updated(Page {
                name: req.name,
                ..page.clone()
            }))
        }
        None => api
            .create_page(&req)
            .await
            .map(Saved::Created)
            .map_err(save_failed("Page")),
    }
}

pub(crate) async fn save_section(
    api: &impl PageApi,
    existing: Option<&Section>,
    page_id: Option<&Id>,
    draft: &SectionDraft,
) -> Result<Saved<Section>, Rejected> {
    let req = draft.to_request(page_id)?;
    match existing {
        Some(section) => {
            api.update_section(&section.id, &req)
                .await
                .map_err(save_failed("Section"))?;
            Ok(Saved::Updated(Section {
                name: req.name,
                page_id: req.page_id,
                ..section.clone()
            }))
        }
        None => api
            .create_section(&req)
            .await
            .map(Saved::Created)
            .map_err(save_failed("Section")),
    }
}

/// Fields of a section, or schema fields of a collection when `owner` is a collection id.
pub(crate) async fn save_field(
    api: &impl PageApi,
    existing: Option<&Field>,
    owner: Option<&Id>,
    draft: &FieldDraft,
) -> Result<Saved<Field>, Rejected> {
    let req = draft.to_request(owner)?;
    match existing {
        Some(field) => {
            api.update_field(&field.id, &req)
                .await
                .map_err(save_failed("Field"))?;
            Ok(Saved::Updated(Field {
                name: req.name,
                field_type: req.field_type,
                content: req.content,
                section_id: req.section_id,
                ..field.clone()
            }))
        }
        None => api
            .create_field(&req)
            .await
            .map(Saved::Created)
            .map_err(save_failed("Field")),
    }
}

pub(crate) async fn save_field_content(
    api: &impl PageApi,
    field_id: &Id,
    content: &str,
) -> Result<(), Rejected> {
    api.update_field_content(field_id, content)
        .await
        .map_err(|e| Rejected::from_api(e, "Failed to update field content"))
}

/// The server's copy of an entity about to be edited, or `local` when it cannot be fetched.
pub(crate) fn freshest<T>(fetched: ApiResult<T>, local: T) -> T {
    match fetched {
        Ok(fresh) => fresh,
        Err(e) => {
            log::warn!("editing the local copy; refresh failed: {e}");
            local
        }
    }
}

/// Flip a boolean field on the server. Returns the content to apply locally once it lands.
pub(crate) async fn toggle_boolean(
    api: &impl PageApi,
    field: &Field,
) -> Result<&'static str, Rejected> {
    let next = super::toggled(field);
    save_field_content(api, &field.id, next).await?;
    Ok(next)
}

pub(crate) async fn save_collection(
    api: &impl CollectionApi,
    existing: Option<&Collection>,
    draft: &CollectionDraft,
) -> Result<Saved<Collection>, Rejected> {
    let req = draft.to_request()?;
    match existing {
        Some(c) => {
            api.update_collection(&c.id, &req)
                .await
                .map_err(save_failed("Collection"))?;
            Ok(Saved::Updated(Collection {
                name: req.name,
                description: req.description,
                ..c.clone()
            }))
        }
        None => api
            .create_collection(&req)
            .await
            .map(Saved::Created)
            .map_err(save_failed("Collection")),
    }
}

pub(crate) async fn save_item(
    api: &impl CollectionApi,
    existing: Option<&CollectionItem>,
    collection_id: Option<&Id>,
    schema: &[Field],
    draft: &ItemDraft,
) -> Result<Saved<CollectionItem>, Rejected> {
    let req = draft.to_request(collection_id, schema)?;
    match existing {
        Some(item) => {
            api.update_item(&item.id, &req)
                .await
                .map_err(save_failed("Item"))?;
            let mut data = item.data.clone();
            data.extend(req.data.into_iter().map(|(k, v)| (k, Value::String(v))));
            Ok(Saved::Updated(CollectionItem {
                collection_id: req.collection_id,
                data,
                ..item.clone()
            }))
        }
        None => api
            .create_item(&req)
            .await
            .map(Saved::Created)
            .map_err(save_failed("Item")),
    }
}

pub(crate) async fn save_form(
    api: &impl FormApi,
    existing: Option<&Form>,
    draft: &FormDraft,
) -> Result<Saved<Form>, Rejected> {
    let req = draft.to_request()?;
    match existing {
        Some(form) => {
            api.update_form(&form.id, &req)
                .await
                .map_err(save_failed("Form"))?;
            Ok(Saved::Updated(Form {
                name: req.name,
                description: req.description,
                ..form.clone()
            }))
        }
        None => api
            .create_form(&req)
            .await
            .map(Saved::Created)
            .map_err(save_failed("Form")),
    }
}

pub(crate) async fn save_form_field(
    api: &impl FormApi,
    form_id: Option<&Id>,
    existing: Option<&FormField>,
    draft: &FormFieldDraft,
) -> Result<Saved<FormField>, Rejected> {
    let req = draft.to_request()?;
    let form_id = form_id.ok_or_else(|| Rejected::from("Form ID is missing".to_string()))?;
    match existing {
        Some(field) => {
            api.update_form_field(form_id, &field.id, &req)
                .await
                .map_err(save_failed("Field"))?;
            Ok(Saved::Updated(FormField {
                name: req.name,
                label: req.label,
                field_type: req.field_type,
                required: req.required,
                options: req.options.unwrap_or_default(),
                ..field.clone()
            }))
        }
        None => api
            .create_form_field(form_id, &req)
            .await
            .map(Saved::Created)
            .map_err(save_failed("Field")),
    }
}

pub(crate) async fn submit_form(
    api: &impl FormApi,
    form_id: &Id,
    fields: &[FormField],
    draft: &SubmissionDraft,
) -> Result<(), Rejected> {
    let req = draft.to_request(fields)?;
    api.submit_response(form_id, &req)
        .await
        .map_err(|e| Rejected::from_api(e, "Failed to submit form"))
}

pub(crate) async fn upload_image(
    api: &impl UploadApi,
    upload: ImageUpload,
) -> Result<String, Rejected> {
    api.upload_image(upload)
        .await
        .map_err(|e| Rejected::from_api(e, "Failed to upload image"))
}
