//! In-memory backend for native tests.

use super::dto::*;
use super::{
    decode, ApiError, ApiErrorKind, ApiResult, AuthApi, CollectionApi, FormApi, PageApi,
    UploadApi,
};
use crate::models::*;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct FakeApi {
    pub login_body: RefCell<Value>,
    pub users: RefCell<Vec<User>>,
    pub allow_lists: RefCell<HashMap<(Id, ResourceFamily), Value>>,
    pub pages: RefCell<Vec<Page>>,
    pub sections: RefCell<Vec<Section>>,
    pub fields: RefCell<Vec<Field>>,
    pub collections: RefCell<Vec<Collection>>,
    pub items: RefCell<Vec<CollectionItem>>,
    pub forms: RefCell<Vec<Form>>,
    pub form_fields: RefCell<HashMap<Id, Vec<FormField>>>,
    pub responses: RefCell<HashMap<Id, Vec<FormResponse>>>,
    /// Operation name → status code and error body to fail with.
    pub failures: RefCell<HashMap<&'static str, (u16, Value)>>,
    /// Every call, as `"op arg"`.
    pub calls: RefCell<Vec<String>>,
    next_id: Cell<u64>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, op: &'static str, status: u16) {
        self.fail_with(op, status, json!({"message": format!("{op} failed")}));
    }

    pub fn fail_with(&self, op: &'static str, status: u16, body: Value) {
        self.failures.borrow_mut().insert(op, (status, body));
    }

    pub fn clear_failure(&self, op: &'static str) {
        self.failures.borrow_mut().remove(op);
    }

    pub fn set_allow_list(&self, user: &str, family: ResourceFamily, body: Value) {
        self.allow_lists
            .borrow_mut()
            .insert((Id::from(user), family), body);
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.split(' ').next() == Some(op))
            .count()
    }

    fn record(&self, op: &'static str, arg: impl std::fmt::Display) -> ApiResult<()> {
        self.calls.borrow_mut().push(format!("{op} {arg}"));
        match self.failures.borrow().get(op) {
            Some((status, body)) => Err(ApiError::from_response(*status, &format!("/{op}"), body)),
            None => Ok(()),
        }
    }

    fn fresh_id(&self, prefix: &str) -> Id {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        Id::from(format!("{prefix}{n}"))
    }

    pub fn seed_page(&self, id: &str, name: &str) {
        self.pages.borrow_mut().push(Page {
            id: Id::from(id),
            name: name.to_string(),
        });
    }

    pub fn seed_section(&self, id: &str, page_id: &str, name: &str) {
        self.sections.borrow_mut().push(Section {
            id: Id::from(id),
            name: name.to_string(),
            page_id: Id::from(page_id),
        });
    }

    pub fn seed_field(&self, id: &str, owner: &str, name: &str, field_type: FieldType, content: &str) {
        self.fields.borrow_mut().push(Field {
            id: Id::from(id),
            name: name.to_string(),
            field_type,
            content: content.to_string(),
            section_id: Id::from(owner),
            collection_id: None,
        });
    }

    pub fn seed_collection(&self, id: &str, name: &str) {
        self.collections.borrow_mut().push(Collection {
            id: Id::from(id),
            name: name.to_string(),
            description: String::new(),
        });
    }

    pub fn seed_form(&self, id: &str, name: &str) {
        self.forms.borrow_mut().push(Form {
            id: Id::from(id),
            name: name.to_string(),
            description: String::new(),
        });
    }
}

fn not_found() -> ApiError {
    ApiError::from_response(404, "/fake", &json!({"message": "Not found"}))
}

#[async_trait(?Send)]
impl AuthApi for FakeApi {
    async fn login(&self, req: &LoginRequest) -> ApiResult<Value> {
        self.record("login", req.login_name())?;
        Ok(self.login_body.borrow().clone())
    }

    async fn register(&self, req: &RegisterRequest) -> ApiResult<()> {
        self.record("register", &req.username)?;
        self.users.borrow_mut().push(User {
            id: Some(self.fresh_id("u")),
            username: req.username.clone(),
            email: req.email.clone(),
            role: req.role.unwrap_or_default(),
        });
        Ok(())
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.record("list_users", "")?;
        Ok(self.users.borrow().clone())
    }

    async fn allowed_ids(&self, user_id: &Id, family: ResourceFamily) -> ApiResult<Vec<Id>> {
        self.record("allowed_ids", format!("{user_id}/{family}"))?;
        let body = self
            .allow_lists
            .borrow()
            .get(&(user_id.clone(), family))
            .cloned()
            .unwrap_or(Value::Array(vec![]));
        Ok(decode::id_list(&body, family.envelope_keys()))
    }

    async fn set_allowed_ids(
        &self,
        user_id: &Id,
        family: ResourceFamily,
        ids: &[Id],
    ) -> ApiResult<()> {
        self.record("set_allowed_ids", format!("{user_id}/{family}"))?;
        self.allow_lists
            .borrow_mut()
            .insert((user_id.clone(), family), json!({ "data": ids }));
        Ok(())
    }
}

#[async_trait(?Send)]
impl PageApi for FakeApi {
    async fn list_pages(&self) -> ApiResult<Vec<Page>> {
        self.record("list_pages", "")?;
        Ok(self.pages.borrow().clone())
    }

    async fn create_page(&self, req: &PageRequest) -> ApiResult<Page> {
        self.record("create_page", &req.name)?;
        let page = Page {
            id: self.fresh_id("p"),
            name: req.name.clone(),
        };
        self.pages.borrow_mut().push(page.clone());
        Ok(page)
    }

    async fn update_page(&self, id: &Id, req: &PageRequest) -> ApiResult<()> {
        self.record("update_page", id)?;
        let mut pages = self.pages.borrow_mut();
        let page = pages.iter_mut().find(|p| &p.id == id).ok_or_else(not_found)?;
        page.name = req.name.clone();
        Ok(())
    }

    async fn delete_page(&self, id: &Id) -> ApiResult<()> {
        self.record("delete_page", id)?;
        self.pages.borrow_mut().retain(|p| &p.id != id);
        self.sections.borrow_mut().retain(|s| &s.page_id != id);
        Ok(())
    }

    async fn list_sections(&self, page_id: &Id) -> ApiResult<Vec<Section>> {
        self.record("list_sections", page_id)?;
        Ok(self
            .sections
            .borrow()
            .iter()
            .filter(|s| &s.page_id == page_id)
            .cloned()
            .collect())
    }

    async fn create_section(&self, req: &SectionRequest) -> ApiResult<Section> {
        self.record("create_section", &req.name)?;
        let section = Section {
            id: self.fresh_id("s"),
            name: req.name.clone(),
            page_id: req.page_id.clone(),
        };
        self.sections.borrow_mut().push(section.clone());
        Ok(section)
    }

    async fn update_section(&self, id: &Id, req: &SectionRequest) -> ApiResult<()> {
        self.record("update_section", id)?;
        let mut sections = self.sections.borrow_mut();
        let section = sections.iter_mut().find(|s| &s.id == id).ok_or_else(not_found)?;
        section.name = req.name.clone();
        Ok(())
    }

    async fn delete_section(&self, id: &Id) -> ApiResult<()> {
        self.record("delete_section", id)?;
        self.sections.borrow_mut().retain(|s| &s.id != id);
        self.fields.borrow_mut().retain(|f| &f.section_id != id);
        Ok(())
    }

    async fn list_fields(&self, section_id: &Id) -> ApiResult<Vec<Field>> {
        self.record("list_fields", section_id)?;
        // Mirrors backends that ignore the filter and return every field.
        Ok(self.fields.borrow().clone())
    }

    async fn create_field(&self, req: &FieldRequest) -> ApiResult<Field> {
        self.record("create_field", &req.name)?;
        let field = Field {
            id: self.fresh_id("f"),
            name: req.name.clone(),
            field_type: req.field_type,
            content: req.content.clone(),
            section_id: req.section_id.clone(),
            collection_id: None,
        };
        self.fields.borrow_mut().push(field.clone());
        Ok(field)
    }

    async fn update_field(&self, id: &Id, req: &FieldRequest) -> ApiResult<()> {
        self.record("update_field", id)?;
        let mut fields = self.fields.borrow_mut();
        let field = fields.iter_mut().find(|f| &f.id == id).ok_or_else(not_found)?;
        field.name = req.name.clone();
        field.field_type = req.field_type;
        field.content = req.content.clone();
        Ok(())
    }

    async fn update_field_content(&self, id: &Id, content: &str) -> ApiResult<()> {
        self.record("update_field_content", format!("{id}={content}"))?;
        let mut fields = self.fields.borrow_mut();
        let field = fields.iter_mut().find(|f| &f.id == id).ok_or_else(not_found)?;
        field.content = content.to_string();
        Ok(())
    }

    async fn delete_field(&self, id: &Id) -> ApiResult<()> {
        self.record("delete_field", id)?;
        self.fields.borrow_mut().retain(|f| &f.id != id);
        Ok(())
    }
}

#[async_trait(?Send)]
impl CollectionApi for FakeApi {
    async fn list_collections(&self) -> ApiResult<Vec<Collection>> {
        self.record("list_collections", "")?;
        Ok(self.collections.borrow().clone())
    }

    async fn get_collection(&self, id: &Id) -> ApiResult<Collection> {
        self.record("get_collection", id)?;
        self.collections
            .borrow()
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_collection(&self, req: &CollectionRequest) -> ApiResult<Collection> {
        self.record("create_collection", &req.name)?;
        let collection = Collection {
            id: self.fresh_id("c"),
            name: req.name.clone(),
            description: req.description.clone(),
        };
        self.collections.borrow_mut().push(collection.clone());
        Ok(collection)
    }

    async fn update_collection(&self, id: &Id, req: &CollectionRequest) -> ApiResult<()> {
        self.record("update_collection", id)?;
        let mut collections = self.collections.borrow_mut();
        let c = collections.iter_mut().find(|c| &c.id == id).ok_or_else(not_found)?;
        c.name = req.name.clone();
        c.description = req.description.clone();
        Ok(())
    }

    async fn delete_collection(&self, id: &Id) -> ApiResult<()> {
        self.record("delete_collection", id)?;
        self.collections.borrow_mut().retain(|c| &c.id != id);
        Ok(())
    }

    async fn list_items(&self, collection_id: &Id) -> ApiResult<Vec<CollectionItem>> {
        self.record("list_items", collection_id)?;
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|i| &i.collection_id == collection_id)
            .cloned()
            .collect())
    }

    async fn get_item(&self, id: &Id) -> ApiResult<CollectionItem> {
        self.record("get_item", id)?;
        self.items
            .borrow()
            .iter()
            .find(|i| &i.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_item(&self, req: &CollectionItemRequest) -> ApiResult<CollectionItem> {
        self.record("create_item", &req.collection_id)?;
        let item = CollectionItem {
            id: self.fresh_id("i"),
            collection_id: req.collection_id.clone(),
            data: req
                .data
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
            fields: Default::default(),
        };
        self.items.borrow_mut().push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: &Id, req: &CollectionItemRequest) -> ApiResult<()> {
        self.record("update_item", id)?;
        let mut items = self.items.borrow_mut();
        let item = items.iter_mut().find(|i| &i.id == id).ok_or_else(not_found)?;
        item.data = req
            .data
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Ok(())
    }

    async fn delete_item(&self, id: &Id) -> ApiResult<()> {
        self.record("delete_item", id)?;
        self.items.borrow_mut().retain(|i| &i.id != id);
        Ok(())
    }
}

#[async_trait(?Send)]
impl FormApi for FakeApi {
    async fn list_forms(&self) -> ApiResult<Vec<Form>> {
        self.record("list_forms", "")?;
        Ok(self.forms.borrow().clone())
    }

    async fn get_form(&self, id: &Id) -> ApiResult<Form> {
        self.record("get_form", id)?;
        self.forms
            .borrow()
            .iter()
            .find(|f| &f.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_form(&self, req: &FormRequest) -> ApiResult<Form> {
        self.record("create_form", &req.name)?;
        let form = Form {
            id: self.fresh_id("fm"),
            name: req.name.clone(),
            description: req.description.clone(),
        };
        self.forms.borrow_mut().push(form.clone());
        Ok(form)
    }

    async fn update_form(&self, id: &Id, req: &FormRequest) -> ApiResult<()> {
        self.record("update_form", id)?;
        let mut forms = self.forms.borrow_mut();
        let form = forms.iter_mut().find(|f| &f.id == id).ok_or_else(not_found)?;
        form.name = req.name.clone();
        form.description = req.description.clone();
        Ok(())
    }

    async fn delete_form(&self, id: &Id) -> ApiResult<()> {
        self.record("delete_form", id)?;
        self.forms.borrow_mut().retain(|f| &f.id != id);
        Ok(())
    }

    async fn list_form_fields(&self, form_id: &Id) -> ApiResult<Vec<FormField>> {
        self.record("list_form_fields", form_id)?;
        Ok(self
            .form_fields
            .borrow()
            .get(form_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_form_field(
        &self,
        form_id: &Id,
        req: &FormFieldRequest,
    ) -> ApiResult<FormField> {
        self.record("create_form_field", form_id)?;
        let field = FormField {
            id: self.fresh_id("ff"),
            name: req.name.clone(),
            label: req.label.clone(),
            field_type: req.field_type,
            required: req.required,
            options: req.options.clone().unwrap_or_default(),
        };
        self.form_fields
            .borrow_mut()
            .entry(form_id.clone())
            .or_default()
            .push(field.clone());
        Ok(field)
    }

    async fn update_form_field(
        &self,
        form_id: &Id,
        field_id: &Id,
        req: &FormFieldRequest,
    ) -> ApiResult<()> {
        self.record("update_form_field", field_id)?;
        let mut all = self.form_fields.borrow_mut();
        let field = all
            .get_mut(form_id)
            .and_then(|fields| fields.iter_mut().find(|f| &f.id == field_id))
            .ok_or_else(not_found)?;
        field.name = req.name.clone();
        field.label = req.label.clone();
        field.field_type = req.field_type;
        field.required = req.required;
        field.options = req.options.clone().unwrap_or_default();
        Ok(())
    }

    async fn delete_form_field(&self, form_id: &Id, field_id: &Id) -> ApiResult<()> {
        self.record("delete_form_field", field_id)?;
        if let Some(fields) = self.form_fields.borrow_mut().get_mut(form_id) {
            fields.retain(|f| &f.id != field_id);
        }
        Ok(())
    }

    async fn list_responses(&self, form_id: &Id) -> ApiResult<Vec<FormResponse>> {
        self.record("list_responses", form_id)?;
        Ok(self
            .responses
            .borrow()
            .get(form_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit_response(&self, form_id: &Id, req: &SubmissionRequest) -> ApiResult<()> {
        self.record("submit_response", form_id)?;
        let response = FormResponse {
            id: self.fresh_id("r"),
            data: req.data.clone(),
            created_at: None,
        };
        self.responses
            .borrow_mut()
            .entry(form_id.clone())
            .or_default()
            .push(response);
        Ok(())
    }
}

#[async_trait(?Send)]
impl UploadApi for FakeApi {
    async fn upload_image(&self, upload: ImageUpload) -> ApiResult<String> {
        self.record("upload_image", &upload.file_name)?;
        if upload.bytes.is_empty() {
            return Err(ApiError::new(ApiErrorKind::Validation, "empty file"));
        }
        Ok(format!("https://cdn.example.com/{}", upload.file_name))
    }
}
