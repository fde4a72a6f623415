use crate::api::dto::{
    CollectionItemRequest, CollectionRequest, FieldRequest, FormFieldRequest, FormRequest,
    PageRequest, SectionRequest, SubmissionRequest,
};
use crate::models::{
    Collection, CollectionItem, Field, FieldType, Form, FormField, FormFieldType, Id, Page,
    Section,
};
use serde_json::Value;
use std::collections::BTreeMap;

fn required(value: &str, message: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        Err(message.to_string())
    } else {
        Ok(value.to_string())
    }
}

/// Comma-separated option text → trimmed, non-empty options.
pub(crate) fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PageDraft {
    pub name: String,
}

impl PageDraft {
    pub fn from_page(page: &Page) -> Self {
        Self {
            name: page.name.clone(),
        }
    }

    pub fn to_request(&self) -> Result<PageRequest, String> {
        Ok(PageRequest {
            name: required(&self.name, "Page name is required")?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SectionDraft {
    pub name: String,
}

impl SectionDraft {
    pub fn from_section(section: &Section) -> Self {
        Self {
            name: section.name.clone(),
        }
    }

    pub fn to_request(&self, page_id: Option<&Id>) -> Result<SectionRequest, String> {
        let name = required(&self.name, "Section name is required")?;
        let page_id = page_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "Please select a page first".to_string())?;
        Ok(SectionRequest {
            name,
            page_id: page_id.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FieldDraft {
    pub name: String,
    pub field_type: FieldType,
    pub content: String,
}

impl FieldDraft {
    pub fn from_field(field: &Field) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type,
            content: field.content.clone(),
        }
    }

    /// `owner` is the section id, or the collection id for schema fields.
    pub fn to_request(&self, owner: Option<&Id>) -> Result<FieldRequest, String> {
        let name = required(&self.name, "Field name is required")?;
        if self.field_type == FieldType::Image && self.content.trim().is_empty() {
            return Err("Please upload an image first".to_string());
        }
        let owner = owner
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "Please select a section first".to_string())?;
        let content = match self.field_type {
            FieldType::Boolean if self.content != "true" => "false".to_string(),
            _ => self.content.clone(),
        };
        Ok(FieldRequest {
            section_id: owner.clone(),
            name,
            field_type: self.field_type,
            content,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CollectionDraft {
    pub name: String,
    pub description: String,
}

impl CollectionDraft {
    pub fn from_collection(c: &Collection) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
        }
    }

    pub fn to_request(&self) -> Result<CollectionRequest, String> {
        Ok(CollectionRequest {
            name: required(&self.name, "Collection name is required")?,
            description: self.description.trim().to_string(),
        })
    }
}

/// Item values keyed by schema field id.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ItemDraft {
    pub values: BTreeMap<Id, String>,
}

impl ItemDraft {
    pub fn from_item(item: &CollectionItem, schema: &[Field]) -> Self {
        Self {
            values: schema
                .iter()
                .map(|f| (f.id.clone(), item.value_for(f)))
                .collect(),
        }
    }

    pub fn set(&mut self, field_id: &Id, value: String) {
        self.values.insert(field_id.clone(), value);
    }

    pub fn get(&self, field_id: &Id) -> &str {
        self.values.get(field_id).map(String::as_str).unwrap_or_default()
    }

    /// Only non-empty values for fields of the current schema are sent.
    pub fn to_request(
        &self,
        collection_id: Option<&Id>,
        schema: &[Field],
    ) -> Result<CollectionItemRequest, String> {
        let data: BTreeMap<String, String> = schema
            .iter()
            .filter_map(|f| {
                let v = self.values.get(&f.id)?.trim();
                (!v.is_empty()).then(|| (f.id.to_string(), v.to_string()))
            })
            .collect();
        if data.is_empty() {
            return Err("Please fill at least one field".to_string());
        }
        let collection_id = collection_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "Collection ID is missing".to_string())?;
        Ok(CollectionItemRequest {
            collection_id: collection_id.clone(),
            data,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FormDraft {
    pub name: String,
    pub description: String,
}

impl FormDraft {
    pub fn from_form(form: &Form) -> Self {
        Self {
            name: form.name.clone(),
            description: form.description.clone(),
        }
    }

    pub fn to_request(&self) -> Result<FormRequest, String> {
        Ok(FormRequest {
            name: required(&self.name, "Form name is required")?,
            description: self.description.trim().to_string(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FormFieldDraft {
    pub name: String,
    pub label: String,
    pub field_type: FormFieldType,
    pub required: bool,
    /// Comma-separated, as typed.
    pub options: String,
}

impl FormFieldDraft {
    pub fn from_field(field: &FormField) -> Self {
        Self {
            name: field.name.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            required: field.required,
            options: field.options.join(", "),
        }
    }

    pub fn to_request(&self) -> Result<FormFieldRequest, String> {
        let name = required(&self.name, "Field name is required")?;
        let label = match self.label.trim() {
            "" => name.clone(),
            label => label.to_string(),
        };
        let options = if self.field_type.takes_options() {
            let options = parse_options(&self.options);
            if options.is_empty() {
                return Err(format!(
                    "Options are required for {} fields",
                    self.field_type
                ));
            }
            Some(options)
        } else {
            None
        };
        Ok(FormFieldRequest {
            name,
            label,
            field_type: self.field_type,
            required: self.required,
            options,
        })
    }
}

/// Answers being filled in, keyed by form field name.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SubmissionDraft {
    pub values: BTreeMap<String, String>,
}

impl SubmissionDraft {
    pub fn set(&mut self, name: &str, value: String) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn to_request(&self, fields: &[FormField]) -> Result<SubmissionRequest, String> {
        let mut data = BTreeMap::new();
        for field in fields {
            let raw = self.get(&field.name).trim();
            let value = match field.field_type {
                FormFieldType::Checkbox => {
                    let checked = raw == "true";
                    if field.required && !checked {
                        return Err(format!("{} is required", field.display_label()));
                    }
                    Value::Bool(checked)
                }
                _ if raw.is_empty() => {
                    if field.required {
                        return Err(format!("{} is required", field.display_label()));
                    }
                    continue;
                }
                FormFieldType::Number => raw
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("{} must be a number", field.display_label()))?,
                FormFieldType::Select | FormFieldType::Radio
                    if !field.options.is_empty() && !field.options.iter().any(|o| o == raw) =>
                {
                    return Err(format!("Invalid choice for {}", field.display_label()));
                }
                _ => Value::String(raw.to_string()),
            };
            data.insert(field.name.clone(), value);
        }
        Ok(SubmissionRequest { data })
    }
}
