use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Canonical entity identifier.
///
/// The backend has been observed returning ids as strings, numbers, `_id` instead of `id`,
/// and embedded objects (`{"_id": ..}`, `{"$oid": ..}`). Everything is normalized here to the
/// id's string form so membership tests only ever compare strings.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub(crate) struct Id(String);

impl Id {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalize any JSON shape the backend uses for an id.
    pub fn from_value(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self::new(s.as_str())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            serde_json::Value::Object(map) => ["_id", "id", "$oid"]
                .iter()
                .find_map(|k| map.get(*k).and_then(Self::from_value)),
            _ => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = serde_json::Value::deserialize(deserializer)?;
        if v.is_null() {
            return Ok(Self::default());
        }
        Self::from_value(&v)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported id shape: {v}")))
    }
}

/// Anything that lives in a local list and is matched by id.
pub(crate) trait HasId {
    fn id(&self) -> &Id;
}

/// Scalar field values arrive as strings, numbers or booleans; the dashboard stores strings.
fn string_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let v = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_string(&v))
}

pub(crate) fn value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    #[default]
    User,
}

impl<'de> Deserialize<'de> for Role {
    // Anything other than "admin" is a regular user.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(if raw.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn display_name(&self) -> &str {
        if !self.username.trim().is_empty() {
            &self.username
        } else {
            &self.email
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Page {
    pub id: Id,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Section {
    pub id: Id,
    pub name: String,
    #[serde(rename = "pageId", default)]
    pub page_id: Id,
}

#[derive(
    Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Email,
    Date,
    Image,
    Boolean,
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw.trim().to_ascii_lowercase().parse().unwrap_or_default())
    }
}

impl FieldType {
    /// Input `type` attribute for inline editors.
    pub fn input_type(self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Date => "date",
            _ => "text",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Textarea => "Textarea",
            FieldType::Number => "Number",
            FieldType::Email => "Email",
            FieldType::Date => "Date",
            FieldType::Image => "Image",
            FieldType::Boolean => "Boolean",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Field {
    pub id: Id,
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "string_from_any")]
    pub content: String,
    #[serde(rename = "sectionId", default)]
    pub section_id: Id,
    /// Some backends tag collection schema fields with `collectionId` instead.
    #[serde(rename = "collectionId", default, skip_serializing)]
    pub collection_id: Option<Id>,
}

impl Field {
    /// The section (or aliased collection) this field belongs to.
    pub fn owner_id(&self) -> Option<&Id> {
        if !self.section_id.is_empty() {
            Some(&self.section_id)
        } else {
            self.collection_id.as_ref().filter(|id| !id.is_empty())
        }
    }

    pub fn is_checked(&self) -> bool {
        self.content == "true"
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Collection {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct CollectionItem {
    pub id: Id,
    #[serde(rename = "collectionId", default)]
    pub collection_id: Id,
    /// Values as written by the dashboard (`data`).
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
    /// Values as returned by backends that echo `fields`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl CollectionItem {
    /// Resolve a schema field's value: by field id first, then by the legacy name key.
    pub fn value_for(&self, field: &Field) -> String {
        [field.id.as_str(), field.name.as_str()]
            .iter()
            .filter(|k| !k.is_empty())
            .find_map(|k| {
                self.data
                    .get(*k)
                    .or_else(|| self.fields.get(*k))
                    .map(value_to_string)
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Form {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(
    Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum FormFieldType {
    #[default]
    Text,
    Number,
    Email,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Date,
    File,
}

impl<'de> Deserialize<'de> for FormFieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw.trim().to_ascii_lowercase().parse().unwrap_or_default())
    }
}

impl FormFieldType {
    pub fn takes_options(self) -> bool {
        matches!(self, FormFieldType::Select | FormFieldType::Radio)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct FormField {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FormFieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

impl FormField {
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct FormResponse {
    #[serde(default)]
    pub id: Id,
    #[serde(default, alias = "fields")]
    pub data: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "createdAt", default, alias = "created_at")]
    pub created_at: Option<String>,
}

/// The three resource families that carry per-user allow-lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub(crate) enum ResourceFamily {
    #[strum(serialize = "pages")]
    Pages,
    #[strum(serialize = "collections")]
    Collections,
    #[strum(serialize = "forms")]
    Forms,
}

impl ResourceFamily {
    /// Path segment under `/auth/users/:id/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceFamily::Pages => "pages",
            ResourceFamily::Collections => "collections",
            ResourceFamily::Forms => "forms",
        }
    }

    /// Body key for the full-replace PUT.
    pub fn ids_key(self) -> &'static str {
        match self {
            ResourceFamily::Pages => "pageIds",
            ResourceFamily::Collections => "collectionIds",
            ResourceFamily::Forms => "formIds",
        }
    }

    /// Envelope keys a list of allowed ids may arrive under.
    pub fn envelope_keys(self) -> &'static [&'static str] {
        match self {
            ResourceFamily::Pages => &["data", "allowedPages", "pageIds", "pages"],
            ResourceFamily::Collections => {
                &["data", "allowedCollections", "collectionIds", "collections"]
            }
            ResourceFamily::Forms => &["data", "allowedForms", "formIds", "forms"],
        }
    }
}

macro_rules! impl_has_id {
    ($($ty:ty),* $(,)?) => {
        $(impl HasId for $ty {
            fn id(&self) -> &Id {
                &self.id
            }
        })*
    };
}

impl_has_id!(Page, Section, Field, Collection, CollectionItem, Form, FormField, FormResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_normalizes_strings_numbers_and_objects() {
        assert_eq!(Id::from_value(&json!("abc")), Some(Id::from("abc")));
        assert_eq!(Id::from_value(&json!(" abc ")), Some(Id::from("abc")));
        assert_eq!(Id::from_value(&json!(42)), Some(Id::from("42")));
        assert_eq!(Id::from_value(&json!({"_id": "x1"})), Some(Id::from("x1")));
        assert_eq!(Id::from_value(&json!({"$oid": "x2"})), Some(Id::from("x2")));
        assert_eq!(Id::from_value(&json!({"id": {"$oid": "x3"}})), Some(Id::from("x3")));
        assert_eq!(Id::from_value(&json!("")), None);
        assert_eq!(Id::from_value(&json!(true)), None);
    }

    #[test]
    fn test_role_unknown_is_user() {
        let u: User = serde_json::from_value(json!({"id": "1", "role": "editor"})).unwrap();
        assert_eq!(u.role, Role::User);
        let a: User = serde_json::from_value(json!({"id": "1", "role": "Admin"})).unwrap();
        assert_eq!(a.role, Role::Admin);
        let missing: User = serde_json::from_value(json!({"username": "u"})).unwrap();
        assert_eq!(missing.role, Role::User);
        assert!(missing.id.is_none());
    }

    #[test]
    fn test_field_content_is_always_string() {
        let f: Field = serde_json::from_value(json!({
            "id": "f1", "name": "count", "type": "number", "content": 12, "sectionId": "s1"
        }))
        .unwrap();
        assert_eq!(f.content, "12");
        assert_eq!(f.field_type, FieldType::Number);

        let b: Field = serde_json::from_value(json!({
            "id": "f2", "name": "on", "type": "boolean", "content": true, "sectionId": "s1"
        }))
        .unwrap();
        assert!(b.is_checked());

        let unknown: Field = serde_json::from_value(json!({
            "id": "f3", "name": "x", "type": "color"
        }))
        .unwrap();
        assert_eq!(unknown.field_type, FieldType::Text);
        assert_eq!(unknown.content, "");
        assert!(unknown.owner_id().is_none());
    }

    #[test]
    fn test_field_owner_falls_back_to_collection_id() {
        let f: Field = serde_json::from_value(json!({
            "id": "f1", "name": "title", "type": "text", "collectionId": "c1"
        }))
        .unwrap();
        assert_eq!(f.owner_id(), Some(&Id::from("c1")));
    }

    #[test]
    fn test_item_value_prefers_field_id_then_name() {
        let field = Field {
            id: Id::from("f1"),
            name: "title".to_string(),
            field_type: FieldType::Text,
            content: String::new(),
            section_id: Id::from("c1"),
            collection_id: None,
        };

        let legacy: CollectionItem = serde_json::from_value(json!({
            "id": "i1", "collectionId": "c1", "fields": {"title": "Old"}
        }))
        .unwrap();
        assert_eq!(legacy.value_for(&field), "Old");

        let keyed: CollectionItem = serde_json::from_value(json!({
            "id": "i2", "collectionId": "c1", "data": {"f1": "New", "title": "Stale"}
        }))
        .unwrap();
        assert_eq!(keyed.value_for(&field), "New");
    }

    #[test]
    fn test_form_field_type_options() {
        assert!(FormFieldType::Select.takes_options());
        assert!(FormFieldType::Radio.takes_options());
        assert!(!FormFieldType::Checkbox.takes_options());
        assert_eq!(FormFieldType::Radio.to_string(), "radio");
        assert_eq!("textarea".parse::<FormFieldType>().ok(), Some(FormFieldType::Textarea));
    }

    #[test]
    fn test_form_response_accepts_fields_alias() {
        let r: FormResponse = serde_json::from_value(json!({
            "id": "r1", "fields": {"email": "a@b.c"}, "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(r.id, Id::from("r1"));
        assert_eq!(r.data.get("email"), Some(&json!("a@b.c")));
        assert_eq!(r.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }
}
