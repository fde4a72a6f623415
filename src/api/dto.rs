use crate::models::{FieldType, FormFieldType, Id, Role};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    /// Treat an identifier containing `@` as an email, anything else as a username.
    pub fn new(identifier: &str, password: &str) -> Self {
        let identifier = identifier.trim().to_string();
        let (username, email) = if identifier.contains('@') {
            (None, Some(identifier))
        } else {
            (Some(identifier), None)
        };
        Self {
            username,
            email,
            password: password.to_string(),
        }
    }

    pub fn login_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct PageRequest {
    pub name: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct SectionRequest {
    pub name: String,
    #[serde(rename = "pageId")]
    pub page_id: Id,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct FieldRequest {
    /// Section id, or a collection id when defining a collection schema.
    #[serde(rename = "sectionId")]
    pub section_id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub content: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct FieldContentRequest {
    pub content: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct CollectionRequest {
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct CollectionItemRequest {
    #[serde(rename = "collectionId")]
    pub collection_id: Id,
    /// Keyed by schema field id.
    pub data: BTreeMap<String, String>,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct FormRequest {
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct FormFieldRequest {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FormFieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct SubmissionRequest {
    pub data: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug)]
pub(crate) struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub section_id: Id,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_picks_email_or_username() {
        let by_email = serde_json::to_value(LoginRequest::new(" a@b.c ", "pw")).expect("serialize");
        assert_eq!(by_email, serde_json::json!({"email": "a@b.c", "password": "pw"}));

        let by_name = LoginRequest::new("alice", "pw");
        assert_eq!(by_name.login_name(), "alice");
        let v = serde_json::to_value(by_name).expect("serialize");
        assert!(v.get("email").is_none());
        assert_eq!(v["username"], "alice");
    }

    #[test]
    fn test_register_request_omits_missing_role() {
        let req = RegisterRequest {
            username: "u".to_string(),
            email: "u@example.com".to_string(),
            password: "secret".to_string(),
            role: None,
        };
        let v = serde_json::to_value(req).expect("serialize");
        assert!(v.get("role").is_none());

        let admin = RegisterRequest {
            username: "a".to_string(),
            email: "a@example.com".to_string(),
            password: "secret".to_string(),
            role: Some(Role::Admin),
        };
        assert_eq!(serde_json::to_value(admin).expect("serialize")["role"], "admin");
    }

    #[test]
    fn test_field_request_wire_names() {
        let req = FieldRequest {
            section_id: Id::from("s1"),
            name: "hero".to_string(),
            field_type: FieldType::Image,
            content: "/uploads/a.png".to_string(),
        };
        let v = serde_json::to_value(req).expect("serialize");
        assert_eq!(
            v,
            serde_json::json!({
                "sectionId": "s1", "name": "hero", "type": "image", "content": "/uploads/a.png"
            })
        );
    }

    #[test]
    fn test_form_field_request_options_only_when_present() {
        let plain = FormFieldRequest {
            name: "email".to_string(),
            label: "Email".to_string(),
            field_type: FormFieldType::Email,
            required: true,
            options: None,
        };
        let v = serde_json::to_value(plain).expect("serialize");
        assert!(v.get("options").is_none());
        assert_eq!(v["type"], "email");
        assert_eq!(v["required"], true);
    }
}
