//! Response-shape normalization.
//!
//! The backend wraps some payloads in `{ "data": .. }`, spells ids as `_id`, and returns them as
//! strings, numbers or embedded objects. All of that is absorbed here so the rest of the crate
//! only sees canonical models.

use super::error::{ApiError, ApiResult};
use crate::models::Id;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Strip a `{ "data": .. }` envelope. Entities that carry their own `data` map keep it.
pub(crate) fn unwrap_data(v: Value) -> Value {
    match v {
        Value::Object(mut map) if map.contains_key("data") && !has_id_key(&map) => {
            match map.remove("data") {
                Some(inner @ (Value::Object(_) | Value::Array(_))) => inner,
                Some(other) => {
                    map.insert("data".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            }
        }
        other => other,
    }
}

fn has_id_key(map: &Map<String, Value>) -> bool {
    map.contains_key("id") || map.contains_key("_id")
}

/// Rewrite `_id` into `id` and flatten the id value to its string form.
pub(crate) fn normalize_entity(v: Value) -> Value {
    let Value::Object(mut map) = v else {
        return v;
    };

    let raw = match map.remove("id") {
        Some(v) if !v.is_null() => Some(v),
        _ => map.remove("_id"),
    };
    map.remove("_id");

    if let Some(id) = raw.as_ref().and_then(Id::from_value) {
        map.insert("id".to_string(), Value::String(id.as_str().to_string()));
    }
    Value::Object(map)
}

pub(crate) fn entity<T: DeserializeOwned>(v: Value) -> ApiResult<T> {
    let v = normalize_entity(unwrap_data(v));
    serde_json::from_value(v).map_err(ApiError::decode)
}

/// Decode a list, skipping entries that do not match the model.
pub(crate) fn list<T: DeserializeOwned>(v: Value) -> Vec<T> {
    let items = match unwrap_data(v) {
        Value::Array(items) => items,
        Value::Null => return vec![],
        Value::Object(map) => {
            // `{ "pages": [..] }` style envelopes.
            let mut arrays = map.into_iter().filter_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            });
            match (arrays.next(), arrays.next()) {
                (Some(items), None) => items,
                _ => {
                    log::warn!("expected a list response, got an object");
                    return vec![];
                }
            }
        }
        other => {
            log::warn!("expected a list response, got {other}");
            return vec![];
        }
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<T>(normalize_entity(item)) {
            Ok(parsed) => out.push(parsed),
            Err(e) => log::warn!("skipping malformed list entry: {e}"),
        }
    }
    out
}

/// Decode an allow-list body: a bare array, or an array under one of `keys`.
pub(crate) fn id_list(v: &Value, keys: &[&str]) -> Vec<Id> {
    let items = match v {
        Value::Array(items) => Some(items),
        Value::Object(map) => keys.iter().find_map(|k| match map.get(*k) {
            Some(Value::Array(items)) => Some(items),
            Some(nested @ Value::Object(_)) => id_list_inner(nested, keys),
            _ => None,
        }),
        _ => None,
    };

    items
        .map(|items| items.iter().filter_map(Id::from_value).collect())
        .unwrap_or_default()
}

fn id_list_inner<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    let map = v.as_object()?;
    keys.iter().find_map(|k| map.get(*k).and_then(Value::as_array))
}

/// Best human-readable message carried by an error body.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    let text = match body {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(map) => map
            .get("message")
            .and_then(message_text)
            .or_else(|| map.get("error").and_then(message_text))
            .or_else(|| map.get("errors").and_then(joined_errors)),
        _ => None,
    };
    text.filter(|t| !t.is_empty())
}

fn message_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(map) => map.get("message").and_then(message_text),
        _ => None,
    }
}

fn joined_errors(v: &Value) -> Option<String> {
    let parts: Vec<String> = match v {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => map
                    .get("msg")
                    .or_else(|| map.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
        Value::Object(map) => map.values().filter_map(message_text).collect(),
        _ => vec![],
    };
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// URL of a freshly uploaded image.
pub(crate) fn upload_url(v: &Value) -> Option<String> {
    let lookup = |root: &Value| -> Option<String> {
        root.get("image")
            .and_then(|img| img.get("url"))
            .or_else(|| root.get("url"))
            .or_else(|| root.get("imageUrl"))
            .or_else(|| root.get("path"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    lookup(v).or_else(|| v.get("data").and_then(lookup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiErrorKind;
    use crate::models::{CollectionItem, Page};
    use serde_json::json;

    #[test]
    fn test_entity_unwraps_data_and_underscore_id() {
        let page: Page = entity(json!({"data": {"_id": "p1", "name": "Home"}})).unwrap();
        assert_eq!(page.id, Id::from("p1"));
        assert_eq!(page.name, "Home");

        let page: Page = entity(json!({"id": 7, "name": "Seven"})).unwrap();
        assert_eq!(page.id, Id::from("7"));
    }

    #[test]
    fn test_entity_keeps_item_data_map() {
        let item: CollectionItem =
            entity(json!({"_id": "i1", "collectionId": "c1", "data": {"f1": "x"}})).unwrap();
        assert_eq!(item.data.get("f1"), Some(&json!("x")));
    }

    #[test]
    fn test_entity_without_id_is_decode_error() {
        let err = entity::<Page>(json!({"name": "no id"})).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Decode);
    }

    #[test]
    fn test_list_accepts_bare_wrapped_and_named_envelopes() {
        let bare: Vec<Page> = list(json!([{"id": "a", "name": "A"}]));
        let wrapped: Vec<Page> = list(json!({"data": [{"_id": "a", "name": "A"}]}));
        let named: Vec<Page> = list(json!({"pages": [{"id": {"$oid": "a"}, "name": "A"}]}));
        assert_eq!(bare, wrapped);
        assert_eq!(bare, named);
        assert!(list::<Page>(Value::Null).is_empty());
    }

    #[test]
    fn test_list_skips_malformed_entries() {
        let pages: Vec<Page> = list(json!([{"id": "a", "name": "A"}, {"name": "missing id"}, 3]));
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_id_list_shapes() {
        let keys = ["data", "allowedPages", "pageIds"];
        assert_eq!(
            id_list(&json!(["a", 2, {"_id": "c"}]), &keys),
            vec![Id::from("a"), Id::from("2"), Id::from("c")]
        );
        assert_eq!(id_list(&json!({"allowedPages": ["x"]}), &keys), vec![Id::from("x")]);
        assert_eq!(id_list(&json!({"data": {"pageIds": ["y"]}}), &keys), vec![Id::from("y")]);
        assert!(id_list(&json!({"unrelated": ["z"]}), &keys).is_empty());
        assert!(id_list(&json!("nope"), &keys).is_empty());
    }

    #[test]
    fn test_error_message_sources() {
        assert_eq!(error_message(&json!({"message": "m"})).as_deref(), Some("m"));
        assert_eq!(error_message(&json!({"error": "e"})).as_deref(), Some("e"));
        assert_eq!(
            error_message(&json!({"errors": [{"msg": "a"}, "b"]})).as_deref(),
            Some("a, b")
        );
        assert_eq!(error_message(&json!("plain text")).as_deref(), Some("plain text"));
        assert_eq!(error_message(&json!({"message": ""})), None);
        assert_eq!(error_message(&Value::Null), None);
    }

    #[test]
    fn test_upload_url_lookup_order() {
        assert_eq!(
            upload_url(&json!({"image": {"url": "/a.png"}, "url": "/b.png"})).as_deref(),
            Some("/a.png")
        );
        assert_eq!(upload_url(&json!({"imageUrl": "/c.png"})).as_deref(), Some("/c.png"));
        assert_eq!(upload_url(&json!({"data": {"path": "/d.png"}})).as_deref(), Some("/d.png"));
        assert_eq!(upload_url(&json!({"ok": true})), None);
    }
}
