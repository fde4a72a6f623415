mod auth;
mod collections;
pub(crate) mod decode;
pub(crate) mod dto;
mod error;
mod forms;
mod pages;
mod upload;

#[cfg(test)]
pub(crate) mod fake;

pub(crate) use auth::AuthApi;
pub(crate) use collections::CollectionApi;
pub(crate) use error::{ApiError, ApiErrorKind, ApiResult};
pub(crate) use forms::FormApi;
pub(crate) use pages::PageApi;
pub(crate) use upload::{read_file, UploadApi};

use crate::config::EnvConfig;
use crate::models::Id;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Everything the dashboard needs from the backend.
pub(crate) trait ContentApi: AuthApi + PageApi + CollectionApi + FormApi + UploadApi {}

impl<T: AuthApi + PageApi + CollectionApi + FormApi + UploadApi> ContentApi for T {}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        auth: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(auth) = auth {
            req = req.header("Authorization", auth);
        }
        req
    }

    /// Issue a JSON request and return the decoded body (`Null` when empty).
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        log::debug!(
            "{method} {path} (token: {})",
            self.token
                .as_deref()
                .map(crate::logging::redact_token)
                .unwrap_or_else(|| "none".to_string())
        );

        let client = reqwest::Client::new();
        let mut req = client.request(method.clone(), self.url(path));
        req = Self::with_auth_headers(req, self.get_auth_header());
        if let Some(b) = body {
            req = req.json(&b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        Self::read_response(res, &method, path).await
    }

    async fn read_response(res: reqwest::Response, method: &Method, path: &str) -> ApiResult<Value> {
        let status = res.status().as_u16();
        let text = res.text().await.map_err(ApiError::network)?;
        let body = parse_body(&text);

        if (200..300).contains(&status) {
            Ok(body)
        } else {
            let err = ApiError::from_response(status, path, &body);
            match err.kind {
                ApiErrorKind::NotFound | ApiErrorKind::Forbidden => {
                    log::warn!("{method} {path}: {err}")
                }
                _ => log::error!("{method} {path}: {err}"),
            }
            Err(err)
        }
    }

    async fn get_value(&self, path: &str) -> ApiResult<Value> {
        self.send(Method::GET, path, None).await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        Ok(decode::list(self.get_value(path).await?))
    }

    async fn get_entity<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        decode::entity(self.get_value(path).await?)
    }

    async fn post_entity<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        decode::entity(self.send(Method::POST, path, Some(to_body(body)?)).await?)
    }

    async fn write(&self, method: Method, path: &str, body: &impl Serialize) -> ApiResult<()> {
        self.send(method, path, Some(to_body(body)?)).await.map(|_| ())
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }
}

fn to_body(body: &impl Serialize) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(ApiError::decode)
}

/// Non-JSON bodies (plain-text errors) are kept as a string value.
pub(crate) fn parse_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Percent-encoded path segment for an id.
pub(crate) fn seg(id: &Id) -> String {
    urlencoding::encode(id.as_str()).into_owned()
}
