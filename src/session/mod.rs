use crate::api::decode::normalize_entity;
use crate::api::dto::{LoginRequest, RegisterRequest};
use crate::api::AuthApi;
use crate::models::{Id, Role, User};
use crate::storage::{load_json, save_json, KeyValueStore, TOKEN_KEY, USER_KEY};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub(crate) enum AuthError {
    /// The server refused, or the request failed; carries the text to show.
    #[error("{0}")]
    Rejected(String),
    #[error("Invalid response from server - missing token")]
    MissingToken,
}

/// Bearer token plus the profile of whoever it belongs to.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// Restore a persisted session. Runs before any protected route renders.
    pub fn rehydrate(store: &dyn KeyValueStore) -> Self {
        let token = store.get(TOKEN_KEY).filter(|t| !t.trim().is_empty());
        let mut user: Option<User> = load_json(store, USER_KEY);

        if let (Some(token), Some(user)) = (token.as_deref(), user.as_mut()) {
            if user.id.is_none() {
                if let Some(id) = jwt_user_id(token) {
                    log::info!("restored user id from token payload");
                    user.id = Some(id);
                    save_json(store, USER_KEY, user);
                }
            }
        }

        Self { token, user }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&Id> {
        self.user.as_ref().and_then(|u| u.id.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    pub fn is_user(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::User)
    }

    pub async fn login(
        &mut self,
        api: &impl AuthApi,
        store: &dyn KeyValueStore,
        req: &LoginRequest,
    ) -> Result<(User, String), AuthError> {
        let body = api
            .login(req)
            .await
            .map_err(|e| AuthError::Rejected(e.user_message("Login failed")))?;
        let (token, user) = parse_login(&body, req.login_name())?;

        store.set(TOKEN_KEY, &token);
        save_json(store, USER_KEY, &user);
        log::info!("logged in as {} ({})", user.display_name(), user.role);

        self.token = Some(token.clone());
        self.user = Some(user.clone());
        Ok((user, token))
    }

    /// Create an account. Does not log in.
    pub async fn register(api: &impl AuthApi, req: &RegisterRequest) -> Result<(), AuthError> {
        api.register(req)
            .await
            .map_err(|e| AuthError::Rejected(e.user_message("Registration failed")))
    }

    /// Local teardown only; the server is not contacted.
    pub fn logout(&mut self, store: &dyn KeyValueStore) {
        store.remove(TOKEN_KEY);
        store.remove(USER_KEY);
        self.token = None;
        self.user = None;
    }
}

fn str_at<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn id_at(v: &Value) -> Option<Id> {
    ["userId", "id", "_id"]
        .iter()
        .find_map(|k| v.get(*k).and_then(Id::from_value))
}

/// Interpret a login response. Accepts `{token, user}`, `{data: {token, user}}`, and flat
/// bodies where the profile has to be assembled from `role`/`email`.
pub(crate) fn parse_login(body: &Value, login_name: &str) -> Result<(String, User), AuthError> {
    let data = body.get("data").unwrap_or(&Value::Null);
    let token = str_at(body, "token")
        .or_else(|| str_at(data, "token"))
        .ok_or(AuthError::MissingToken)?
        .to_string();

    let profile = body
        .get("user")
        .or_else(|| data.get("user"))
        .filter(|u| u.is_object())
        .and_then(|u| serde_json::from_value::<User>(normalize_entity(u.clone())).ok());

    let mut user = profile.unwrap_or_else(|| {
        let email = str_at(body, "email")
            .or_else(|| str_at(data, "email"))
            .map(str::to_string)
            .or_else(|| login_name.contains('@').then(|| login_name.to_string()))
            .unwrap_or_default();
        let role = str_at(body, "role").or_else(|| str_at(data, "role"));
        User {
            id: None,
            username: login_name.to_string(),
            email,
            role: match role {
                Some(r) if r.eq_ignore_ascii_case("admin") => Role::Admin,
                _ => Role::User,
            },
        }
    });

    if user.id.is_none() {
        user.id = id_at(body).or_else(|| id_at(data));
    }
    if user.id.is_none() {
        user.id = jwt_user_id(&token);
    }
    if user.id.is_none() {
        log::warn!("login succeeded but no user id could be determined");
    }

    Ok((token, user))
}

/// Last-resort id lookup from an unverified JWT payload (`id`, `userId` or `_id` claim).
pub(crate) fn jwt_user_id(token: &str) -> Option<Id> {
    let mut parts = token.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    ["id", "userId", "_id"]
        .iter()
        .find_map(|k| claims.get(*k).and_then(Id::from_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn jwt(claims: Value) -> String {
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("eyJhbGciOiJIUzI1NiJ9.{payload}.signature")
    }

    #[test]
    fn test_parse_login_with_user_object() {
        let body = json!({"token": "t1", "user": {"_id": "u1", "username": "ann", "role": "admin"}});
        let (token, user) = parse_login(&body, "ann").expect("login should parse");
        assert_eq!(token, "t1");
        assert_eq!(user.id, Some(Id::from("u1")));
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_parse_login_wrapped_in_data() {
        let body = json!({"data": {"token": "t2", "user": {"id": 9, "username": "bo"}}});
        let (token, user) = parse_login(&body, "bo").expect("login should parse");
        assert_eq!(token, "t2");
        assert_eq!(user.id, Some(Id::from("9")));
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_parse_login_synthesizes_profile() {
        let body = json!({"token": "t3", "role": "admin", "email": "c@x.io", "userId": "u3"});
        let (_, user) = parse_login(&body, "cy").expect("login should parse");
        assert_eq!(user.username, "cy");
        assert_eq!(user.email, "c@x.io");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.id, Some(Id::from("u3")));

        let (_, user) = parse_login(&json!({"token": "t4"}), "dee").expect("login should parse");
        assert_eq!(user.role, Role::User);
        assert!(user.id.is_none());
    }

    #[test]
    fn test_parse_login_missing_token() {
        let err = parse_login(&json!({"user": {"id": "u1"}}), "x").unwrap_err();
        assert_eq!(err, AuthError::MissingToken);
        assert_eq!(err.to_string(), "Invalid response from server - missing token");
    }

    #[test]
    fn test_parse_login_falls_back_to_jwt_claim() {
        let token = jwt(json!({"userId": "from-jwt", "iat": 1}));
        let body = json!({"token": token, "user": {"username": "eve", "role": "user"}});
        let (_, user) = parse_login(&body, "eve").expect("login should parse");
        assert_eq!(user.id, Some(Id::from("from-jwt")));
    }

    #[test]
    fn test_jwt_user_id_rejects_non_jwt() {
        assert!(jwt_user_id("opaque-token").is_none());
        assert!(jwt_user_id("a.b.c.d").is_none());
        assert!(jwt_user_id("a.!!!.c").is_none());
        assert_eq!(jwt_user_id(&jwt(json!({"id": 5}))), Some(Id::from("5")));
    }

    #[test]
    fn test_rehydrate_requires_token_and_user() {
        let store = MemoryStore::default();
        assert!(!Session::rehydrate(&store).is_authenticated());

        store.set(TOKEN_KEY, "t");
        assert!(!Session::rehydrate(&store).is_authenticated());

        save_json(&store, USER_KEY, &json!({"id": "u1", "username": "a", "role": "user"}));
        let session = Session::rehydrate(&store);
        assert!(session.is_authenticated());
        assert!(session.is_user());
        assert!(!session.is_admin());
    }

    #[test]
    fn test_rehydrate_backfills_id_from_token() {
        let store = MemoryStore::default();
        store.set(TOKEN_KEY, &jwt(json!({"_id": "u7"})));
        save_json(&store, USER_KEY, &json!({"username": "a", "role": "admin"}));

        let session = Session::rehydrate(&store);
        assert_eq!(session.user_id(), Some(&Id::from("u7")));
        let persisted: User = load_json(&store, USER_KEY).expect("user persisted");
        assert_eq!(persisted.id, Some(Id::from("u7")));
    }

    #[tokio::test]
    async fn test_login_persists_and_logout_clears() {
        let api = FakeApi::new();
        *api.login_body.borrow_mut() = json!({"token": "tok", "user": {"id": "u1", "username": "a", "role": "admin"}});
        let store = MemoryStore::default();
        let mut session = Session::default();

        let (user, token) = session
            .login(&api, &store, &LoginRequest::new("a", "pw"))
            .await
            .expect("login should succeed");
        assert_eq!(token, "tok");
        assert_eq!(user.role, Role::Admin);
        assert!(session.is_admin());
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok"));

        let restored = Session::rehydrate(&store);
        assert_eq!(restored, session);

        session.logout(&store);
        assert!(!session.is_authenticated());
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());
    }

    #[tokio::test]
    async fn test_login_failure_messages() {
        let api = FakeApi::new();
        let store = MemoryStore::default();
        let mut session = Session::default();

        api.fail_with("login", 401, json!({"message": "Invalid credentials"}));
        let err = session
            .login(&api, &store, &LoginRequest::new("a", "bad"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        api.fail_with("login", 500, json!({"message": "db down"}));
        let err = session
            .login(&api, &store, &LoginRequest::new("a", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
        assert!(store.get(TOKEN_KEY).is_none());

        api.clear_failure("login");
        *api.login_body.borrow_mut() = json!({"ok": true});
        let err = session
            .login(&api, &store, &LoginRequest::new("a", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::MissingToken);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let api = FakeApi::new();
        let req = RegisterRequest {
            username: "new".to_string(),
            email: "new@example.com".to_string(),
            password: "pw".to_string(),
            role: None,
        };
        Session::register(&api, &req).await.expect("register ok");
        assert_eq!(api.users.borrow().len(), 1);

        api.fail_with("register", 400, json!({"error": "Email already used"}));
        let err = Session::register(&api, &req).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already used");

        api.fail_with("register", 400, json!({}));
        let err = Session::register(&api, &req).await.unwrap_err();
        assert_eq!(err.to_string(), "Registration failed");
    }
}
