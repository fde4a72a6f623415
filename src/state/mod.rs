use crate::api::{ApiClient, ApiError};
use crate::config::EnvConfig;
use crate::modal::Rejected;
use crate::models::User;
use crate::navigator::{CollectionTree, ContentTree, FormTree};
use crate::notify::{Toasts, TOAST_TTL_MS};
use crate::session::Session;
use crate::storage::LocalStore;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub session: RwSignal<Session>,
    pub toasts: RwSignal<Toasts>,

    /// Trees are screen-scoped: each screen resets the one it uses on mount.
    pub content: RwSignal<ContentTree>,
    pub collections: RwSignal<CollectionTree>,
    pub forms: RwSignal<FormTree>,
}

impl AppState {
    pub fn new() -> Self {
        let config = EnvConfig::new();
        let session = Session::rehydrate(&LocalStore);
        let api_client =
            ApiClient::from_config(&config).with_token(session.token().map(str::to_string));

        Self {
            api_client: RwSignal::new(api_client),
            session: RwSignal::new(session),
            toasts: RwSignal::new(Toasts::default()),
            content: RwSignal::new(ContentTree::default()),
            collections: RwSignal::new(CollectionTree::default()),
            forms: RwSignal::new(FormTree::default()),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.with(|s| s.user().cloned())
    }

    /// Adopt a freshly logged-in session and its token.
    pub fn sign_in(&self, session: Session) {
        let token = session.token().map(str::to_string);
        self.api_client.update(|c| c.set_token(token));
        self.session.set(session);
    }

    pub fn sign_out(&self) {
        self.session.update(|s| s.logout(&LocalStore));
        self.api_client.update(|c| c.set_token(None));
        self.content.set(ContentTree::default());
        self.collections.set(CollectionTree::default());
        self.forms.set(FormTree::default());
        let _ = window().location().set_href("/");
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        let id = self.toasts.try_update(|t| t.success(message)).flatten();
        self.schedule_dismiss(id);
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        let id = self.toasts.try_update(|t| t.error(message)).flatten();
        self.schedule_dismiss(id);
    }

    pub fn report(&self, outcome: Result<String, Rejected>) {
        match outcome {
            Ok(message) => self.notify_success(message),
            Err(rejected) => self.reject(&rejected),
        }
    }

    /// Show a dialog action's failure; an expired session signs out instead.
    pub fn reject(&self, rejected: &Rejected) {
        if rejected.session_expired {
            log::warn!("session expired; signing out");
            self.sign_out();
        } else {
            self.notify_error(rejected.message.clone());
        }
    }

    /// Surface a failed call. An expired session ends it instead of showing a toast.
    pub fn fail(&self, error: &ApiError, fallback: &str) {
        if error.is_session_expired() {
            log::warn!("session expired; signing out");
            self.sign_out();
            return;
        }
        log::error!("{fallback}: {error}");
        self.notify_error(error.user_message(fallback));
    }

    fn schedule_dismiss(&self, id: Option<u64>) {
        let Some(id) = id else {
            return;
        };
        let toasts = self.toasts;
        let _ = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            wasm_bindgen::closure::Closure::once_into_js(move || {
                toasts.try_update(|t| t.dismiss(id));
            })
            .as_ref()
            .unchecked_ref(),
            TOAST_TTL_MS,
        );
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
