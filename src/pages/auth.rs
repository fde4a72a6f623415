use super::home_path;
use crate::api::dto::{LoginRequest, RegisterRequest};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, Card, CardContent, CardDescription, CardFooter,
    CardHeader, CardTitle, ErrorAlert, Input, Label, Select, Spinner,
};
use crate::models::Role;
use crate::session::Session;
use crate::state::AppContext;
use crate::storage::LocalStore;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[component]
pub fn LoginPage() -> impl IntoView {
    let identifier: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    // Already signed in: go straight to the role's landing screen.
    Effect::new(move |_| {
        let session = app_state.0.session.get();
        if let Some(user) = session.user().filter(|_| session.is_authenticated()) {
            let home = home_path(user.role);
            navigate.with_value(|nav| nav(home, Default::default()));
        }
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let req = LoginRequest::new(&identifier.get_untracked(), &password.get_untracked());
        if req.login_name().is_empty() || req.password.is_empty() {
            error.set(Some("Please enter your credentials".to_string()));
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let mut session = Session::default();
            match session.login(&api_client, &LocalStore, &req).await {
                Ok((user, _)) => {
                    app_state.0.sign_in(session);
                    app_state.0.notify_success(format!("Welcome, {}", user.display_name()));
                    navigate.with_value(|nav| nav(home_path(user.role), Default::default()));
                }
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-md flex-col justify-center px-4 py-12">
                <div class="mb-6">
                    <div class="text-sm font-medium text-foreground">"Content Dashboard"</div>
                    <div class="text-xs text-muted-foreground">"Pages, collections and forms."</div>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-xl">"Sign in"</CardTitle>
                        <CardDescription>"Use your username or email."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-4" on:submit=on_submit>
                            <div class="flex flex-col gap-2">
                                <Label html_for="identifier">"Username or email"</Label>
                                <Input id="identifier" placeholder="you@example.com" bind_value=identifier required=true />
                            </div>

                            <div class="flex flex-col gap-2">
                                <Label html_for="password">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                />
                            </div>

                            <ErrorAlert error=error />

                            <Button class="w-full" attr:disabled=move || loading.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>

                    <CardFooter>
                        <div class="text-xs text-muted-foreground">
                            "No account? "
                            <a class="text-primary underline underline-offset-4" href="/register">"Create one"</a>
                        </div>
                    </CardFooter>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm_password: RwSignal<String> = RwSignal::new(String::new());
    let role: RwSignal<String> = RwSignal::new(Role::User.to_string());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let success: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let role_options = Signal::derive(|| {
        vec![
            (Role::User.to_string(), "User".to_string()),
            (Role::Admin.to_string(), "Admin".to_string()),
        ]
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let req = RegisterRequest {
            username: username.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            role: role.get_untracked().parse().ok(),
        };

        if req.username.is_empty() || req.email.is_empty() {
            error.set(Some("Username and email are required".to_string()));
            return;
        }
        if req.password != confirm_password.get_untracked() {
            error.set(Some("Passwords do not match".to_string()));
            return;
        }
        if req.password.len() < 6 {
            error.set(Some("Password must be at least 6 characters".to_string()));
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match Session::register(&api_client, &req).await {
                Ok(()) => success.set(true),
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Create account"</CardTitle>
                        <CardDescription class="text-xs">"You will sign in after registering."</CardDescription>
                    </CardHeader>
                    <CardContent>
                        <Show
                            when=move || !success.get()
                            fallback=move || view! {
                                <Alert>
                                    <AlertDescription class="text-xs">
                                        "Account created. You can now "
                                        <a class="text-primary underline underline-offset-4" href="/">"sign in"</a>
                                        "."
                                    </AlertDescription>
                                </Alert>
                            }
                        >
                            <form class="flex flex-col gap-3" on:submit=on_submit>
                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="username" class="text-xs">"Username"</Label>
                                    <Input id="username" bind_value=username required=true class="h-8 text-sm" />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="email" class="text-xs">"Email"</Label>
                                    <Input
                                        id="email"
                                        r#type="email"
                                        placeholder="you@example.com"
                                        bind_value=email
                                        required=true
                                        class="h-8 text-sm"
                                    />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="password" class="text-xs">"Password"</Label>
                                    <Input id="password" r#type="password" bind_value=password required=true class="h-8 text-sm" />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="confirm_password" class="text-xs">"Confirm password"</Label>
                                    <Input
                                        id="confirm_password"
                                        r#type="password"
                                        bind_value=confirm_password
                                        required=true
                                        class="h-8 text-sm"
                                    />
                                </div>

                                <div class="flex flex-col gap-1.5">
                                    <Label html_for="role" class="text-xs">"Role"</Label>
                                    <Select id="role" options=role_options bind_value=role class="h-8" />
                                </div>

                                <ErrorAlert error=error />

                                <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
                                    <span class="inline-flex items-center gap-2">
                                        <Show when=move || loading.get() fallback=|| ().into_view()>
                                            <Spinner />
                                        </Show>
                                        {move || if loading.get() { "Creating..." } else { "Create account" }}
                                    </span>
                                </Button>

                                <div class="pt-1 text-xs text-muted-foreground">
                                    "Already have an account? "
                                    <a class="text-primary underline underline-offset-4" href="/">"Sign in"</a>
                                </div>
                            </form>
                        </Show>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}
