use crate::components::ui::Toaster;
use crate::models::Role;
use crate::pages::{
    AdminDashboard, CollectionItemsPage, CollectionsPage, DynamicDashboard, FormsPage, LoginPage,
    RegisterPage, RequireRole, UserOverview, UsersManager,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Session is rehydrated above, before any guarded route renders.
    view! {
        <Router>
            <Routes fallback=|| view! { <Redirect path="/" /> }>
                <Route path=path!("") view=LoginPage />
                <Route path=path!("register") view=RegisterPage />

                <Route path=path!("admin/dashboard") view=move || view! {
                    <RequireRole role=Role::Admin>
                        <AdminDashboard />
                    </RequireRole>
                } />
                <Route path=path!("admin/dynamic") view=move || view! {
                    <RequireRole role=Role::Admin>
                        <DynamicDashboard />
                    </RequireRole>
                } />
                <Route path=path!("admin/collections") view=move || view! {
                    <RequireRole role=Role::Admin>
                        <CollectionsPage />
                    </RequireRole>
                } />
                <Route path=path!("admin/collection-items") view=move || view! {
                    <RequireRole role=Role::Admin>
                        <CollectionItemsPage />
                    </RequireRole>
                } />
                <Route path=path!("admin/forms") view=move || view! {
                    <RequireRole role=Role::Admin>
                        <FormsPage />
                    </RequireRole>
                } />
                <Route path=path!("admin/users") view=move || view! {
                    <RequireRole role=Role::Admin>
                        <UsersManager />
                    </RequireRole>
                } />

                <Route path=path!("user/overview") view=move || view! {
                    <RequireRole role=Role::User>
                        <UserOverview />
                    </RequireRole>
                } />
                <Route path=path!("user/dynamic") view=move || view! {
                    <RequireRole role=Role::User>
                        <DynamicDashboard />
                    </RequireRole>
                } />
                <Route path=path!("user/collections") view=move || view! {
                    <RequireRole role=Role::User>
                        <CollectionsPage />
                    </RequireRole>
                } />
                <Route path=path!("user/collection-items") view=move || view! {
                    <RequireRole role=Role::User>
                        <CollectionItemsPage />
                    </RequireRole>
                } />
                <Route path=path!("user/forms") view=move || view! {
                    <RequireRole role=Role::User>
                        <FormsPage />
                    </RequireRole>
                } />
            </Routes>
        </Router>
        <Toaster />
    }
}
