use crate::pages::{
    ExplorePage, Footer, Header, HomePage, LoginPage, NotFound, ProfilePage, TopicPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app = AppState::new();
    app.theme.get_untracked().apply_to_document();
    provide_context(AppContext(app));

    // Topic paths have arbitrary depth, so everything under /topic goes
    // through one wildcard route and `TopicPage` picks the view.
    view! {
        <Router>
            <div class="flex min-h-screen flex-col bg-background text-foreground">
                <Header />
                <main class="flex-1">
                    <Routes fallback=NotFound>
                        <Route path=path!("") view=HomePage />
                        <Route path=path!("explore") view=ExplorePage />
                        <Route path=path!("login") view=LoginPage />
                        <Route path=path!("profile") view=ProfilePage />
                        <Route path=path!("topic/*path") view=TopicPage />
                    </Routes>
                </main>
                <Footer />
            </div>
        </Router>
    }
}
