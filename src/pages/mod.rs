mod topic;

pub use topic::{AddSubtopicPage, TopicDetailPage};

use crate::components::sortable::Sortable;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, ControlledInput, Input, Label, LoadingState,
    NoticeBanner, Spinner,
};
use crate::editor::{ContentEditorPage, EditorMode};
use crate::models::{Role, Topic};
use crate::navigator::{parse_topic_route, topic_href, TopicRoute};
use crate::reorder::{MoveRequest, ReorderController, ReorderScope};
use crate::state::{flash, sync_order, AppContext, Notice, SyncedList};
use crate::topics::{delete_topic, AfterDelete, DeleteTarget, TopicDraft};
use crate::util::confirm;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;
use std::time::Duration;

#[component]
pub fn Header() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let on_logout = move |_: web_sys::MouseEvent| {
        app.logout();
        navigate.with_value(|n| n("/", NavigateOptions::default()));
    };

    view! {
        <header class="sticky top-0 z-20 border-b bg-background/80 backdrop-blur">
            <div class="mx-auto flex h-14 w-full max-w-6xl items-center gap-4 px-4">
                <a href="/" class="inline-flex items-center gap-2 font-semibold">
                    <span class="inline-flex size-8 items-center justify-center rounded-lg bg-primary text-primary-foreground">
                        "B"
                    </span>
                    "Brainloom"
                </a>
                <nav class="hidden items-center gap-1 text-sm md:flex">
                    <a href="/" class="rounded-md px-3 py-1.5 text-muted-foreground hover:bg-accent hover:text-foreground">"Home"</a>
                    <a href="/explore" class="rounded-md px-3 py-1.5 text-muted-foreground hover:bg-accent hover:text-foreground">"Explore"</a>
                </nav>

                <div class="ml-auto flex items-center gap-2">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:title="Toggle theme"
                        on:click=move |_| app.toggle_theme()
                    >
                        {move || app.theme.get().toggle_label()}
                    </Button>

                    {move || match app.auth.get() {
                        Some(session) => view! {
                            <a href="/profile" class="max-w-40 truncate text-sm text-muted-foreground hover:text-foreground">
                                {session.user.display_name().to_string()}
                            </a>
                            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_logout>
                                "Logout"
                            </Button>
                        }
                        .into_any(),
                        None => view! {
                            <a
                                href="/login"
                                class="inline-flex h-8 items-center rounded-md bg-primary px-3 text-sm font-medium text-primary-foreground hover:bg-primary/90"
                            >
                                "Login"
                            </a>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </header>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    let year = js_sys::Date::new_0().get_full_year();

    view! {
        <footer class="border-t py-6 text-center text-xs text-muted-foreground">
            {format!("© {year} Brainloom. Weave knowledge into skill.")}
        </footer>
    }
}

/// Renders `children` for admins only; everyone else is sent to `/login`.
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let navigate = use_navigate();

    Effect::new(move |_| {
        if !app.is_admin() {
            navigate(
                "/login",
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=move || app.is_admin() fallback=|| ().into_view()>
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div class="px-4 py-16 text-center text-sm text-muted-foreground">
            <p>"Page not found."</p>
            <a class="text-primary underline underline-offset-4" href="/">"Back home"</a>
        </div>
    }
}

/// Everything under `/topic/`: detail, content editor and add-subtopic views.
#[component]
pub fn TopicPage() -> impl IntoView {
    let location = use_location();
    let route = Memo::new(move |_| {
        let raw = location.pathname.get();
        let decoded = urlencoding::decode(&raw)
            .map(|p| p.into_owned())
            .unwrap_or(raw);
        parse_topic_route(&decoded)
    });

    move || match route.get() {
        Some(TopicRoute::Detail(path)) => view! { <TopicDetailPage path=path /> }.into_any(),
        Some(TopicRoute::AddContent(path)) => view! {
            <RequireAdmin>
                <ContentEditorPage mode=EditorMode::Add path=path.clone() />
            </RequireAdmin>
        }
        .into_any(),
        Some(TopicRoute::UpdateContent(path)) => view! {
            <RequireAdmin>
                <ContentEditorPage mode=EditorMode::Update path=path.clone() />
            </RequireAdmin>
        }
        .into_any(),
        Some(TopicRoute::AddSubtopic(path)) => view! {
            <RequireAdmin>
                <AddSubtopicPage path=path.clone() />
            </RequireAdmin>
        }
        .into_any(),
        None => view! { <NotFound /> }.into_any(),
    }
}

/// Title/slug/description form shared by root-topic and subtopic creation.
#[component]
pub fn TopicForm(
    draft: RwSignal<TopicDraft>,
    busy: RwSignal<bool>,
    #[prop(into)] submit_label: String,
    #[prop(optional)] show_order: bool,
    on_submit: Callback<()>,
) -> impl IntoView {
    let title = Signal::derive(move || draft.with(|d| d.title.clone()));
    let slug = Signal::derive(move || draft.with(|d| d.slug.clone()));
    let description = Signal::derive(move || draft.with(|d| d.description.clone()));
    let order = Signal::derive(move || {
        draft.with(|d| d.order_no.map(|o| o.to_string()).unwrap_or_default())
    });

    view! {
        <form
            class="flex flex-col gap-3"
            on:submit=move |ev: web_sys::SubmitEvent| {
                ev.prevent_default();
                on_submit.run(());
            }
        >
            <div class="flex flex-col gap-1.5">
                <Label html_for="topic-title" class="text-xs">"Title"</Label>
                <ControlledInput
                    id="topic-title"
                    placeholder="e.g. Advanced Python Concepts"
                    value=title
                    on_change=Callback::new(move |v: String| draft.update(|d| d.set_title(v)))
                />
            </div>
            <div class="flex flex-col gap-1.5">
                <Label html_for="topic-slug" class="text-xs">"Slug"</Label>
                <ControlledInput
                    id="topic-slug"
                    placeholder="advanced-python-concepts"
                    value=slug
                    on_change=Callback::new(move |v: String| draft.update(|d| d.set_slug(v)))
                />
            </div>
            <div class="flex flex-col gap-1.5">
                <Label html_for="topic-description" class="text-xs">"Description"</Label>
                <ControlledInput
                    id="topic-description"
                    placeholder="What will learners get out of this topic?"
                    value=description
                    on_change=Callback::new(move |v: String| draft.update(|d| d.description = v))
                />
            </div>
            <Show when=move || show_order fallback=|| ().into_view()>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="topic-order" class="text-xs">"Order (optional)"</Label>
                    <ControlledInput
                        id="topic-order"
                        r#type="number"
                        placeholder="Appended at the end when empty"
                        value=order
                        on_change=Callback::new(move |v: String| {
                            draft.update(|d| d.order_no = v.trim().parse().ok())
                        })
                    />
                </div>
            </Show>

            <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || busy.get()>
                <span class="inline-flex items-center gap-2">
                    <Show when=move || busy.get() fallback=|| ().into_view()>
                        <Spinner />
                    </Show>
                    {submit_label}
                </span>
            </Button>
        </form>
    }
}

#[component]
fn TopicCard(topic: Topic, #[prop(optional)] children: Option<Children>) -> impl IntoView {
    let href = topic_href(topic.path());
    let description = topic.description_or_default().to_string();

    view! {
        <Card class="h-full gap-3 py-4 transition-shadow hover:shadow-md">
            <CardHeader class="px-4">
                <CardTitle class="text-base">
                    <a href=href class="hover:underline">{topic.title.clone()}</a>
                </CardTitle>
                <CardDescription class="line-clamp-2 text-xs">{description}</CardDescription>
            </CardHeader>
            {children.map(|c| view! { <CardContent class="flex items-center gap-2 px-4">{c()}</CardContent> })}
        </Card>
    }
}

const FEATURES: [(&str, &str, &str); 3] = [
    ("✨", "Interactive Learning", "Hands-on tutorials and real-world projects."),
    ("🎯", "Structured Paths", "Carefully designed learning roadmaps."),
    ("🚀", "Learn at Your Pace", "Pick any topic and dive as deep as you like."),
];

#[component]
pub fn HomePage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;

    let topics: SyncedList<Topic> = RwSignal::new(ReorderController::new(
        ReorderScope::Children { parent_id: None },
        vec![],
    ));
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<Notice>> = RwSignal::new(None);

    let draft = RwSignal::new(TopicDraft::default());
    let creating = RwSignal::new(false);

    let load = move || {
        loading.set(true);
        let client = app.client();
        spawn_local(async move {
            match client.root_topics().await {
                Ok(list) => {
                    topics.update(|c| c.reset(list));
                    error.set(None);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    };

    Effect::new(move |_| load());

    let on_create = Callback::new(move |_: ()| {
        if creating.get_untracked() {
            return;
        }
        let count = topics.with_untracked(|c| c.next_order_no());
        let req = match draft.with_untracked(|d| d.into_request(None, count, false)) {
            Ok(r) => r,
            Err(e) => {
                flash(notice, Notice::Error(format!("⚠️ {e}")));
                return;
            }
        };

        creating.set(true);
        let client = app.client();
        spawn_local(async move {
            match client.create_topic(&req).await {
                Ok(created) => {
                    log!("root topic `{}` created", req.slug);
                    draft.set(TopicDraft::default());
                    flash(notice, Notice::Success("✅ Topic created successfully!".to_string()));
                    match created {
                        Some(t) => topics.update(|c| c.insert(t)),
                        None => load(),
                    }
                }
                Err(e) => {
                    app.handle_unauthorized(&e);
                    flash(notice, Notice::Error(format!("❌ {e}")));
                }
            }
            creating.set(false);
        });
    });

    let on_delete = move |topic: Topic| {
        if !confirm(&format!(
            "Delete topic \"{}\" and all its subtopics?",
            topic.title
        )) {
            return;
        }
        let client = app.client();
        spawn_local(async move {
            match delete_topic(&client, DeleteTarget::Listed(topic.id)).await {
                Ok(AfterDelete::RemoveListed(id)) => {
                    topics.update(|c| {
                        c.remove(id);
                    });
                    flash(notice, Notice::Success("✅ Deleted successfully!".to_string()));
                }
                Ok(AfterDelete::NavigateHome) => {}
                Err(e) => {
                    app.handle_unauthorized(&e);
                    flash(notice, Notice::Error(format!("❌ {e}")));
                }
            }
        });
    };

    let sortable = Sortable::new(
        "root-topics",
        Signal::derive(move || app.is_admin()),
        Callback::new(move |mv: MoveRequest| sync_order(&app, topics, mv, notice)),
    );

    view! {
        <div class="mx-auto flex w-full max-w-6xl flex-col gap-12 px-4 py-10">
            <section class="flex flex-col items-center gap-4 text-center">
                <span class="rounded-full border px-3 py-1 text-xs text-muted-foreground">"🧠 Brainloom"</span>
                <h1 class="text-4xl font-bold tracking-tight md:text-5xl">"Weave Knowledge into Skill"</h1>
                <p class="max-w-2xl text-muted-foreground">
                    "Structured learning paths, from first steps to deep dives. Pick a topic and start exploring."
                </p>
                <a
                    href="/explore"
                    class="inline-flex h-10 items-center rounded-md bg-primary px-6 text-sm font-medium text-primary-foreground hover:bg-primary/90"
                >
                    "Start exploring"
                </a>
            </section>

            <section class="grid gap-4 md:grid-cols-3">
                {FEATURES
                    .iter()
                    .map(|(icon, title, desc)| view! {
                        <Card class="gap-2 py-5">
                            <CardHeader class="px-5">
                                <div class="text-2xl">{*icon}</div>
                                <CardTitle class="text-base">{*title}</CardTitle>
                                <CardDescription class="text-xs">{*desc}</CardDescription>
                            </CardHeader>
                        </Card>
                    })
                    .collect_view()}
            </section>

            <section class="flex flex-col gap-4">
                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-semibold">"Topics"</h2>
                    <Show when=move || topics.with(|c| c.is_saving()) fallback=|| ().into_view()>
                        <span class="inline-flex items-center gap-2 text-xs text-muted-foreground">
                            <Spinner />
                            "Saving order..."
                        </span>
                    </Show>
                </div>

                <NoticeBanner notice=notice />

                <Show when=move || app.is_admin() fallback=|| ().into_view()>
                    <Card class="py-4">
                        <CardHeader class="px-4">
                            <CardTitle class="text-base">"Create a topic"</CardTitle>
                            <CardDescription class="text-xs">
                                "The slug follows the title until you edit it."
                            </CardDescription>
                        </CardHeader>
                        <CardContent class="px-4">
                            <TopicForm
                                draft=draft
                                busy=creating
                                submit_label="Create topic"
                                show_order=true
                                on_submit=on_create
                            />
                        </CardContent>
                    </Card>
                </Show>

                {move || {
                    if loading.get() {
                        return view! { <LoadingState label="Loading topics..." /> }.into_any();
                    }
                    if let Some(e) = error.get() {
                        return view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive">{format!("⚠️ {e}")}</AlertDescription>
                            </Alert>
                        }
                        .into_any();
                    }

                    let admin = app.is_admin();
                    let items = topics.with(|c| c.items().to_vec());
                    if items.is_empty() {
                        return view! {
                            <p class="py-8 text-center text-sm text-muted-foreground">"No topics yet."</p>
                        }
                        .into_any();
                    }

                    view! {
                        <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                            {items
                                .into_iter()
                                .enumerate()
                                .map(|(i, t)| {
                                    let to_delete = t.clone();
                                    view! {
                                        <div
                                            class=move || sortable.row_class(i)
                                            draggable=if admin { "true" } else { "false" }
                                            on:dragstart=sortable.on_dragstart(i)
                                            on:dragover=sortable.on_dragover(i)
                                            on:drop=sortable.on_drop(i)
                                            on:dragend=sortable.on_dragend()
                                        >
                                            {if admin {
                                                view! {
                                                    <TopicCard topic=t>
                                                        <span class="cursor-grab text-muted-foreground" title="Drag to reorder">"⋮⋮"</span>
                                                        <Button
                                                            class="ml-auto"
                                                            variant=ButtonVariant::Ghost
                                                            size=ButtonSize::Sm
                                                            on:click=move |_| on_delete(to_delete.clone())
                                                        >
                                                            "🗑️ Delete"
                                                        </Button>
                                                    </TopicCard>
                                                }
                                                .into_any()
                                            } else {
                                                view! { <TopicCard topic=t /> }.into_any()
                                            }}
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                    }
                    .into_any()
                }}
            </section>
        </div>
    }
}

#[component]
pub fn ExplorePage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let topics: RwSignal<Vec<Topic>> = RwSignal::new(vec![]);
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    Effect::new(move |_| {
        let client = app.client();
        spawn_local(async move {
            match client.root_topics().await {
                Ok(mut list) => {
                    list.sort_by_key(|t| t.order_no);
                    topics.set(list);
                }
                Err(e) => error.set(Some(e.message)),
            }
            loading.set(false);
        });
    });

    view! {
        <div class="mx-auto flex w-full max-w-6xl flex-col gap-6 px-4 py-10">
            <div>
                <h1 class="text-3xl font-bold tracking-tight">"Explore"</h1>
                <p class="text-sm text-muted-foreground">"Browse every learning path."</p>
            </div>
            {move || {
                if loading.get() {
                    view! { <LoadingState label="Loading topics..." /> }.into_any()
                } else if let Some(e) = error.get() {
                    view! {
                        <Alert class="border-destructive/30">
                            <AlertDescription class="text-destructive">{format!("⚠️ {e}")}</AlertDescription>
                        </Alert>
                    }
                    .into_any()
                } else {
                    view! {
                        <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
                            {topics.get().into_iter().map(|t| view! { <TopicCard topic=t /> }).collect_view()}
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let notice: RwSignal<Option<Notice>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let client = app.client();

        loading.set(true);
        notice.set(None);

        spawn_local(async move {
            match client.login(&email_val, &password_val, Role::Admin).await {
                Ok(session) => {
                    app.establish(session);
                    notice.set(Some(Notice::Success("✅ Login successful!".to_string())));
                    set_timeout(
                        move || {
                            let _ = navigate.try_with_value(|n| n("/", NavigateOptions::default()));
                        },
                        Duration::from_millis(800),
                    );
                }
                Err(e) => notice.set(Some(Notice::Error(format!("❌ {e}")))),
            }
            loading.set(false);
        });
    };

    view! {
        <div class="mx-auto flex w-full max-w-sm flex-col justify-center px-4 py-16">
            <Card>
                <CardHeader>
                    <span class="rounded-full border px-2 py-0.5 text-[10px] uppercase tracking-wide text-muted-foreground">
                        "Admin Access"
                    </span>
                    <CardTitle class="text-lg">"Welcome Back"</CardTitle>
                    <CardDescription class="text-xs">"Sign in to manage your learning platform."</CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <div class="flex flex-col gap-1.5">
                            <Label html_for="email" class="text-xs">"Email Address"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="admin@example.com"
                                bind_value=email
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        <div class="flex flex-col gap-1.5">
                            <Label html_for="password" class="text-xs">"Password"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                placeholder="••••••••"
                                bind_value=password
                                required=true
                                class="h-8 text-sm"
                            />
                        </div>

                        <NoticeBanner notice=notice />

                        <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || loading.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                            </span>
                        </Button>
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let on_logout = move |_: web_sys::MouseEvent| {
        app.logout();
        navigate.with_value(|n| n("/", NavigateOptions::default()));
    };

    view! {
        <div class="mx-auto w-full max-w-xl px-4 py-10">
            <h1 class="mb-4 text-2xl font-bold">"Profile"</h1>
            {move || match app.auth.get() {
                None => view! {
                    <p class="text-sm text-muted-foreground">
                        "You are not signed in. "
                        <a href="/login" class="text-primary underline underline-offset-4">"Login"</a>
                        " to manage content."
                    </p>
                }
                .into_any(),
                Some(session) => {
                    let email = session.user.email().unwrap_or("-").to_string();
                    let role = if session.is_admin() { "admin" } else { "visitor" };
                    view! {
                        <Card class="py-5">
                            <CardContent class="flex flex-col gap-3 px-5">
                                <div>
                                    <p class="text-xs text-muted-foreground">"Display name"</p>
                                    <p class="font-semibold">{session.user.display_name().to_string()}</p>
                                </div>
                                <div>
                                    <p class="text-xs text-muted-foreground">"Email"</p>
                                    <p class="text-sm">{email}</p>
                                </div>
                                <div>
                                    <p class="text-xs text-muted-foreground">"Role"</p>
                                    <p class="text-sm">{role}</p>
                                </div>
                                <div class="pt-2">
                                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_logout>
                                        "Sign out"
                                    </Button>
                                </div>
                            </CardContent>
                        </Card>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
