use super::TopicForm;
use crate::blocks::BlockView;
use crate::components::sortable::Sortable;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, LoadingState, NoticeBanner, Spinner,
};
use crate::models::{ContentBlock, Topic, TopicId};
use crate::navigator::{
    add_content_href, add_subtopic_href, breadcrumbs, child_path, topic_href, update_content_href,
};
use crate::reorder::{MoveRequest, ReorderController, ReorderScope, RollbackPolicy};
use crate::state::{fetch_topic_detail, flash, sync_order, AppContext, Notice, SyncedList};
use crate::topics::{delete_topic, AfterDelete, DeleteTarget, TopicDraft};
use crate::util::confirm;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

#[component]
pub fn TopicDetailPage(path: String) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let topic: RwSignal<Option<Topic>> = RwSignal::new(None);
    let children: SyncedList<Topic> = RwSignal::new(ReorderController::new(
        ReorderScope::Children { parent_id: None },
        vec![],
    ));
    let blocks: SyncedList<ContentBlock> = RwSignal::new(ReorderController::new(
        ReorderScope::Blocks {
            topic_path: path.clone(),
        },
        vec![],
    ));
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<Notice>> = RwSignal::new(None);

    fetch_topic_detail(app, path.clone(), move |result| {
        match result {
            Ok(detail) => {
                children.set(ReorderController::new(
                    ReorderScope::Children {
                        parent_id: Some(detail.topic.id),
                    },
                    detail.children,
                ));
                // Block order is what readers see, so a failed save snaps back.
                blocks.set(
                    ReorderController::new(
                        ReorderScope::Blocks {
                            topic_path: detail.topic.path().to_string(),
                        },
                        detail.blocks,
                    )
                    .with_policy(RollbackPolicy::Revert),
                );
                topic.set(Some(detail.topic));
                error.set(None);
            }
            Err(e) => error.set(Some(e.message)),
        }
        loading.set(false);
    });

    let run_delete = move |target: DeleteTarget, title: String| {
        let prompt = match target {
            DeleteTarget::Listed(_) => format!("Delete subtopic \"{title}\"?"),
            DeleteTarget::Current(_) => format!("Delete topic \"{title}\" and all its subtopics?"),
        };
        if !confirm(&prompt) {
            return;
        }

        let client = app.client();
        spawn_local(async move {
            match delete_topic(&client, target).await {
                Ok(AfterDelete::RemoveListed(id)) => {
                    children.update(|c| {
                        c.remove(id);
                    });
                    flash(notice, Notice::Success("✅ Deleted successfully!".to_string()));
                }
                Ok(AfterDelete::NavigateHome) => {
                    let _ = navigate.try_with_value(|n| n("/", NavigateOptions::default()));
                }
                Err(e) => {
                    app.handle_unauthorized(&e);
                    flash(notice, Notice::Error(format!("❌ {e}")));
                }
            }
        });
    };

    let child_rows = Sortable::new(
        "children",
        Signal::derive(move || app.is_admin()),
        Callback::new(move |mv: MoveRequest| sync_order(&app, children, mv, notice)),
    );
    let block_rows = Sortable::new(
        "blocks",
        Signal::derive(move || app.is_admin()),
        Callback::new(move |mv: MoveRequest| sync_order(&app, blocks, mv, notice)),
    );

    let crumb_path = StoredValue::new(path);

    let on_previous = move |_: web_sys::MouseEvent| {
        if let Ok(history) = window().history() {
            let _ = history.back();
        }
    };

    let sidebar = move |current: Topic| {
        let admin = app.is_admin();
        let path = current.path().to_string();
        let items = children.with(|c| c.items().to_vec());
        let count = items.len();

        view! {
            <aside class="flex flex-col gap-4 border-b p-6 md:border-r md:border-b-0">
                <div class="border-b pb-4">
                    <h2 class="text-lg font-bold">{current.title.clone()}</h2>
                    <span class="text-xs text-muted-foreground">{format!("{count} topics")}</span>
                </div>

                <ul class="flex flex-col gap-1">
                    {items
                        .into_iter()
                        .enumerate()
                        .map(|(i, child)| {
                            let href = topic_href(child.path());
                            let (id, title) = (child.id, child.title.clone());
                            view! {
                                <li
                                    class=move || format!(
                                        "group flex items-center gap-2 rounded-md px-2 py-1.5 text-sm hover:bg-accent {}",
                                        child_rows.row_class(i),
                                    )
                                    draggable=if admin { "true" } else { "false" }
                                    on:dragstart=child_rows.on_dragstart(i)
                                    on:dragover=child_rows.on_dragover(i)
                                    on:drop=child_rows.on_drop(i)
                                    on:dragend=child_rows.on_dragend()
                                >
                                    <Show when=move || admin fallback=|| ().into_view()>
                                        <span class="cursor-grab text-muted-foreground" title="Drag to reorder">"⋮⋮"</span>
                                    </Show>
                                    <a href=href class="min-w-0 flex-1 truncate">{child.title.clone()}</a>
                                    <Show when=move || admin fallback=|| ().into_view()>
                                        <button
                                            class="opacity-0 transition-opacity group-hover:opacity-100"
                                            title="Delete subtopic"
                                            on:click={
                                                let title = title.clone();
                                                move |_| run_delete(DeleteTarget::Listed(id), title.clone())
                                            }
                                        >
                                            "🗑️"
                                        </button>
                                    </Show>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>

                <Show when=move || admin fallback=|| ().into_view()>
                    <div class="flex flex-col gap-2 border-t pt-4 text-sm">
                        <a class="rounded-md border px-3 py-1.5 hover:bg-accent" href=add_subtopic_href(&path)>
                            "+ Add Subtopic"
                        </a>
                        <a class="rounded-md border px-3 py-1.5 hover:bg-accent" href=add_content_href(&path)>
                            "📝 Add Content"
                        </a>
                        <a class="rounded-md border px-3 py-1.5 hover:bg-accent" href=update_content_href(&path)>
                            "✏️ Update Content"
                        </a>
                        <Show when=move || children.with(|c| c.is_saving()) fallback=|| ().into_view()>
                            <span class="inline-flex items-center gap-2 text-xs text-muted-foreground">
                                <Spinner />
                                "Saving order..."
                            </span>
                        </Show>
                    </div>
                </Show>
            </aside>
        }
    };

    let content = move || {
        let admin = app.is_admin();
        let items = blocks.with(|c| c.items().to_vec());
        if items.is_empty() {
            return view! {
                <div class="flex flex-col items-center gap-2 rounded-xl border border-dashed py-16 text-center">
                    <div class="text-3xl">"📚"</div>
                    <p class="font-semibold">"No content available yet"</p>
                    <p class="text-sm text-muted-foreground">
                        "This topic is being prepared. Check back soon for updates!"
                    </p>
                </div>
            }
            .into_any();
        }

        items
            .into_iter()
            .enumerate()
            .map(|(i, block)| {
                view! {
                    <div
                        class=move || format!("rounded-xl border p-5 {}", block_rows.row_class(i))
                        draggable=if admin { "true" } else { "false" }
                        on:dragstart=block_rows.on_dragstart(i)
                        on:dragover=block_rows.on_dragover(i)
                        on:drop=block_rows.on_drop(i)
                        on:dragend=block_rows.on_dragend()
                    >
                        <Show when=move || admin fallback=|| ().into_view()>
                            <div class="mb-3 flex items-center gap-2 text-xs text-muted-foreground">
                                <span class="cursor-grab" title="Drag to reorder">"⋮⋮"</span>
                                {format!("Block {}", i + 1)}
                            </div>
                        </Show>
                        <BlockView block=block />
                    </div>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        {move || {
            if loading.get() {
                return view! { <LoadingState label="Loading topic..." /> }.into_any();
            }
            if let Some(e) = error.get() {
                return view! {
                    <div class="mx-auto max-w-xl px-4 py-16">
                        <Alert class="border-destructive/30">
                            <AlertDescription class="text-destructive">{format!("⚠️ Error: {e}")}</AlertDescription>
                        </Alert>
                    </div>
                }
                .into_any();
            }
            let Some(current) = topic.get() else {
                return ().into_any();
            };

            let admin = app.is_admin();
            let (id, title) = (current.id, current.title.clone());

            view! {
                <div class="grid min-h-[calc(100vh-3.5rem)] md:grid-cols-[300px_1fr]">
                    {sidebar(current.clone())}

                    <main class="flex min-w-0 flex-col gap-6 p-6 md:p-10">
                        <nav class="flex flex-wrap items-center gap-1 text-sm text-muted-foreground">
                            <a href="/" class="hover:text-foreground">"🏠 Home"</a>
                            {crumb_path.with_value(|p| {
                                breadcrumbs(p)
                                    .map(|c| view! {
                                        <span>" / "</span>
                                        <a href=c.href class="hover:text-foreground">{c.label.to_string()}</a>
                                    })
                                    .collect_view()
                            })}
                        </nav>

                        <header class="flex flex-col gap-2">
                            <span class="w-fit rounded-full border px-2 py-0.5 text-xs text-muted-foreground">
                                "Learning Path"
                            </span>
                            <h1 class="text-3xl font-bold tracking-tight">{current.title.clone()}</h1>
                            <p class="text-muted-foreground">{current.description_or_default().to_string()}</p>
                            <Show when=move || admin fallback=|| ().into_view()>
                                <Button
                                    variant=ButtonVariant::Destructive
                                    size=ButtonSize::Sm
                                    on:click={
                                        let title = title.clone();
                                        move |_| run_delete(DeleteTarget::Current(id), title.clone())
                                    }
                                >
                                    "🗑️ Delete Topic"
                                </Button>
                            </Show>
                        </header>

                        <NoticeBanner notice=notice />

                        <section class="flex flex-col gap-4">{content}</section>

                        <div class="flex justify-between border-t pt-6">
                            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_previous>
                                "← Previous"
                            </Button>
                        </div>
                    </main>
                </div>
            }
            .into_any()
        }}
    }
}

#[component]
pub fn AddSubtopicPage(path: String) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    // (id, title, child count) of the parent once loaded.
    let parent: RwSignal<Option<(TopicId, String, u32)>> = RwSignal::new(None);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<Notice>> = RwSignal::new(None);
    let draft = RwSignal::new(TopicDraft::default());
    let busy = RwSignal::new(false);
    let parent_path = StoredValue::new(path.clone());

    fetch_topic_detail(app, path, move |result| match result {
        Ok(detail) => parent.set(Some((
            detail.topic.id,
            detail.topic.title.clone(),
            detail.children.len() as u32,
        ))),
        Err(e) => load_error.set(Some(e.message)),
    });

    let on_submit = Callback::new(move |_: ()| {
        if busy.get_untracked() {
            return;
        }
        let Some((parent_id, _, count)) = parent.get_untracked() else {
            flash(notice, Notice::Error("⚠️ Parent topic is still loading.".to_string()));
            return;
        };
        let req = match draft.with_untracked(|d| d.into_request(Some(parent_id), count, true)) {
            Ok(r) => r,
            Err(e) => {
                flash(notice, Notice::Error(format!("⚠️ {e}")));
                return;
            }
        };

        busy.set(true);
        let client = app.client();
        spawn_local(async move {
            match client.create_topic(&req).await {
                Ok(_) => {
                    log!("subtopic `{}` created under topic {parent_id}", req.slug);
                    notice.set(Some(Notice::Success(
                        "✅ Subtopic created successfully!".to_string(),
                    )));
                    let href = parent_path.with_value(|p| topic_href(&child_path(p, &req.slug)));
                    let _ = navigate.try_with_value(|n| n(&href, NavigateOptions::default()));
                }
                Err(e) => {
                    app.handle_unauthorized(&e);
                    flash(notice, Notice::Error(format!("❌ {e}")));
                }
            }
            busy.set(false);
        });
    });

    view! {
        <div class="mx-auto w-full max-w-lg px-4 py-10">
            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"Add Subtopic"</CardTitle>
                    <CardDescription class="text-xs">
                        {move || match parent.get() {
                            Some((_, title, _)) => format!("Under \"{title}\""),
                            None => "Loading parent topic...".to_string(),
                        }}
                    </CardDescription>
                </CardHeader>
                <CardContent class="flex flex-col gap-3">
                    {move || load_error.get().map(|e| view! {
                        <Alert class="border-destructive/30">
                            <AlertDescription class="text-destructive">{format!("⚠️ {e}")}</AlertDescription>
                        </Alert>
                    })}
                    <NoticeBanner notice=notice />
                    <TopicForm draft=draft busy=busy submit_label="Create subtopic" on_submit=on_submit />
                    <a
                        class="text-xs text-muted-foreground underline underline-offset-4"
                        href=parent_path.with_value(|p| topic_href(p))
                    >
                        "← Back to topic"
                    </a>
                </CardContent>
            </Card>
        </div>
    }
}
