//! Content editor for the add-content and update-content views.

use crate::api::{ApiError, ApiResult, ComponentPayload, SaveContentRequest};
use crate::components::sortable::Sortable;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Label, NoticeBanner, Spinner};
use crate::models::{BlockId, BlockKind, BlockMetadata, Component, ContentBlock, HeadingLevel};
use crate::navigator::topic_href;
use crate::reorder::{apply_move, MoveRequest, Ordered};
use crate::state::{fetch_topic_detail, flash, AppContext, Notice};
use crate::util::{join_tags, parse_tags};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;
use std::time::Duration;
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Update,
}

impl EditorMode {
    fn title(self) -> &'static str {
        match self {
            EditorMode::Add => "Add Content",
            EditorMode::Update => "Update Content",
        }
    }

    fn save_label(self) -> &'static str {
        match self {
            EditorMode::Add => "💾 Save Content",
            EditorMode::Update => "💾 Update Content",
        }
    }

    fn busy_label(self) -> &'static str {
        match self {
            EditorMode::Add => "Saving...",
            EditorMode::Update => "Updating...",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            EditorMode::Add => "✅ Content added!",
            EditorMode::Update => "✅ Content updated!",
        }
    }
}

/// A component being edited. `key` is local and stable across moves.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DraftComponent {
    pub key: u64,
    pub order: u32,
    pub component: Component,
}

impl Ordered for DraftComponent {
    fn order_no(&self) -> u32 {
        self.order
    }

    fn set_order_no(&mut self, order_no: u32) {
        self.order = order_no;
    }
}

/// Where a save goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SaveTarget {
    Create { topic_path: String },
    Update { block_id: BlockId },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ContentDraft {
    pub components: Vec<DraftComponent>,
    pub tags: String,
    pub read_time: String,
    /// Block an update overwrites.
    pub block_id: Option<BlockId>,
    next_key: u64,
}

impl ContentDraft {
    /// Load the first stored block for editing.
    pub fn from_block(block: &ContentBlock) -> Self {
        let mut draft = Self {
            tags: join_tags(&block.metadata.tags),
            read_time: block.metadata.estimated_read_time.clone(),
            block_id: Some(block.id),
            ..Default::default()
        };
        for c in &block.components {
            draft.push(c.clone());
        }
        draft
    }

    /// Load the block readers see first: lowest `block_order`, server order
    /// breaking ties.
    pub fn from_blocks(blocks: &[ContentBlock]) -> Option<Self> {
        blocks
            .iter()
            .min_by_key(|b| b.block_order)
            .map(Self::from_block)
    }

    fn push(&mut self, component: Component) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        self.components.push(DraftComponent {
            key,
            order: self.components.len() as u32,
            component,
        });
        key
    }

    /// Append a blank component of `kind`; returns its key.
    pub fn add(&mut self, kind: BlockKind) -> u64 {
        self.push(Component::empty(kind))
    }

    pub fn remove(&mut self, key: u64) {
        self.components.retain(|c| c.key != key);
        crate::reorder::renumber(&mut self.components);
    }

    pub fn get(&self, key: u64) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.key == key)
            .map(|c| &c.component)
    }

    pub fn edit(&mut self, key: u64, f: impl FnOnce(&mut Component)) {
        if let Some(c) = self.components.iter_mut().find(|c| c.key == key) {
            f(&mut c.component);
        }
    }

    /// Local only; the order is persisted with the next save.
    pub fn move_component(&mut self, mv: MoveRequest) -> bool {
        apply_move(&mut self.components, mv)
    }

    pub fn save_target(&self, mode: EditorMode, topic_path: &str) -> ApiResult<SaveTarget> {
        match mode {
            EditorMode::Add => Ok(SaveTarget::Create {
                topic_path: topic_path.to_string(),
            }),
            EditorMode::Update => self
                .block_id
                .map(|block_id| SaveTarget::Update { block_id })
                .ok_or_else(|| ApiError::missing("No block found to update.")),
        }
    }

    pub fn to_request(&self) -> ApiResult<SaveContentRequest> {
        if self.components.is_empty() {
            return Err(ApiError::missing("Add at least one block!"));
        }
        Ok(SaveContentRequest {
            components: self
                .components
                .iter()
                .enumerate()
                .map(|(i, c)| ComponentPayload {
                    order_no: i as u32,
                    component: c.component.clone(),
                })
                .collect(),
            metadata: BlockMetadata {
                tags: parse_tags(&self.tags),
                estimated_read_time: self.read_time.trim().to_string(),
            },
        })
    }
}

const FIELD: &str = "w-full rounded-md border border-input bg-transparent px-3 py-1.5 text-sm shadow-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50 dark:bg-input/30";

/// Uncontrolled text field: seeded once, reports every edit.
#[component]
fn DraftField(
    #[prop(into)] label: String,
    #[prop(into)] initial: String,
    on_change: Callback<String>,
    #[prop(optional)] rows: Option<u32>,
    #[prop(optional)] monospace: bool,
) -> impl IntoView {
    let class = if monospace {
        format!("{FIELD} font-mono text-xs")
    } else {
        FIELD.to_string()
    };

    let control = match rows {
        Some(rows) => view! {
            <textarea
                class=class
                rows=rows.to_string()
                spellcheck=(!monospace).to_string()
                prop:value=initial
                on:input=move |ev| on_change.run(event_target_value(&ev))
            ></textarea>
        }
        .into_any(),
        None => view! {
            <input
                class=class
                prop:value=initial
                on:input=move |ev| on_change.run(event_target_value(&ev))
            />
        }
        .into_any(),
    };

    view! {
        <div class="flex flex-col gap-1.5">
            <Label class="text-xs">{label}</Label>
            {control}
        </div>
    }
}

#[component]
fn DraftSelect(
    #[prop(into)] label: String,
    options: Vec<(String, String)>,
    #[prop(into)] initial: String,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1.5">
            <Label class="text-xs">{label}</Label>
            <select class=FIELD on:change=move |ev| on_change.run(event_target_value(&ev))>
                {options
                    .into_iter()
                    .map(|(value, text)| {
                        let selected = value == initial;
                        view! { <option value=value selected=selected>{text}</option> }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

const NOTE_TONES: [&str; 4] = ["info", "warning", "success", "error"];

fn edit(draft: RwSignal<ContentDraft>, key: u64, f: impl FnOnce(&mut Component)) {
    draft.update(|d| d.edit(key, f));
}

/// Field editors for one draft component.
#[component]
fn ComponentFields(draft: RwSignal<ContentDraft>, item: u64) -> impl IntoView {
    let Some(component) = draft.with_untracked(|d| d.get(item).cloned()) else {
        return ().into_any();
    };

    match component {
        Component::Heading { text, level } => {
            let levels = (1..=6)
                .map(|l| (l.to_string(), format!("H{l}")))
                .collect::<Vec<_>>();
            view! {
                <DraftField
                    label="Heading Text"
                    initial=text
                    on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                        if let Component::Heading { text, .. } = c { *text = v; }
                    }))
                />
                <DraftSelect
                    label="Level"
                    options=levels
                    initial=level.get().to_string()
                    on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                        if let (Component::Heading { level, .. }, Some(l)) =
                            (c, v.parse().ok().and_then(HeadingLevel::new))
                        {
                            *level = l;
                        }
                    }))
                />
            }
            .into_any()
        }
        Component::Paragraph { text } => view! {
            <DraftField
                label="Paragraph"
                initial=text
                rows=4
                on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                    if let Component::Paragraph { text } = c { *text = v; }
                }))
            />
        }
        .into_any(),
        Component::Example { title, content } => view! {
            <DraftField
                label="Example Title"
                initial=title
                on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                    if let Component::Example { title, .. } = c { *title = v; }
                }))
            />
            <DraftField
                label="Example"
                initial=content
                rows=4
                on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                    if let Component::Example { content, .. } = c { *content = v; }
                }))
            />
        }
        .into_any(),
        Component::Note {
            title,
            content,
            tone,
        } => {
            let tones = NOTE_TONES
                .iter()
                .map(|t| (t.to_string(), t.to_string()))
                .collect::<Vec<_>>();
            view! {
                <DraftField
                    label="Note Title"
                    initial=title
                    on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                        if let Component::Note { title, .. } = c { *title = v; }
                    }))
                />
                <DraftField
                    label="Note"
                    initial=content
                    rows=3
                    on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                        if let Component::Note { content, .. } = c { *content = v; }
                    }))
                />
                <DraftSelect
                    label="Type"
                    options=tones
                    initial=tone
                    on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                        if let Component::Note { tone, .. } = c { *tone = v; }
                    }))
                />
            }
            .into_any()
        }
        Component::Code { language, code } => view! {
            <DraftField
                label="Language"
                initial=language
                on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                    if let Component::Code { language, .. } = c { *language = v; }
                }))
            />
            <DraftField
                label="Code"
                initial=code
                rows=6
                monospace=true
                on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                    if let Component::Code { code, .. } = c { *code = v; }
                }))
            />
        }
        .into_any(),
        Component::Image { url, alt, caption } => view! {
            <DraftField
                label="Image URL"
                initial=url
                on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                    if let Component::Image { url, .. } = c { *url = v; }
                }))
            />
            <DraftField
                label="Alt Text"
                initial=alt
                on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                    if let Component::Image { alt, .. } = c { *alt = v; }
                }))
            />
            <DraftField
                label="Caption"
                initial=caption
                on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                    if let Component::Image { caption, .. } = c { *caption = v; }
                }))
            />
        }
        .into_any(),
        Component::Carousel { images } => images
            .into_iter()
            .enumerate()
            .map(|(slot, url)| {
                view! {
                    <DraftField
                        label=format!("Image {} URL", slot + 1)
                        initial=url
                        on_change=Callback::new(move |v: String| edit(draft, item, move |c| {
                            if let Some(img) = match c {
                                Component::Carousel { images } => images.get_mut(slot),
                                _ => None,
                            } {
                                *img = v;
                            }
                        }))
                    />
                }
            })
            .collect_view()
            .into_any(),
    }
}

#[component]
pub fn ContentEditorPage(mode: EditorMode, path: String) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    let draft = RwSignal::new(ContentDraft::default());
    let topic_title: RwSignal<Option<String>> = RwSignal::new(None);
    let notice: RwSignal<Option<Notice>> = RwSignal::new(None);
    let saving = RwSignal::new(false);
    let topic_path = StoredValue::new(path.clone());

    fetch_topic_detail(app, path.clone(), move |result| match result {
        Ok(detail) => {
            topic_title.set(Some(detail.topic.title.clone()));
            if mode == EditorMode::Update {
                if let Some(loaded) = ContentDraft::from_blocks(&detail.blocks) {
                    draft.set(loaded);
                }
            }
        }
        Err(e) => flash(notice, Notice::Error(format!("❌ {e}"))),
    });

    let rows = Sortable::new(
        "draft",
        Signal::derive(move || app.is_admin()),
        Callback::new(move |mv: MoveRequest| {
            draft.update(|d| {
                d.move_component(mv);
            })
        }),
    );

    let on_save = move |_: web_sys::MouseEvent| {
        if saving.get_untracked() {
            return;
        }
        let prepared = draft.with_untracked(|d| {
            topic_path.with_value(|p| Ok::<_, ApiError>((d.save_target(mode, p)?, d.to_request()?)))
        });
        let (target, req) = match prepared {
            Ok(x) => x,
            Err(e) => {
                flash(notice, Notice::Error(format!("⚠️ {e}")));
                return;
            }
        };

        saving.set(true);
        let client = app.client();
        spawn_local(async move {
            let result = match &target {
                SaveTarget::Create { topic_path } => client.create_content(topic_path, &req).await,
                SaveTarget::Update { block_id } => client.update_content_block(*block_id, &req).await,
            };
            match result {
                Ok(_) => {
                    log!("content saved: {target:?}, {} components", req.components.len());
                    notice.set(Some(Notice::Success(mode.success_message().to_string())));
                    let href = topic_path.with_value(|p| topic_href(p));
                    set_timeout(
                        move || {
                            let _ = navigate.try_with_value(|n| n(&href, NavigateOptions::default()));
                        },
                        Duration::from_millis(1200),
                    );
                }
                Err(e) => {
                    app.handle_unauthorized(&e);
                    flash(notice, Notice::Error(format!("❌ {e}")));
                }
            }
            saving.set(false);
        });
    };

    let tags = Signal::derive(move || draft.with(|d| d.tags.clone()));
    let read_time = Signal::derive(move || draft.with(|d| d.read_time.clone()));

    view! {
        <div class="mx-auto grid w-full max-w-6xl gap-6 px-4 py-8 md:grid-cols-[260px_1fr]">
            <aside class="flex flex-col gap-4">
                <a class="text-xs text-muted-foreground hover:text-foreground" href=topic_path.with_value(|p| topic_href(p))>
                    "← Back"
                </a>
                <div>
                    <div class="text-2xl">{if mode == EditorMode::Update { "✏️" } else { "🧩" }}</div>
                    <h1 class="text-lg font-semibold">{mode.title()}</h1>
                    <p class="text-xs text-muted-foreground">
                        {if mode == EditorMode::Update {
                            "Modify existing content and save changes."
                        } else {
                            "Click a block type below to add."
                        }}
                    </p>
                </div>

                <Show when=move || mode == EditorMode::Add fallback=|| ().into_view()>
                    <div class="grid grid-cols-2 gap-2">
                        {BlockKind::iter()
                            .map(|kind| view! {
                                <button
                                    class="flex flex-col items-center gap-1 rounded-lg border p-3 text-xs hover:bg-accent"
                                    on:click=move |_| {
                                        draft.update(|d| {
                                            d.add(kind);
                                        })
                                    }
                                >
                                    <span class="text-xl">{kind.icon()}</span>
                                    {kind.label()}
                                </button>
                            })
                            .collect_view()}
                    </div>
                </Show>

                <div class="flex flex-col gap-3 border-t pt-4">
                    <div class="flex flex-col gap-1.5">
                        <Label class="text-xs">"Tags (comma separated)"</Label>
                        <input
                            class=FIELD
                            placeholder="Python, Basics"
                            prop:value=move || tags.get()
                            on:input=move |ev| draft.update(|d| d.tags = event_target_value(&ev))
                        />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label class="text-xs">"Estimated read time"</Label>
                        <input
                            class=FIELD
                            placeholder="10 Min"
                            prop:value=move || read_time.get()
                            on:input=move |ev| draft.update(|d| d.read_time = event_target_value(&ev))
                        />
                    </div>

                    <span class="text-xs text-muted-foreground">
                        {move || {
                            let n = draft.with(|d| d.components.len());
                            format!("{n} Block{}", if n == 1 { "" } else { "s" })
                        }}
                    </span>
                    <Button class="w-full" on:click=on_save attr:disabled=move || saving.get()>
                        <span class="inline-flex items-center gap-2">
                            <Show when=move || saving.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if saving.get() { mode.busy_label() } else { mode.save_label() }}
                        </span>
                    </Button>
                </div>
            </aside>

            <main class="flex min-w-0 flex-col gap-4">
                <div class="flex flex-col gap-1 border-b pb-4">
                    <span class="w-fit rounded-full border px-2 py-0.5 text-[10px] uppercase tracking-wide text-muted-foreground">
                        {if mode == EditorMode::Update { "Editing Existing" } else { "New Content" }}
                    </span>
                    <h2 class="text-2xl font-bold">
                        {move || topic_title.get().unwrap_or_else(|| "Loading...".to_string())}
                    </h2>
                    <span class="font-mono text-xs text-muted-foreground">{format!("/{path}")}</span>
                </div>

                <NoticeBanner notice=notice />

                <For
                    each=move || {
                        draft.with(|d| {
                            d.components
                                .iter()
                                .enumerate()
                                .map(|(i, c)| (i, c.key, c.component.kind()))
                                .collect::<Vec<_>>()
                        })
                    }
                    key=|(i, key, _)| (*i, *key)
                    children=move |(i, key, kind)| {
                        view! {
                            <div
                                class=move || format!("rounded-xl border bg-card p-4 {}", rows.row_class(i))
                                draggable="true"
                                on:dragstart=rows.on_dragstart(i)
                                on:dragover=rows.on_dragover(i)
                                on:drop=rows.on_drop(i)
                                on:dragend=rows.on_dragend()
                            >
                                <div class="mb-3 flex items-center gap-2 text-sm">
                                    <span class="cursor-grab text-muted-foreground" title="Drag to reorder">"⋮⋮"</span>
                                    <span>{kind.icon()}</span>
                                    <span class="font-medium">{kind.label()}</span>
                                    <Show when=move || mode == EditorMode::Add fallback=|| ().into_view()>
                                        <Button
                                            class="ml-auto"
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Sm
                                            on:click=move |_| draft.update(|d| d.remove(key))
                                        >
                                            "🗑️"
                                        </Button>
                                    </Show>
                                </div>
                                <div class="flex flex-col gap-3">
                                    <ComponentFields draft=draft item=key />
                                </div>
                            </div>
                        }
                    }
                />
            </main>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;

    fn kinds(d: &ContentDraft) -> Vec<BlockKind> {
        d.components.iter().map(|c| c.component.kind()).collect()
    }

    #[test]
    fn test_add_appends_blank_components_in_order() {
        let mut d = ContentDraft::default();
        d.add(BlockKind::Heading);
        d.add(BlockKind::Code);
        assert_eq!(kinds(&d), vec![BlockKind::Heading, BlockKind::Code]);
        let orders: Vec<u32> = d.components.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_move_reorders_and_payload_follows() {
        let mut d = ContentDraft::default();
        let heading = d.add(BlockKind::Heading);
        d.add(BlockKind::Paragraph);
        d.add(BlockKind::Code);
        d.edit(heading, |c| {
            if let Component::Heading { text, .. } = c {
                *text = "Intro".to_string();
            }
        });

        assert!(d.move_component(MoveRequest::new(0, Some(2))));
        assert_eq!(
            kinds(&d),
            vec![BlockKind::Paragraph, BlockKind::Code, BlockKind::Heading]
        );

        let req = d.to_request().expect("non-empty");
        let orders: Vec<u32> = req.components.iter().map(|c| c.order_no).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(
            req.components[2].component,
            Component::Heading {
                text: "Intro".to_string(),
                level: HeadingLevel::default()
            }
        );
    }

    #[test]
    fn test_remove_keeps_orders_dense() {
        let mut d = ContentDraft::default();
        d.add(BlockKind::Note);
        let image = d.add(BlockKind::Image);
        d.add(BlockKind::Carousel);
        d.remove(image);
        assert_eq!(kinds(&d), vec![BlockKind::Note, BlockKind::Carousel]);
        assert_eq!(d.components[1].order, 1);
        assert!(d.get(image).is_none());
    }

    #[test]
    fn test_empty_draft_is_rejected() {
        let err = ContentDraft::default().to_request().expect_err("empty");
        assert_eq!(err.kind, ApiErrorKind::MissingPrecondition);
        assert_eq!(err.to_string(), "Add at least one block!");
    }

    #[test]
    fn test_update_without_block_is_missing_precondition() {
        let mut d = ContentDraft::default();
        d.add(BlockKind::Paragraph);
        let err = d
            .save_target(EditorMode::Update, "python")
            .expect_err("no block loaded");
        assert_eq!(err.to_string(), "No block found to update.");
        assert_eq!(
            d.save_target(EditorMode::Add, "python/basics").expect("add"),
            SaveTarget::Create {
                topic_path: "python/basics".to_string()
            }
        );
    }

    #[test]
    fn test_update_opens_the_block_shown_first() {
        let block = |id, block_order| ContentBlock {
            id,
            topic_id: Some(2),
            block_order,
            components: vec![],
            metadata: BlockMetadata::default(),
        };
        let blocks = vec![block(7, 2), block(8, 0), block(9, 1), block(10, 0)];
        let d = ContentDraft::from_blocks(&blocks).expect("has blocks");
        assert_eq!(d.block_id, Some(8));
        assert!(ContentDraft::from_blocks(&[]).is_none());
    }

    #[test]
    fn test_from_block_loads_components_and_metadata() {
        let block = ContentBlock {
            id: 42,
            topic_id: Some(2),
            block_order: 0,
            components: vec![
                Component::Paragraph {
                    text: "hello".to_string(),
                },
                Component::Code {
                    language: "rust".to_string(),
                    code: "let x = 1;".to_string(),
                },
            ],
            metadata: BlockMetadata {
                tags: vec!["Rust".to_string(), "Basics".to_string()],
                estimated_read_time: "5 Min".to_string(),
            },
        };
        let d = ContentDraft::from_block(&block);
        assert_eq!(d.block_id, Some(42));
        assert_eq!(d.tags, "Rust, Basics");
        assert_eq!(
            d.save_target(EditorMode::Update, "rust").expect("has block"),
            SaveTarget::Update { block_id: 42 }
        );

        let req = d.to_request().expect("non-empty");
        assert_eq!(req.metadata, block.metadata);
        assert_eq!(req.components.len(), 2);
    }
}
