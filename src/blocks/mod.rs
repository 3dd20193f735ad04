//! Read-only rendering of content blocks.

use crate::models::{Component, ContentBlock, HeadingLevel};
use leptos::prelude::*;

/// Tailwind classes for a note's tone. Unknown tones render as `info`.
pub(crate) fn note_tone_class(tone: &str) -> &'static str {
    match tone {
        "warning" => "border-amber-500/40 bg-amber-500/10",
        "success" | "tip" => "border-emerald-500/40 bg-emerald-500/10",
        "error" | "danger" => "border-destructive/40 bg-destructive/10",
        _ => "border-sky-500/40 bg-sky-500/10",
    }
}

/// Next carousel index after stepping by `delta`, wrapping in both directions.
pub(crate) fn carousel_step(index: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + delta).rem_euclid(len as isize) as usize
}

fn heading_view(text: String, level: HeadingLevel) -> AnyView {
    match level.get() {
        1 => view! { <h1 class="text-3xl font-bold tracking-tight">{text}</h1> }.into_any(),
        2 => view! { <h2 class="text-2xl font-semibold tracking-tight">{text}</h2> }.into_any(),
        3 => view! { <h3 class="text-xl font-semibold">{text}</h3> }.into_any(),
        4 => view! { <h4 class="text-lg font-semibold">{text}</h4> }.into_any(),
        5 => view! { <h5 class="text-base font-semibold">{text}</h5> }.into_any(),
        _ => view! { <h6 class="text-sm font-semibold uppercase">{text}</h6> }.into_any(),
    }
}

#[component]
fn Carousel(images: Vec<String>) -> impl IntoView {
    let images: Vec<String> = images.into_iter().filter(|u| !u.trim().is_empty()).collect();
    let len = images.len();
    let index = RwSignal::new(0_usize);
    let images = StoredValue::new(images);

    if len == 0 {
        return ().into_any();
    }

    view! {
        <figure class="flex flex-col gap-2">
            <div class="relative overflow-hidden rounded-lg border bg-muted/30">
                <img
                    class="mx-auto max-h-96 object-contain"
                    src=move || images.with_value(|xs| xs.get(index.get()).cloned().unwrap_or_default())
                    alt=move || format!("Slide {} of {}", index.get() + 1, len)
                />
            </div>
            <Show when=move || { len > 1 } fallback=|| ()>
                <div class="flex items-center justify-center gap-3 text-sm">
                    <button
                        class="rounded-md border px-2 py-1 hover:bg-accent"
                        on:click=move |_| index.update(|i| *i = carousel_step(*i, len, -1))
                    >
                        "←"
                    </button>
                    <span class="text-muted-foreground">
                        {move || format!("{} / {}", index.get() + 1, len)}
                    </span>
                    <button
                        class="rounded-md border px-2 py-1 hover:bg-accent"
                        on:click=move |_| index.update(|i| *i = carousel_step(*i, len, 1))
                    >
                        "→"
                    </button>
                </div>
            </Show>
        </figure>
    }
    .into_any()
}

/// One component, dispatched by kind.
#[component]
pub fn ComponentView(component: Component) -> impl IntoView {
    match component {
        Component::Heading { text, level } => heading_view(text, level),
        Component::Paragraph { text } => view! {
            <p class="leading-7 whitespace-pre-line">{text}</p>
        }
        .into_any(),
        Component::Example { title, content } => view! {
            <div class="rounded-lg border-l-4 border-primary/60 bg-primary/5 px-4 py-3">
                <div class="mb-1 text-xs font-semibold uppercase tracking-wide text-primary">
                    {if title.trim().is_empty() { "Example".to_string() } else { title }}
                </div>
                <div class="whitespace-pre-line text-sm">{content}</div>
            </div>
        }
        .into_any(),
        Component::Note {
            title,
            content,
            tone,
        } => {
            let class = format!("rounded-lg border px-4 py-3 {}", note_tone_class(&tone));
            view! {
                <div class=class>
                    <Show when={
                        let has_title = !title.trim().is_empty();
                        move || has_title
                    } fallback=|| ()>
                        <div class="mb-1 font-semibold">{title.clone()}</div>
                    </Show>
                    <div class="whitespace-pre-line text-sm">{content}</div>
                </div>
            }
            .into_any()
        }
        Component::Code { language, code } => view! {
            <div class="overflow-hidden rounded-lg border bg-zinc-950 text-zinc-100">
                <div class="border-b border-zinc-800 px-3 py-1 text-xs text-zinc-400">
                    {language.clone()}
                </div>
                <pre class="overflow-x-auto p-3 text-xs leading-relaxed">
                    <code class=format!("language-{language}")>{code}</code>
                </pre>
            </div>
        }
        .into_any(),
        Component::Image { url, alt, caption } => view! {
            <figure class="flex flex-col items-center gap-2">
                <img class="max-h-[28rem] rounded-lg border object-contain" src=url alt=alt />
                <Show when={
                    let has_caption = !caption.trim().is_empty();
                    move || has_caption
                } fallback=|| ()>
                    <figcaption class="text-xs text-muted-foreground">{caption.clone()}</figcaption>
                </Show>
            </figure>
        }
        .into_any(),
        Component::Carousel { images } => view! { <Carousel images=images /> }.into_any(),
    }
}

/// A block: its components in order plus tag/read-time metadata.
#[component]
pub fn BlockView(block: ContentBlock) -> impl IntoView {
    let meta = block.metadata.clone();
    let has_meta = !meta.tags.is_empty() || !meta.estimated_read_time.trim().is_empty();

    view! {
        <article class="flex flex-col gap-4">
            <Show when=move || has_meta fallback=|| ()>
                <div class="flex flex-wrap items-center gap-2 text-xs text-muted-foreground">
                    {meta
                        .tags
                        .iter()
                        .map(|t| view! { <span class="rounded-full border px-2 py-0.5">{t.clone()}</span> })
                        .collect_view()}
                    <span>{meta.estimated_read_time.clone()}</span>
                </div>
            </Show>
            {block
                .components
                .into_iter()
                .map(|c| view! { <ComponentView component=c /> })
                .collect_view()}
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carousel_wraps_both_ways() {
        assert_eq!(carousel_step(0, 3, -1), 2);
        assert_eq!(carousel_step(2, 3, 1), 0);
        assert_eq!(carousel_step(1, 3, 1), 2);
        assert_eq!(carousel_step(0, 0, 1), 0);
    }

    #[test]
    fn test_unknown_note_tone_falls_back_to_info() {
        assert_eq!(note_tone_class("mystery"), note_tone_class("info"));
        assert_ne!(note_tone_class("warning"), note_tone_class("info"));
    }
}
