//! HTML5 drag-and-drop for flat lists, reported as [`MoveRequest`]s.

use crate::reorder::MoveRequest;
use leptos::prelude::*;

const DRAG_MIME: &str = "text/plain";

/// Drag payload `<list>:<index>`. Scoping by list keeps a drop from another
/// list (e.g. a block dragged onto the sidebar) from being read as a move.
pub(crate) fn encode_drag(list: &str, index: usize) -> String {
    format!("{list}:{index}")
}

pub(crate) fn decode_drag(list: &str, payload: &str) -> Option<usize> {
    let (key, index) = payload.rsplit_once(':')?;
    if key != list {
        return None;
    }
    index.parse().ok()
}

/// Drag state for one list. Attach the handlers to every row; they do
/// nothing while `enabled` reads `false`, so drags that bubble up from links
/// or images inside a row are not taken for moves.
#[derive(Clone, Copy)]
pub(crate) struct Sortable {
    list: &'static str,
    enabled: Signal<bool>,
    on_move: Callback<MoveRequest>,
    dragging: RwSignal<Option<usize>>,
    over: RwSignal<Option<usize>>,
}

impl Sortable {
    pub fn new(list: &'static str, enabled: Signal<bool>, on_move: Callback<MoveRequest>) -> Self {
        Self {
            list,
            enabled,
            on_move,
            dragging: RwSignal::new(None),
            over: RwSignal::new(None),
        }
    }

    pub fn on_dragstart(self, index: usize) -> impl Fn(web_sys::DragEvent) + Clone + 'static {
        move |ev| {
            if !self.enabled.get_untracked() {
                return;
            }
            if let Some(dt) = ev.data_transfer() {
                let _ = dt.set_data(DRAG_MIME, &encode_drag(self.list, index));
                dt.set_effect_allowed("move");
            }
            self.dragging.set(Some(index));
        }
    }

    pub fn on_dragover(self, index: usize) -> impl Fn(web_sys::DragEvent) + Clone + 'static {
        move |ev| {
            // Without `prevent_default` the row is not a drop target.
            if !self.enabled.get_untracked() {
                return;
            }
            ev.prevent_default();
            if let Some(dt) = ev.data_transfer() {
                dt.set_drop_effect("move");
            }
            if self.over.get_untracked() != Some(index) {
                self.over.set(Some(index));
            }
        }
    }

    pub fn on_drop(self, index: usize) -> impl Fn(web_sys::DragEvent) + Clone + 'static {
        move |ev| {
            if !self.enabled.get_untracked() {
                return;
            }
            ev.prevent_default();
            let source = ev
                .data_transfer()
                .and_then(|dt| dt.get_data(DRAG_MIME).ok())
                .and_then(|p| decode_drag(self.list, &p));
            self.dragging.set(None);
            self.over.set(None);

            if let Some(source) = source {
                self.on_move.run(MoveRequest::new(source, Some(index)));
            }
        }
    }

    /// Fires after `drop`. A drag still marked active here was released
    /// outside any row.
    pub fn on_dragend(self) -> impl Fn(web_sys::DragEvent) + Clone + 'static {
        move |_| {
            self.over.set(None);
            if let Some(source) = self.dragging.get_untracked() {
                self.dragging.set(None);
                self.on_move.run(MoveRequest::new(source, None));
            }
        }
    }

    /// Row classes reflecting the drag state.
    pub fn row_class(self, index: usize) -> &'static str {
        if self.dragging.get() == Some(index) {
            "opacity-50"
        } else if self.over.get() == Some(index) && self.dragging.get().is_some() {
            "ring-1 ring-primary/40 bg-primary/5"
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_scoped_to_its_list() {
        let p = encode_drag("children", 3);
        assert_eq!(decode_drag("children", &p), Some(3));
        assert_eq!(decode_drag("blocks", &p), None);
    }

    #[test]
    fn test_foreign_payloads_are_ignored() {
        assert_eq!(decode_drag("children", "https://example.com"), None);
        assert_eq!(decode_drag("children", "children:x"), None);
        assert_eq!(decode_drag("children", ""), None);
    }
}
