mod api;
mod app;
mod blocks;
mod components;
mod editor;
mod models;
mod navigator;
mod pages;
mod reorder;
mod session;
mod state;
mod storage;
mod theme;
mod topics;
mod util;

use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::models::{AccountInfo, Role};
    use crate::session::{AuthSession, SessionAccessor};
    use crate::storage::{Storage, AUTH_KEY};
    use crate::theme::Theme;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_session_survives_reload_from_local_storage() {
        let storage = Storage::browser();
        storage.remove(AUTH_KEY);

        let accessor = SessionAccessor::new(storage.clone());
        assert!(accessor.current().is_none());

        accessor.establish(AuthSession {
            token: "t1".to_string(),
            user: AccountInfo::fallback("a@b.c", Role::Admin),
            role: Role::Admin,
        });

        let reloaded = SessionAccessor::new(Storage::browser());
        let session = reloaded.current().expect("session should be persisted");
        assert_eq!(session.token, "t1");
        assert!(session.is_admin());

        reloaded.clear();
        assert!(SessionAccessor::new(Storage::browser()).current().is_none());
    }

    #[wasm_bindgen_test]
    fn test_theme_roundtrip_and_document_class() {
        let storage = Storage::browser();
        Theme::Dark.save(&storage);
        assert_eq!(Theme::load(&storage), Theme::Dark);

        Theme::Dark.apply_to_document();
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
            .expect("document element");
        assert!(root.class_list().contains("dark"));

        Theme::Light.apply_to_document();
        assert!(!root.class_list().contains("dark"));
        Theme::Light.save(&storage);
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(app::App);
}
