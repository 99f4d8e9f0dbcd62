//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Capability detection (resolved once at startup)
//! - Haptics (navigator.vibrate)
//! - Clipboard (async API with a hidden-textarea fallback)
//!
//! Every call is best-effort: failures are logged and swallowed.

use crate::settings::Capabilities;

#[cfg(target_arch = "wasm32")]
mod web {
    use js_sys::{Function, Promise, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{HtmlDocument, HtmlTextAreaElement};

    use crate::settings::Capabilities;

    fn has_property(target: &JsValue, name: &str) -> bool {
        Reflect::get(target, &name.into())
            .map(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(false)
    }

    fn media_matches(window: &web_sys::Window, query: &str) -> bool {
        let Ok(match_media) = Reflect::get(window, &"matchMedia".into()) else {
            return false;
        };
        let Ok(match_media) = match_media.dyn_into::<Function>() else {
            return false;
        };
        let Ok(result) = match_media.call1(window, &query.into()) else {
            return false;
        };
        Reflect::get(&result, &"matches".into())
            .ok()
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    pub fn detect_capabilities() -> Capabilities {
        let Some(window) = web_sys::window() else {
            return Capabilities::default();
        };
        let navigator = window.navigator();
        let caps = Capabilities {
            audio: has_property(&window, "AudioContext")
                || has_property(&window, "webkitAudioContext"),
            haptics: has_property(&navigator, "vibrate"),
            clipboard: has_property(&navigator, "clipboard"),
            coarse_pointer: media_matches(&window, "(pointer: coarse)"),
        };
        log::info!("Capabilities: {:?}", caps);
        caps
    }

    pub fn prefers_reduced_motion() -> bool {
        web_sys::window()
            .map(|w| media_matches(&w, "(prefers-reduced-motion: reduce)"))
            .unwrap_or(false)
    }

    pub fn vibrate(pattern: &[u32]) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let navigator = window.navigator();
        let ok = match pattern {
            [single] => navigator.vibrate_with_duration(*single),
            _ => {
                let arr = js_sys::Array::new();
                for ms in pattern {
                    arr.push(&JsValue::from(*ms));
                }
                navigator.vibrate_with_pattern(&arr)
            }
        };
        if !ok {
            log::debug!("Vibration refused");
        }
    }

    /// `navigator.clipboard.writeText(text)`, if the API exists
    async fn write_clipboard(text: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let Ok(clipboard) = Reflect::get(&window.navigator(), &"clipboard".into()) else {
            return false;
        };
        if clipboard.is_undefined() || clipboard.is_null() {
            return false;
        }
        let Ok(write_text) = Reflect::get(&clipboard, &"writeText".into())
            .and_then(|f| f.dyn_into::<Function>().map_err(JsValue::from))
        else {
            return false;
        };
        let Ok(promise) = write_text
            .call1(&clipboard, &text.into())
            .and_then(|p| p.dyn_into::<Promise>().map_err(JsValue::from))
        else {
            return false;
        };
        wasm_bindgen_futures::JsFuture::from(promise).await.is_ok()
    }

    /// Select a hidden textarea and run the legacy copy command
    fn textarea_copy(text: &str) -> bool {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return false;
        };
        let Some(body) = document.body() else {
            return false;
        };
        let Ok(textarea) = document
            .create_element("textarea")
            .map_err(JsValue::from)
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().map_err(JsValue::from))
        else {
            return false;
        };
        textarea.set_value(text);
        let _ = textarea.set_attribute("readonly", "");
        let _ = textarea.set_attribute("style", "position:fixed;top:-1000px;opacity:0");
        if body.append_child(&textarea).is_err() {
            return false;
        }
        textarea.select();
        let copied = document
            .dyn_ref::<HtmlDocument>()
            .and_then(|doc| doc.exec_command("copy").ok())
            .unwrap_or(false);
        let _ = body.remove_child(&textarea);
        copied
    }

    pub async fn copy_text(text: String, clipboard_api: bool) -> bool {
        if clipboard_api && write_clipboard(&text).await {
            return true;
        }
        log::warn!("Clipboard API unavailable, falling back to textarea copy");
        textarea_copy(&text)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{copy_text, detect_capabilities, prefers_reduced_motion, vibrate};

/// Native stub
#[cfg(not(target_arch = "wasm32"))]
pub fn detect_capabilities() -> Capabilities {
    Capabilities::default()
}

/// Native stub
#[cfg(not(target_arch = "wasm32"))]
pub fn prefers_reduced_motion() -> bool {
    false
}

/// Native stub: logs the pattern
#[cfg(not(target_arch = "wasm32"))]
pub fn vibrate(pattern: &[u32]) {
    log::debug!("vibrate {:?}", pattern);
}

/// Native stub: nothing to copy to
#[cfg(not(target_arch = "wasm32"))]
pub async fn copy_text(text: String, clipboard_api: bool) -> bool {
    log::debug!("copy {} bytes (clipboard api: {})", text.len(), clipboard_api);
    false
}

/// Whether a vibration should fire for this session
pub fn haptics_enabled(caps: &Capabilities, enabled_in_settings: bool) -> bool {
    caps.haptics && enabled_in_settings
}
