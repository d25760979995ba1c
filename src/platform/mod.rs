//! Browser glue
//!
//! Telegram WebApp haptic feedback (best-effort, a no-op outside Telegram)
//! and LocalStorage access. Native builds get no-op stubs.

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    // The Telegram bridge object only exists inside the Mini App webview,
    // so the binding guards every call.
    #[wasm_bindgen(inline_js = "
        export function tg_impact(style) {
            const tg = window.Telegram && window.Telegram.WebApp;
            if (tg && tg.HapticFeedback) {
                tg.HapticFeedback.impactOccurred(style);
            }
        }
        export function tg_notify(kind) {
            const tg = window.Telegram && window.Telegram.WebApp;
            if (tg && tg.HapticFeedback) {
                tg.HapticFeedback.notificationOccurred(kind);
            }
        }
    ")]
    extern "C" {
        pub fn tg_impact(style: &str);
        pub fn tg_notify(kind: &str);
    }
}

/// Light haptic tap (jump, coin pickup)
pub fn haptic_impact() {
    #[cfg(target_arch = "wasm32")]
    web::tg_impact("light");
}

/// Failure haptic (crash)
pub fn haptic_error() {
    #[cfg(target_arch = "wasm32")]
    web::tg_notify("error");
}

/// Browser LocalStorage, if available
#[cfg(target_arch = "wasm32")]
pub fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}
