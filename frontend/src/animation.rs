use shared::spin::{FrameCallback, FrameHandle, FrameScheduler};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::window;

/// Frame scheduler backed by `requestAnimationFrame` and `performance.now()`.
#[derive(Default)]
pub struct BrowserFrameScheduler;

impl FrameScheduler for BrowserFrameScheduler {
    fn now(&self) -> f64 {
        window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let Some(window) = window() else {
            log::error!("No window available to schedule an animation frame");
            return FrameHandle(0);
        };

        // A frame that gets cancelled never frees its closure.
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        match window.request_animation_frame(closure.unchecked_ref()) {
            Ok(id) => FrameHandle(id as u64),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Some(window) = window() {
            if let Err(e) = window.cancel_animation_frame(handle.0 as i32) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }
}
