//! Page and zoom bookkeeping for the viewer window.
//!
//! [`ViewState`] holds the navigation state and its pure transitions;
//! [`Viewer`] couples it with a [`pdf_engine::PdfEngine`] so every state
//! change is followed by a render of the current page.

mod error;
mod session;
mod state;

pub use error::ViewerError;
pub use session::{RenderedPage, Viewer, ViewerAction};
pub use state::ViewState;

pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.25;
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Zoom factor that maps a page's native width onto `viewport_width`.
///
/// Returns `None` when either width is non-positive or not finite.
pub fn fit_width_zoom(viewport_width: f32, page_width_at_scale_1: f32) -> Option<f32> {
    let valid = |width: f32| width.is_finite() && width > 0.0;
    if !valid(viewport_width) || !valid(page_width_at_scale_1) {
        return None;
    }

    Some((viewport_width / page_width_at_scale_1).clamp(MIN_ZOOM, MAX_ZOOM))
}

/// Zoom factor as a whole percentage, truncated.
pub fn zoom_percent(zoom: f32) -> u32 {
    (zoom * 100.0) as u32
}
