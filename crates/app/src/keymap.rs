//! Keyboard shortcuts.

use egui::Key;
use viewer_core::ViewerAction;

/// Keys with a viewer action bound to them.
pub const BOUND_KEYS: [Key; 11] = [
    Key::ArrowRight,
    Key::Space,
    Key::ArrowLeft,
    Key::Backspace,
    Key::Plus,
    Key::Equals,
    Key::Minus,
    Key::Num0,
    Key::F,
    Key::Home,
    Key::End,
];

/// Maps an unmodified key press to its action.
///
/// `fit_width` is the viewport width handed to fit-to-width.
pub fn action_for_key(key: Key, fit_width: f32) -> Option<ViewerAction> {
    let action = match key {
        Key::ArrowRight | Key::Space => ViewerAction::NextPage,
        Key::ArrowLeft | Key::Backspace => ViewerAction::PreviousPage,
        Key::Plus | Key::Equals => ViewerAction::ZoomIn,
        Key::Minus => ViewerAction::ZoomOut,
        Key::Num0 => ViewerAction::ResetZoom,
        Key::F => ViewerAction::FitToWidth { viewport_width: fit_width },
        Key::Home => ViewerAction::FirstPage,
        Key::End => ViewerAction::LastPage,
        _ => return None,
    };
    Some(action)
}
