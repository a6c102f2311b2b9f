use crate::{fit_width_zoom, zoom_percent, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use pdf_engine::DocumentHandle;

/// Which document is open, which page is showing and at what zoom.
///
/// Every transition returns `true` when it changed the state, so callers
/// know whether a re-render is due.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    document: Option<DocumentHandle>,
    page_count: u32,
    current_page: u32,
    zoom: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { document: None, page_count: 0, current_page: 0, zoom: DEFAULT_ZOOM }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<DocumentHandle> {
        self.document
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Installs a freshly opened document and returns the one it replaces.
    ///
    /// `page_count` must be at least 1.
    pub fn open(&mut self, document: DocumentHandle, page_count: u32) -> Option<DocumentHandle> {
        debug_assert!(page_count > 0, "documents always have at least one page");

        let previous = self.document.replace(document);
        self.page_count = page_count;
        self.current_page = 0;
        self.zoom = DEFAULT_ZOOM;
        previous
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn first_page(&mut self) -> bool {
        if !self.has_document() || self.current_page == 0 {
            return false;
        }
        self.current_page = 0;
        true
    }

    pub fn last_page(&mut self) -> bool {
        let last = self.page_count.saturating_sub(1);
        if !self.has_document() || self.current_page == last {
            return false;
        }
        self.current_page = last;
        true
    }

    /// Steps up by [`ZOOM_STEP`] unless that would pass [`MAX_ZOOM`].
    pub fn zoom_in(&mut self) -> bool {
        if !self.can_zoom_in() {
            return false;
        }
        self.zoom += ZOOM_STEP;
        true
    }

    /// Steps down by [`ZOOM_STEP`] unless that would pass [`MIN_ZOOM`].
    pub fn zoom_out(&mut self) -> bool {
        if !self.can_zoom_out() {
            return false;
        }
        self.zoom -= ZOOM_STEP;
        true
    }

    pub fn reset_zoom(&mut self) -> bool {
        let changed = self.zoom != DEFAULT_ZOOM;
        self.zoom = DEFAULT_ZOOM;
        changed
    }

    /// Picks the zoom that maps the page's native width onto the viewport.
    ///
    /// `page_width_at_scale_1` is the unzoomed page width, whatever the
    /// current zoom is.
    pub fn fit_to_width(&mut self, viewport_width: f32, page_width_at_scale_1: f32) -> bool {
        if !self.has_document() {
            return false;
        }
        let Some(zoom) = fit_width_zoom(viewport_width, page_width_at_scale_1) else {
            return false;
        };

        let changed = zoom != self.zoom;
        self.zoom = zoom;
        changed
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.has_document() && self.current_page + 1 < self.page_count
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom + ZOOM_STEP <= MAX_ZOOM
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom - ZOOM_STEP >= MIN_ZOOM
    }

    pub fn can_fit_width(&self) -> bool {
        self.has_document()
    }

    pub fn zoom_label(&self) -> String {
        format!("{}%", zoom_percent(self.zoom))
    }

    pub fn status_text(&self) -> String {
        if !self.has_document() {
            return "Ready".to_owned();
        }

        format!(
            "Page {} / {} - Zoom: {}%",
            self.current_page + 1,
            self.page_count,
            zoom_percent(self.zoom)
        )
    }
}
