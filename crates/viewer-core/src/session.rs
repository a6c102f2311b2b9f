use crate::{ViewState, ViewerError};
use pdf_engine::{OpenSource, PdfEngine, RenderRequest, RgbaImage};
use std::path::{Path, PathBuf};

/// One user-level navigation or zoom command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerAction {
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    FitToWidth { viewport_width: f32 },
}

/// The last page image that rendered successfully.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page_index: u32,
    pub zoom: f32,
    pub image: RgbaImage,
    /// Bumped on every successful render, so the shell can tell when to re-upload.
    pub generation: u64,
}

/// A view state bound to the engine that renders it.
///
/// The viewer owns the open document handle: it is closed when another
/// document replaces it and when the viewer is dropped.
pub struct Viewer<E: PdfEngine> {
    engine: E,
    state: ViewState,
    source: Option<PathBuf>,
    page: Option<RenderedPage>,
    generation: u64,
}

impl<E: PdfEngine> Viewer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine, state: ViewState::new(), source: None, page: None, generation: 0 }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Path of the open document.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn rendered_page(&self) -> Option<&RenderedPage> {
        self.page.as_ref()
    }

    /// Opens `path` and shows its first page at 100%.
    ///
    /// If the engine cannot open the file the current document stays as it
    /// was. Once the engine has opened the file the switch is committed; a
    /// failure to render the first page is reported as
    /// [`ViewerError::PageRender`] with the new document still open.
    pub fn open_document(&mut self, path: &Path) -> Result<(), ViewerError> {
        let open_error = |source| ViewerError::DocumentOpen { path: path.to_path_buf(), source };

        let handle = self.engine.open(OpenSource::from(path)).map_err(open_error)?;

        let page_count = match self.engine.page_count(handle) {
            Ok(0) => Err(pdf_engine::PdfEngineError::NoPages),
            other => other,
        };
        let page_count = match page_count {
            Ok(count) => count,
            Err(source) => {
                self.release(handle);
                return Err(open_error(source));
            }
        };

        if let Some(previous) = self.state.open(handle, page_count) {
            self.release(previous);
        }
        self.source = Some(path.to_path_buf());
        self.page = None;

        tracing::info!(path = %path.display(), pages = page_count, "opened document");

        self.render_current()
    }

    /// Applies `action` and re-renders when it changed anything.
    ///
    /// Returns whether the state changed. On a render failure the state is
    /// put back the way it was before the action.
    pub fn apply(&mut self, action: ViewerAction) -> Result<bool, ViewerError> {
        let before = self.state.clone();

        let changed = match action {
            ViewerAction::NextPage => self.state.next_page(),
            ViewerAction::PreviousPage => self.state.previous_page(),
            ViewerAction::FirstPage => self.state.first_page(),
            ViewerAction::LastPage => self.state.last_page(),
            ViewerAction::ZoomIn => self.state.zoom_in(),
            ViewerAction::ZoomOut => self.state.zoom_out(),
            ViewerAction::ResetZoom => self.state.reset_zoom(),
            ViewerAction::FitToWidth { viewport_width } => self.fit_to_width(viewport_width)?,
        };

        if !changed {
            return Ok(false);
        }

        tracing::debug!(
            ?action,
            page = self.state.current_page(),
            zoom = self.state.zoom(),
            "view state changed"
        );

        if let Err(err) = self.render_current() {
            self.state = before;
            return Err(err);
        }

        Ok(true)
    }

    /// "Opened report.pdf - 12 pages", for the status bar right after an open.
    pub fn opened_notice(&self) -> Option<String> {
        let name = self.source.as_deref()?.file_name()?.to_string_lossy();
        Some(format!("Opened {name} - {} pages", self.state.page_count()))
    }

    fn fit_to_width(&mut self, viewport_width: f32) -> Result<bool, ViewerError> {
        let Some(handle) = self.state.document() else {
            return Ok(false);
        };

        let page = self.state.current_page();
        let size = self
            .engine
            .page_size(handle, page)
            .map_err(|source| ViewerError::PageRender { page, source })?;

        Ok(self.state.fit_to_width(viewport_width, size.width_pt))
    }

    fn render_current(&mut self) -> Result<(), ViewerError> {
        let Some(handle) = self.state.document() else {
            return Ok(());
        };

        let page_index = self.state.current_page();
        let zoom = self.state.zoom();
        tracing::debug!(page = page_index, zoom, "rendering page");

        let image = self
            .engine
            .render_page(handle, RenderRequest { page_index, scale: zoom })
            .map_err(|source| ViewerError::PageRender { page: page_index, source })?;

        self.generation += 1;
        self.page = Some(RenderedPage { page_index, zoom, image, generation: self.generation });
        Ok(())
    }

    fn release(&mut self, handle: pdf_engine::DocumentHandle) {
        if let Err(err) = self.engine.close(handle) {
            tracing::warn!(handle = handle.raw(), %err, "failed to release document");
        }
    }
}

impl<E: PdfEngine> Drop for Viewer<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.state.document() {
            self.release(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_engine::{DocumentHandle, PageSize, PdfEngineError};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Engine double: documents are keyed by path, renders can be made to fail.
    #[derive(Default)]
    struct FakeEngine {
        library: HashMap<PathBuf, u32>,
        open: Rc<RefCell<Vec<DocumentHandle>>>,
        next: u64,
        fail_renders: Rc<Cell<bool>>,
        fail_page_sizes: Rc<Cell<bool>>,
    }

    impl FakeEngine {
        fn with_document(mut self, path: &str, pages: u32) -> Self {
            self.library.insert(PathBuf::from(path), pages);
            self
        }

        fn pages_of(&self, handle: DocumentHandle) -> Result<u32, PdfEngineError> {
            if !self.open.borrow().contains(&handle) {
                return Err(PdfEngineError::InvalidHandle(handle.raw()));
            }
            // Handles encode the page count in the low byte.
            Ok((handle.raw() & 0xff) as u32)
        }
    }

    impl PdfEngine for FakeEngine {
        fn open(&mut self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError> {
            let OpenSource::Path(path) = source else {
                return Err(PdfEngineError::Backend("bytes unsupported".to_owned()));
            };
            let pages = *self.library.get(&path).ok_or_else(|| {
                PdfEngineError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
            })?;

            self.next += 1;
            let handle = DocumentHandle::from_raw((self.next << 8) | u64::from(pages));
            self.open.borrow_mut().push(handle);
            Ok(handle)
        }

        fn page_count(&self, handle: DocumentHandle) -> Result<u32, PdfEngineError> {
            self.pages_of(handle)
        }

        fn page_size(
            &self,
            handle: DocumentHandle,
            _page_index: u32,
        ) -> Result<PageSize, PdfEngineError> {
            self.pages_of(handle)?;
            if self.fail_page_sizes.get() {
                return Err(PdfEngineError::Backend("unreadable page box".to_owned()));
            }
            Ok(PageSize { width_pt: 400.0, height_pt: 600.0 })
        }

        fn render_page(
            &self,
            handle: DocumentHandle,
            request: RenderRequest,
        ) -> Result<RgbaImage, PdfEngineError> {
            self.pages_of(handle)?;
            if self.fail_renders.get() {
                return Err(PdfEngineError::Backend("corrupt page".to_owned()));
            }
            let (width, height) =
                PageSize { width_pt: 400.0, height_pt: 600.0 }.scaled_pixels(request.scale)?;
            Ok(RgbaImage::new(width, height))
        }

        fn close(&mut self, handle: DocumentHandle) -> Result<(), PdfEngineError> {
            let mut open = self.open.borrow_mut();
            let index = open
                .iter()
                .position(|candidate| *candidate == handle)
                .ok_or(PdfEngineError::InvalidHandle(handle.raw()))?;
            open.remove(index);
            Ok(())
        }
    }

    fn viewer() -> Viewer<FakeEngine> {
        Viewer::new(
            FakeEngine::default().with_document("/docs/five.pdf", 5).with_document("/docs/two.pdf", 2),
        )
    }

    #[test]
    fn opening_five_page_document_resets_state() {
        let mut viewer = viewer();
        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");

        let state = viewer.state();
        assert_eq!(state.page_count(), 5);
        assert_eq!(state.current_page(), 0);
        assert_eq!(state.zoom(), 1.0);

        let page = viewer.rendered_page().expect("first page should be rendered");
        assert_eq!(page.page_index, 0);
        assert_eq!((page.image.width(), page.image.height()), (400, 600));
    }

    #[test]
    fn failed_open_keeps_previous_document() {
        let mut viewer = viewer();
        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        viewer.apply(ViewerAction::NextPage).expect("next should render");
        viewer.apply(ViewerAction::ZoomIn).expect("zoom should render");
        let before = viewer.state().clone();

        let err = viewer
            .open_document(Path::new("/docs/missing.pdf"))
            .expect_err("missing file should not open");

        assert!(matches!(err, ViewerError::DocumentOpen { .. }));
        assert_eq!(viewer.state(), &before);
        assert_eq!(viewer.source(), Some(Path::new("/docs/five.pdf")));
    }

    #[test]
    fn opening_another_document_releases_the_first() {
        let mut viewer = viewer();
        let open = Rc::clone(&viewer.engine().open);

        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        viewer.open_document(Path::new("/docs/two.pdf")).expect("open should succeed");

        assert_eq!(open.borrow().len(), 1);
        assert_eq!(viewer.state().page_count(), 2);
    }

    #[test]
    fn dropping_viewer_releases_open_document() {
        let mut viewer = viewer();
        let open = Rc::clone(&viewer.engine().open);
        viewer.open_document(Path::new("/docs/two.pdf")).expect("open should succeed");
        assert_eq!(open.borrow().len(), 1);

        drop(viewer);
        assert!(open.borrow().is_empty());
    }

    #[test]
    fn zero_page_document_is_rejected_and_released() {
        let mut viewer = Viewer::new(FakeEngine::default().with_document("/docs/empty.pdf", 0));
        let open = Rc::clone(&viewer.engine().open);

        let err = viewer
            .open_document(Path::new("/docs/empty.pdf"))
            .expect_err("empty document should be rejected");

        assert!(matches!(
            err,
            ViewerError::DocumentOpen { source: PdfEngineError::NoPages, .. }
        ));
        assert!(open.borrow().is_empty());
        assert!(!viewer.state().has_document());
    }

    #[test]
    fn actions_render_new_page() {
        let mut viewer = viewer();
        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        let first_generation = viewer.rendered_page().map(|page| page.generation);

        assert!(viewer.apply(ViewerAction::NextPage).expect("next should render"));
        assert!(viewer.apply(ViewerAction::ZoomIn).expect("zoom should render"));

        let page = viewer.rendered_page().expect("page should be rendered");
        assert_eq!(page.page_index, 1);
        assert_eq!(page.zoom, 1.25);
        assert_eq!(page.image.width(), 500);
        assert!(Some(page.generation) > first_generation);
    }

    #[test]
    fn noop_action_does_not_render() {
        let mut viewer = viewer();
        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        let generation = viewer.rendered_page().map(|page| page.generation);

        assert!(!viewer.apply(ViewerAction::PreviousPage).expect("noop should succeed"));
        assert_eq!(viewer.rendered_page().map(|page| page.generation), generation);
    }

    #[test]
    fn render_failure_restores_previous_state() {
        let mut viewer = viewer();
        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        let fail = Rc::clone(&viewer.engine().fail_renders);
        fail.set(true);

        let err = viewer.apply(ViewerAction::NextPage).expect_err("render should fail");

        assert!(matches!(err, ViewerError::PageRender { page: 1, .. }));
        assert_eq!(viewer.state().current_page(), 0);
        assert_eq!(viewer.rendered_page().map(|page| page.page_index), Some(0));

        fail.set(false);
        assert!(viewer.apply(ViewerAction::NextPage).expect("render should recover"));
        assert_eq!(viewer.state().current_page(), 1);
    }

    #[test]
    fn first_page_render_failure_keeps_new_document_open() {
        let mut viewer = viewer();
        let open = Rc::clone(&viewer.engine().open);
        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        let previous = viewer.state().document();

        viewer.engine().fail_renders.set(true);
        let err = viewer
            .open_document(Path::new("/docs/two.pdf"))
            .expect_err("first page should fail to render");

        assert!(matches!(err, ViewerError::PageRender { page: 0, .. }));
        assert!(viewer.state().has_document());
        assert_ne!(viewer.state().document(), previous);
        assert_eq!(viewer.state().page_count(), 2);
        assert_eq!(viewer.state().current_page(), 0);
        assert_eq!(viewer.source(), Some(Path::new("/docs/two.pdf")));
        assert!(viewer.rendered_page().is_none());

        let open = open.borrow();
        assert_eq!(open.len(), 1);
        assert!(!open.contains(&previous.expect("first document was open")));
    }

    #[test]
    fn fit_to_width_page_size_failure_leaves_state_unchanged() {
        let mut viewer = viewer();
        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        viewer.apply(ViewerAction::ZoomIn).expect("zoom should render");
        let before = viewer.state().clone();
        let generation = viewer.rendered_page().map(|page| page.generation);

        viewer.engine().fail_page_sizes.set(true);
        let err = viewer
            .apply(ViewerAction::FitToWidth { viewport_width: 800.0 })
            .expect_err("page size lookup should fail");

        assert!(matches!(err, ViewerError::PageRender { page: 0, .. }));
        assert_eq!(viewer.state(), &before);
        assert_eq!(viewer.rendered_page().map(|page| page.generation), generation);
    }

    #[test]
    fn fit_to_width_uses_native_page_width() {
        let mut viewer = viewer();
        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        viewer.apply(ViewerAction::ZoomIn).expect("zoom should render");

        viewer
            .apply(ViewerAction::FitToWidth { viewport_width: 800.0 })
            .expect("fit should render");

        assert_eq!(viewer.state().zoom(), 2.0);
    }

    #[test]
    fn fit_to_width_without_document_is_noop() {
        let mut viewer = viewer();
        let changed = viewer
            .apply(ViewerAction::FitToWidth { viewport_width: 800.0 })
            .expect("noop should succeed");

        assert!(!changed);
        assert_eq!(viewer.state().zoom(), 1.0);
    }

    #[test]
    fn zoom_without_document_changes_state_only() {
        let mut viewer = viewer();

        assert!(viewer.apply(ViewerAction::ZoomIn).expect("zoom should succeed"));
        assert_eq!(viewer.state().zoom(), 1.25);
        assert!(viewer.rendered_page().is_none());
    }

    #[test]
    fn opened_notice_names_file() {
        let mut viewer = viewer();
        assert_eq!(viewer.opened_notice(), None);

        viewer.open_document(Path::new("/docs/five.pdf")).expect("open should succeed");
        assert_eq!(viewer.opened_notice().as_deref(), Some("Opened five.pdf - 5 pages"));
    }
}
