//! The viewer window.

use crate::engine::DynEngine;
use crate::keymap::{self, BOUND_KEYS};
use eframe::egui;
use std::path::{Path, PathBuf};
use viewer_core::{Viewer, ViewerAction, ViewerError};

/// Room left for the vertical scrollbar when fitting a page to the window width.
const SCROLLBAR_ALLOWANCE: f32 = 20.0;

const PLACEHOLDER: &str = "Click 'Open PDF' to open a document";

/// Uploaded copy of the viewer's last rendered page.
struct PageTexture {
    handle: egui::TextureHandle,
    generation: u64,
    size: egui::Vec2,
}

/// Error dialog state
struct ErrorDialogState {
    title: String,
    message: String,
}

pub struct PdfViewerApp {
    viewer: Viewer<DynEngine>,
    page_texture: Option<PageTexture>,

    // Shown in the status bar instead of the page status until the next change.
    notice: Option<String>,

    // Width of the page area on the last frame, for fit-to-width.
    viewport_width: f32,

    error_dialog: Option<ErrorDialogState>,
}

impl PdfViewerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        viewer: Viewer<DynEngine>,
        startup_file: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            viewer,
            page_texture: None,
            notice: None,
            viewport_width: 0.0,
            error_dialog: None,
        };

        if let Some(path) = startup_file {
            app.load_pdf(&path);
        }

        app
    }

    /// Open a PDF file using the file picker
    fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Select PDF File")
            .add_filter("PDF Files", &["pdf"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_pdf(&path);
        }
    }

    fn load_pdf(&mut self, path: &Path) {
        match self.viewer.open_document(path) {
            Ok(()) => self.notice = self.viewer.opened_notice(),
            Err(err) => {
                // A page that fails to render still leaves the new document open.
                if matches!(err, ViewerError::PageRender { .. }) {
                    self.notice = self.viewer.opened_notice();
                }
                self.report(err);
            }
        }
    }

    fn dispatch(&mut self, action: ViewerAction) {
        match self.viewer.apply(action) {
            Ok(true) => self.notice = None,
            Ok(false) => {}
            Err(err) => self.report(err),
        }
    }

    fn report(&mut self, err: ViewerError) {
        tracing::error!(%err, "viewer action failed");

        let message = match &err {
            ViewerError::DocumentOpen { .. } => format!("Could not open PDF file:\n{err}"),
            ViewerError::PageRender { .. } => format!("Error while displaying page:\n{err}"),
        };
        self.error_dialog = Some(ErrorDialogState { title: "Error".to_owned(), message });
    }

    /// The error dialog blocks every other control until it is dismissed.
    fn accepts_input(&self) -> bool {
        self.error_dialog.is_none()
    }

    fn fit_width(&self) -> f32 {
        (self.viewport_width - SCROLLBAR_ALLOWANCE).max(1.0)
    }

    fn status_text(&self) -> String {
        self.notice.clone().unwrap_or_else(|| self.viewer.state().status_text())
    }

    fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some(page) = self.viewer.rendered_page() else {
            self.page_texture = None;
            return;
        };

        if self.page_texture.as_ref().is_some_and(|texture| texture.generation == page.generation) {
            return;
        }

        let size = [page.image.width() as usize, page.image.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, page.image.as_raw());
        let handle = ctx.load_texture("page", image, egui::TextureOptions::LINEAR);

        self.page_texture = Some(PageTexture {
            handle,
            generation: page.generation,
            size: egui::vec2(size[0] as f32, size[1] as f32),
        });
    }
}

impl eframe::App for PdfViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard_shortcuts(ctx);
        self.draw_toolbar(ctx);
        self.draw_status_bar(ctx);
        self.draw_viewport(ctx);
        self.draw_error_dialog(ctx);
    }
}

impl PdfViewerApp {
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        if !self.accepts_input() {
            if ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)) {
                self.error_dialog = None;
            }
            return;
        }

        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::O)) {
            self.open_file();
            return;
        }

        let pressed: Vec<egui::Key> = ctx.input(|i| {
            if i.modifiers.command || i.modifiers.ctrl {
                return Vec::new();
            }
            BOUND_KEYS.iter().copied().filter(|key| i.key_pressed(*key)).collect()
        });

        for key in pressed {
            if let Some(action) = keymap::action_for_key(key, self.fit_width()) {
                self.dispatch(action);
            }
        }
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        let mut open = false;
        let mut pending = None;
        let state = self.viewer.state();
        let fit_width = self.fit_width();
        let enabled = self.accepts_input();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("📂 Open PDF").clicked() {
                        open = true;
                    }

                    ui.separator();

                    if ui.add_enabled(state.can_go_previous(), egui::Button::new("◀ Previous")).clicked()
                    {
                        pending = Some(ViewerAction::PreviousPage);
                    }
                    if ui.add_enabled(state.can_go_next(), egui::Button::new("Next ▶")).clicked() {
                        pending = Some(ViewerAction::NextPage);
                    }

                    // Laid out right to left.
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add_enabled(state.can_fit_width(), egui::Button::new("Fit Width")).clicked()
                        {
                            pending = Some(ViewerAction::FitToWidth { viewport_width: fit_width });
                        }

                        let can_zoom_in = state.has_document() && state.can_zoom_in();
                        if ui.add_enabled(can_zoom_in, egui::Button::new("🔍+")).clicked() {
                            pending = Some(ViewerAction::ZoomIn);
                        }

                        let height = ui.available_height();
                        ui.add_sized([50.0, height], egui::Label::new(state.zoom_label()));

                        let can_zoom_out = state.has_document() && state.can_zoom_out();
                        if ui.add_enabled(can_zoom_out, egui::Button::new("🔍−")).clicked() {
                            pending = Some(ViewerAction::ZoomOut);
                        }
                    });
                });
            });
        });

        if open {
            self.open_file();
        }
        if let Some(action) = pending {
            self.dispatch(action);
        }
    }

    fn draw_status_bar(&mut self, ctx: &egui::Context) {
        let text = self.status_text();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(text);
        });
    }

    fn draw_viewport(&mut self, ctx: &egui::Context) {
        self.sync_texture(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.viewport_width = ui.available_width();

            let Some(texture) = &self.page_texture else {
                ui.centered_and_justified(|ui| {
                    if self.viewer.state().has_document() {
                        ui.weak("No page to display");
                    } else {
                        ui.heading(PLACEHOLDER);
                    }
                });
                return;
            };

            egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.image((texture.handle.id(), texture.size));
                });
            });
        });
    }

    fn draw_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(error) = &self.error_dialog else {
            return;
        };

        let mut should_close = false;
        let modal = egui::Modal::new(egui::Id::new("error_dialog")).show(ctx, |ui| {
            ui.set_max_width(420.0);
            ui.heading(error.title.as_str());
            ui.add_space(8.0);
            ui.label(error.message.as_str());
            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                if ui.button("OK").clicked() {
                    should_close = true;
                }
            });
        });

        if should_close || modal.should_close() {
            self.error_dialog = None;
        }
    }
}
