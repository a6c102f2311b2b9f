//! PDFium-backed rasterization.

use crate::{
    DocumentHandle, OpenSource, PageSize, PdfEngine, PdfEngineError, RenderRequest, RgbaImage,
};
use pdfium_render::prelude::{PdfDocument, PdfPage, PdfRenderConfig, Pdfium};
use std::collections::HashMap;
use std::path::Path;

pub struct PdfiumEngine {
    // Documents borrow the bindings, so the bindings live for the whole process.
    pdfium: &'static Pdfium,
    next_handle: u64,
    docs: HashMap<DocumentHandle, PdfDocument<'static>>,
}

impl PdfiumEngine {
    /// Binds the PDFium shared library.
    ///
    /// Search order:
    /// 1. `library_dir`, when given
    /// 2. The executable's directory (app bundles ship the library next to the binary)
    /// 3. The current working directory
    /// 4. System library paths
    pub fn bind(library_dir: Option<&Path>) -> Result<Self, PdfEngineError> {
        let pdfium = Box::leak(Box::new(Pdfium::new(Self::bind_library(library_dir)?)));

        Ok(Self { pdfium, next_handle: 0, docs: HashMap::new() })
    }

    fn bind_library(
        library_dir: Option<&Path>,
    ) -> Result<Box<dyn pdfium_render::prelude::PdfiumLibraryBindings>, PdfEngineError> {
        let exe_dir =
            std::env::current_exe().ok().and_then(|path| path.parent().map(Path::to_path_buf));

        let candidates = library_dir
            .map(Path::to_path_buf)
            .into_iter()
            .chain(exe_dir)
            .chain(std::iter::once(Path::new("./").to_path_buf()));

        for dir in candidates {
            match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)) {
                Ok(bindings) => {
                    tracing::debug!(dir = %dir.display(), "pdfium: bound library");
                    return Ok(bindings);
                }
                Err(err) => {
                    tracing::debug!(dir = %dir.display(), %err, "pdfium: library not found");
                }
            }
        }

        Pdfium::bind_to_system_library().map_err(|err| {
            PdfEngineError::Backend(format!("failed to bind pdfium library: {err}"))
        })
    }

    fn document(&self, handle: DocumentHandle) -> Result<&PdfDocument<'static>, PdfEngineError> {
        self.docs.get(&handle).ok_or(PdfEngineError::InvalidHandle(handle.raw()))
    }

    fn page(&self, handle: DocumentHandle, page_index: u32) -> Result<PdfPage<'_>, PdfEngineError> {
        let document = self.document(handle)?;
        let page_count = u32::from(document.pages().len());

        if page_index >= page_count {
            return Err(PdfEngineError::PageOutOfRange { page: page_index, page_count });
        }

        // page_count came from a u16, so the index fits.
        document
            .pages()
            .get(page_index as u16)
            .map_err(|err| PdfEngineError::Backend(err.to_string()))
    }
}

impl PdfEngine for PdfiumEngine {
    fn open(&mut self, source: OpenSource) -> Result<DocumentHandle, PdfEngineError> {
        let bytes = source.into_bytes()?;
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .map_err(|err| PdfEngineError::Backend(err.to_string()))?;

        if document.pages().len() == 0 {
            return Err(PdfEngineError::NoPages);
        }

        self.next_handle += 1;
        let handle = DocumentHandle(self.next_handle);
        tracing::debug!(
            handle = handle.raw(),
            pages = document.pages().len(),
            "pdfium: opened document"
        );
        self.docs.insert(handle, document);

        Ok(handle)
    }

    fn page_count(&self, handle: DocumentHandle) -> Result<u32, PdfEngineError> {
        Ok(u32::from(self.document(handle)?.pages().len()))
    }

    fn page_size(
        &self,
        handle: DocumentHandle,
        page_index: u32,
    ) -> Result<PageSize, PdfEngineError> {
        let page = self.page(handle, page_index)?;
        Ok(PageSize { width_pt: page.width().value, height_pt: page.height().value })
    }

    fn render_page(
        &self,
        handle: DocumentHandle,
        request: RenderRequest,
    ) -> Result<RgbaImage, PdfEngineError> {
        let scale = request.validated_scale()?;
        let page = self.page(handle, request.page_index)?;
        let size = PageSize { width_pt: page.width().value, height_pt: page.height().value };
        let (width, height) = size.scaled_pixels(scale)?;

        let config = PdfRenderConfig::new()
            .set_target_width(target_dimension(width)?)
            .set_target_height(target_dimension(height)?);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|err| PdfEngineError::Backend(err.to_string()))?;

        RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes().to_vec()).ok_or_else(|| {
            PdfEngineError::Backend(format!(
                "pdfium returned a bitmap that does not match {width}x{height}"
            ))
        })
    }

    fn close(&mut self, handle: DocumentHandle) -> Result<(), PdfEngineError> {
        self.docs.remove(&handle).map(|_| ()).ok_or(PdfEngineError::InvalidHandle(handle.raw()))
    }
}

fn target_dimension(pixels: u32) -> Result<i32, PdfEngineError> {
    i32::try_from(pixels)
        .map_err(|_| PdfEngineError::Backend(format!("render target of {pixels}px is out of range")))
}
