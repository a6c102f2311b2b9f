use pdf_engine::PdfEngineError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The file is missing, unreadable, or not a usable document.
    #[error("could not open {}: {source}", path.display())]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: PdfEngineError,
    },

    /// The engine failed to produce the current page at the current zoom.
    #[error("failed to render page {}: {source}", page + 1)]
    PageRender {
        page: u32,
        #[source]
        source: PdfEngineError,
    },
}
