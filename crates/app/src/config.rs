//! Command-line and environment configuration.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which renderer draws the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// PDFium when the library can be found, page outlines otherwise.
    #[default]
    Auto,
    /// PDFium only; startup fails without the library.
    Pdfium,
    /// Page outlines from document geometry, no rasterization library needed.
    Outline,
}

#[derive(Debug, Parser)]
#[command(name = "pdf-viewer")]
#[command(version, about = "View PDF documents page by page")]
pub struct AppConfig {
    /// PDF file to open at startup
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Page renderer
    #[arg(long, value_enum, env = "PDF_VIEWER_BACKEND", default_value_t = Backend::Auto)]
    pub backend: Backend,

    /// Directory containing the PDFium shared library
    #[arg(long, value_name = "DIR", env = "PDF_VIEWER_PDFIUM_DIR")]
    pub pdfium_dir: Option<PathBuf>,
}
