//! Renderer selection.

use crate::config::{AppConfig, Backend};
use anyhow::Context;
use pdf_engine::pdfium_backend::PdfiumEngine;
use pdf_engine::{LopdfEngine, PdfEngine};

pub type DynEngine = Box<dyn PdfEngine>;

pub fn select(config: &AppConfig) -> anyhow::Result<DynEngine> {
    let pdfium_dir = config.pdfium_dir.as_deref();

    match config.backend {
        Backend::Outline => {
            tracing::info!("using page outline renderer");
            Ok(Box::new(LopdfEngine::new()))
        }
        Backend::Pdfium => {
            let engine = PdfiumEngine::bind(pdfium_dir).context("PDFium backend requested")?;
            tracing::info!("using PDFium renderer");
            Ok(Box::new(engine))
        }
        Backend::Auto => match PdfiumEngine::bind(pdfium_dir) {
            Ok(engine) => {
                tracing::info!("using PDFium renderer");
                Ok(Box::new(engine))
            }
            Err(err) => {
                tracing::warn!(%err, "PDFium unavailable, falling back to page outlines");
                Ok(Box::new(LopdfEngine::new()))
            }
        },
    }
}
