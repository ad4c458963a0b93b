pub mod hocr;
pub mod tesseract;
pub mod tsv;

use crate::error::FacturaError;
use crate::model::PageGeometry;
use serde::{Deserialize, Serialize};

/// One word as reported by an OCR engine, before any filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// Engine confidence; negative values (Tesseract uses -1) mark failed entries.
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// OCR output for a single rasterized page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPage {
    pub page_number: usize,
    pub geometry: PageGeometry,
    pub words: Vec<RawWord>,
}

/// Trait for OCR backends that turn PDF bytes into per-page word boxes.
pub trait WordExtractor: Send + Sync {
    /// Rasterize and OCR the PDF, returning one OcrPage per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<OcrPage>, FacturaError>;

    /// Name of this OCR backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
