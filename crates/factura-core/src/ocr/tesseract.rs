use crate::error::FacturaError;
use crate::ocr::tsv::parse_tsv;
use crate::ocr::{OcrPage, WordExtractor};
use std::path::PathBuf;
use std::process::Command;

pub const DEFAULT_DPI: u32 = 300;

/// OCR backend using pdftoppm (from poppler-utils) and the tesseract CLI.
///
/// Pages are rasterized to PNG at `dpi`, then each image is run through
/// `tesseract ... tsv` to get word-level boxes.
pub struct TesseractExtractor {
    dpi: u32,
    language: String,
    psm: u8,
}

impl TesseractExtractor {
    pub fn new() -> Self {
        TesseractExtractor {
            dpi: DEFAULT_DPI,
            language: "eng".to_string(),
            // Single uniform block: keeps table rows on one line.
            psm: 6,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = psm;
        self
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    fn rasterize(&self, workdir: &std::path::Path) -> Result<Vec<PathBuf>, FacturaError> {
        let pdf_path = workdir.join("input.pdf");
        let prefix = workdir.join("page");

        run_tool(
            "pdftoppm",
            Command::new("pdftoppm")
                .arg("-r")
                .arg(self.dpi.to_string())
                .arg("-png")
                .arg(&pdf_path)
                .arg(&prefix),
        )?;

        // pdftoppm zero-pads page numbers to a common width, so a lexical
        // sort is page order.
        let mut images: Vec<PathBuf> = std::fs::read_dir(workdir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                let is_png = path.extension().is_some_and(|ext| ext == "png");
                let is_page = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("page"));
                is_png && is_page
            })
            .collect();
        images.sort();
        Ok(images)
    }

    fn recognize(&self, image: &std::path::Path) -> Result<OcrPage, FacturaError> {
        let stdout = run_tool(
            "tesseract",
            Command::new("tesseract")
                .arg(image)
                .arg("stdout")
                .arg("--dpi")
                .arg(self.dpi.to_string())
                .arg("-l")
                .arg(&self.language)
                .arg("--psm")
                .arg(self.psm.to_string())
                .arg("tsv"),
        )?;

        let tsv = String::from_utf8_lossy(&stdout);
        parse_tsv(&tsv)?
            .into_iter()
            .next()
            .ok_or_else(|| FacturaError::Ocr(format!("no OCR output for {}", image.display())))
    }
}

impl Default for TesseractExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl WordExtractor for TesseractExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<OcrPage>, FacturaError> {
        let workdir = tempfile::tempdir().map_err(|e| FacturaError::Ocr(e.to_string()))?;
        std::fs::write(workdir.path().join("input.pdf"), pdf_bytes)?;

        let images = self.rasterize(workdir.path())?;
        if images.is_empty() {
            return Err(FacturaError::Ocr("pdftoppm produced no page images".into()));
        }

        let mut pages = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let mut page = self.recognize(image)?;
            page.page_number = i + 1;
            page.geometry.dpi = Some(self.dpi);
            tracing::debug!(
                page = page.page_number,
                words = page.words.len(),
                width = page.geometry.width,
                height = page.geometry.height,
                "recognized page"
            );
            pages.push(page);
        }

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "tesseract"
    }
}

fn run_tool(tool: &str, command: &mut Command) -> Result<Vec<u8>, FacturaError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FacturaError::ToolNotFound {
                tool: tool.to_string(),
            }
        } else {
            FacturaError::Ocr(format!("{tool} failed: {e}"))
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(FacturaError::ToolFailed {
            tool: tool.to_string(),
            code,
            stderr,
        });
    }

    Ok(output.stdout)
}
