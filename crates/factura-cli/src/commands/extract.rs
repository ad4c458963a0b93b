use factura_core::error::FacturaError;
use factura_core::model::DocumentExtraction;
use factura_core::ocr::hocr::parse_hocr;
use factura_core::ocr::tesseract::{TesseractExtractor, DEFAULT_DPI};
use factura_core::ocr::tsv::parse_tsv;
use factura_core::ocr::OcrPage;
use factura_core::template::builtin::{self, DEFAULT_PRESET};
use factura_core::template::schema::TemplateDef;
use std::path::{Path, PathBuf};

use crate::commands::Outcome;
use crate::output;

pub struct ExtractArgs {
    pub input_file: PathBuf,
    pub template: Option<String>,
    pub template_file: Option<PathBuf>,
    pub dpi: Option<u32>,
    pub lang: String,
    pub psm: Option<u8>,
    pub output: Option<String>,
    pub out: Option<PathBuf>,
    pub verbose: bool,
}

enum InputKind {
    Pdf,
    Tsv,
    Hocr,
}

fn input_kind(path: &Path) -> InputKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("tsv") => InputKind::Tsv,
        Some("hocr" | "html" | "htm" | "xhtml") => InputKind::Hocr,
        _ => InputKind::Pdf,
    }
}

pub fn run(args: ExtractArgs) -> Result<Outcome, FacturaError> {
    let template = resolve_template(args.template.as_deref(), args.template_file.as_deref())?;
    tracing::info!(
        template = %template.name,
        input = %args.input_file.display(),
        "extracting"
    );

    let doc = match input_kind(&args.input_file) {
        InputKind::Pdf => {
            let pdf_bytes = std::fs::read(&args.input_file)?;
            let mut extractor = TesseractExtractor::new()
                .with_dpi(args.dpi.unwrap_or(DEFAULT_DPI))
                .with_language(&args.lang);
            if let Some(psm) = args.psm {
                extractor = extractor.with_psm(psm);
            }
            factura_core::extract_pdf(&pdf_bytes, &extractor, &template)?
        }
        InputKind::Tsv => {
            let text = std::fs::read_to_string(&args.input_file)?;
            let pages = with_dpi(parse_tsv(&text)?, args.dpi);
            factura_core::extract_pages(&pages, &template)
        }
        InputKind::Hocr => {
            let text = std::fs::read_to_string(&args.input_file)?;
            let pages = with_dpi(parse_hocr(&text)?, args.dpi);
            factura_core::extract_pages(&pages, &template)
        }
    };

    report_warnings(&doc, args.verbose);

    if doc.is_empty() {
        return Ok(Outcome::NoData);
    }

    let format = output_format(args.output.as_deref(), args.out.as_deref());
    let rendered = render(&doc, format)?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            eprintln!(
                "Extracted {} row(s) from {} page(s), written to {}",
                doc.row_count(),
                doc.pages.len(),
                path.display()
            );
        }
        None => print!("{}", String::from_utf8_lossy(&rendered)),
    }

    Ok(Outcome::Done)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Table,
    Json,
    Csv,
}

/// An explicit `-o` always wins; otherwise a file's extension picks CSV or JSON.
fn output_format(output: Option<&str>, out: Option<&Path>) -> Format {
    match (output, out) {
        (Some("json"), _) => Format::Json,
        (Some("csv"), _) => Format::Csv,
        (Some(_), _) | (None, None) => Format::Table,
        (None, Some(path)) => {
            if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv")) {
                Format::Csv
            } else {
                Format::Json
            }
        }
    }
}

fn render(doc: &DocumentExtraction, format: Format) -> Result<Vec<u8>, FacturaError> {
    Ok(match format {
        Format::Table => format!("{}\n", output::table::format_document(doc)).into_bytes(),
        Format::Json => format!("{}\n", output::json::render(doc)?).into_bytes(),
        Format::Csv => output::csv::render(doc)?,
    })
}

fn resolve_template(
    preset: Option<&str>,
    file: Option<&Path>,
) -> Result<TemplateDef, FacturaError> {
    match file {
        Some(path) => factura_core::template::load_template(path),
        None => builtin::load_preset(preset.unwrap_or(DEFAULT_PRESET)),
    }
}

/// Attach the scan DPI to pages parsed from text OCR output.
fn with_dpi(mut pages: Vec<OcrPage>, dpi: Option<u32>) -> Vec<OcrPage> {
    if let Some(dpi) = dpi {
        for page in &mut pages {
            page.geometry.dpi = Some(dpi);
        }
    }
    pages
}

fn report_warnings(doc: &DocumentExtraction, verbose: bool) {
    if doc.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", doc.warnings.len());
    if verbose {
        for w in &doc.warnings {
            eprintln!("  - [{}] {}", w.code, w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_format_wins_over_extension() {
        let out = Path::new("out.txt");
        assert_eq!(output_format(Some("csv"), Some(out)), Format::Csv);
        assert_eq!(output_format(Some("json"), Some(Path::new("rows.csv"))), Format::Json);
        assert_eq!(output_format(Some("table"), Some(out)), Format::Table);
    }

    #[test]
    fn test_extension_picks_file_format() {
        assert_eq!(output_format(None, Some(Path::new("rows.CSV"))), Format::Csv);
        assert_eq!(output_format(None, Some(Path::new("rows.json"))), Format::Json);
        assert_eq!(output_format(None, Some(Path::new("rows"))), Format::Json);
    }

    #[test]
    fn test_stdout_defaults_to_table() {
        assert_eq!(output_format(None, None), Format::Table);
        assert_eq!(output_format(Some("csv"), None), Format::Csv);
    }
}
