pub mod audit;
pub mod error;
pub mod model;
pub mod ocr;
pub mod parsing;
pub mod reconstruct;
pub mod template;

use error::FacturaError;
use model::{AnchorSource, DocumentExtraction, PageExtraction};
use ocr::{OcrPage, WordExtractor};
use rayon::prelude::*;
use reconstruct::index::WordIndex;
use template::layout::ResolvedLayout;
use template::schema::{DuplicateFilter, TemplateDef};

/// Main API entry point: OCR a PDF and reconstruct its table rows.
///
/// Extractor errors propagate; reconstruction itself never fails, so a
/// document without a recognizable table yields an empty extraction.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn WordExtractor,
    template: &TemplateDef,
) -> Result<DocumentExtraction, FacturaError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::info!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "OCR finished"
    );
    Ok(extract_pages(&pages, template))
}

/// Reconstruct every page in parallel. Output keeps page order.
pub fn extract_pages(pages: &[OcrPage], template: &TemplateDef) -> DocumentExtraction {
    let pages: Vec<PageExtraction> = pages
        .par_iter()
        .map(|page| extract_page(page, template))
        .collect();

    let warnings = pages.iter().flat_map(audit::audit_page).collect();

    DocumentExtraction {
        template: template.name.clone(),
        pages,
        warnings,
    }
}

/// Reconstruct the table rows of a single OCR page.
pub fn extract_page(page: &OcrPage, template: &TemplateDef) -> PageExtraction {
    let index = WordIndex::from_raw(&page.words);

    if let Some(ref filter) = template.duplicate_filter {
        if is_duplicate_copy(&index, filter) {
            tracing::warn!(page = page.page_number, "skipping duplicate copy");
            return PageExtraction {
                page_number: page.page_number,
                anchor_source: AnchorSource::None,
                skipped: true,
                rows: Vec::new(),
            };
        }
    }

    let layout = ResolvedLayout::resolve(template, &page.geometry);
    let result = reconstruct::reconstruct_indexed(&index, &layout);
    tracing::info!(
        page = page.page_number,
        rows = result.rows.len(),
        source = %result.source,
        "page reconstructed"
    );

    PageExtraction {
        page_number: page.page_number,
        anchor_source: result.source,
        skipped: false,
        rows: result.rows,
    }
}

/// A page is a duplicate copy when it mentions a skip marker and no keep marker.
///
/// Markers match whole words, case-insensitively, ignoring surrounding punctuation:
/// `-Duplicado-` matches `DUPLICADO`, `COPIADORA` does not match `COPIA`.
fn is_duplicate_copy(index: &WordIndex, filter: &DuplicateFilter) -> bool {
    let page_tokens: Vec<String> = index.words().iter().flat_map(|w| tokens(&w.text)).collect();
    let mentions = |markers: &[String]| {
        markers
            .iter()
            .map(|m| tokens(m).collect::<Vec<_>>())
            .filter(|m| !m.is_empty())
            .any(|marker| page_tokens.windows(marker.len()).any(|w| w == marker.as_slice()))
    };
    mentions(&filter.skip_markers) && !mentions(&filter.keep_markers)
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageGeometry, WordBox};

    fn filter() -> DuplicateFilter {
        DuplicateFilter {
            skip_markers: vec!["Duplicado".into()],
            keep_markers: vec!["Original".into()],
        }
    }

    fn index(texts: &[&str]) -> WordIndex {
        WordIndex::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| WordBox::new(*t, 10, i as i32 * 30, 50, 20))
                .collect(),
        )
    }

    #[test]
    fn test_duplicate_marker_case_insensitive() {
        assert!(is_duplicate_copy(&index(&["Factura", "DUPLICADO"]), &filter()));
        assert!(is_duplicate_copy(&index(&["-duplicado-"]), &filter()));
    }

    #[test]
    fn test_keep_marker_wins() {
        assert!(!is_duplicate_copy(
            &index(&["ORIGINAL", "Duplicado"]),
            &filter()
        ));
    }

    #[test]
    fn test_marker_inside_longer_word_is_ignored() {
        let filter = DuplicateFilter {
            skip_markers: vec!["COPIA".into()],
            keep_markers: Vec::new(),
        };
        assert!(!is_duplicate_copy(
            &index(&["2", "COPIADORA", "CANON", "IR2520"]),
            &filter
        ));
        assert!(!is_duplicate_copy(&index(&["Fotocopias"]), &filter));
        assert!(is_duplicate_copy(&index(&["(Copia)"]), &filter));
    }

    #[test]
    fn test_multi_word_marker() {
        let filter = DuplicateFilter {
            skip_markers: vec!["Copia cliente".into()],
            keep_markers: Vec::new(),
        };
        assert!(is_duplicate_copy(&index(&["COPIA", "CLIENTE:"]), &filter));
        assert!(!is_duplicate_copy(&index(&["Cliente", "copia"]), &filter));
    }

    #[test]
    fn test_no_marker_is_kept() {
        assert!(!is_duplicate_copy(&index(&["Factura", "Comercial"]), &filter()));
    }

    #[test]
    fn test_skipped_page_has_no_rows() {
        let template = template::builtin::load_preset("regal").unwrap();
        let page = OcrPage {
            page_number: 2,
            geometry: PageGeometry::new(1600, 1000),
            words: vec![ocr::RawWord {
                text: "DUPLICADO".into(),
                left: 700,
                top: 50,
                width: 200,
                height: 30,
                confidence: Some(91.0),
            }],
        };
        let result = extract_page(&page, &template);
        assert!(result.skipped);
        assert!(result.rows.is_empty());
    }
}
