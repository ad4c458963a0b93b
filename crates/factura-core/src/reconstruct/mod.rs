//! Coordinate-based table reconstruction.
//!
//! Four stages run once per page, in order, with no feedback between them:
//! word index, anchor detection, row segmentation, cell assembly.

pub mod anchors;
pub mod bands;
pub mod cells;
pub mod index;

use crate::model::{AnchorSource, ExtractedRow, PageGeometry, RowAnchor, RowBand, WordBox};
use crate::template::layout::ResolvedLayout;
use crate::template::schema::TemplateDef;
use index::WordIndex;

/// Everything the reconstruction produced for one page.
#[derive(Debug, Clone)]
pub struct PageRows {
    pub anchors: Vec<RowAnchor>,
    pub bands: Vec<RowBand>,
    pub rows: Vec<ExtractedRow>,
    pub source: AnchorSource,
    pub candidates: usize,
}

/// Reconstruct the table rows of a page from its word boxes.
///
/// Pure: the same words, geometry and template always give the same rows.
pub fn reconstruct(words: Vec<WordBox>, geometry: &PageGeometry, template: &TemplateDef) -> PageRows {
    let layout = ResolvedLayout::resolve(template, geometry);
    let index = WordIndex::new(words);
    reconstruct_indexed(&index, &layout)
}

pub(crate) fn reconstruct_indexed(index: &WordIndex, layout: &ResolvedLayout) -> PageRows {
    let detection = anchors::detect_anchors(index, layout);
    let bands = bands::segment_rows(&detection.anchors, layout);
    tracing::debug!(
        words = index.len(),
        anchors = detection.anchors.len(),
        bands = bands.len(),
        source = %detection.source,
        "segmented rows"
    );

    let rows = detection
        .anchors
        .iter()
        .zip(&bands)
        .map(|(anchor, band)| cells::assemble_row(anchor, band, index, layout))
        .collect();

    PageRows {
        anchors: detection.anchors,
        bands,
        rows,
        source: detection.source,
        candidates: detection.candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::builtin::load_preset;

    fn geometry() -> PageGeometry {
        PageGeometry::new(1600, 1000)
    }

    fn row_words(y: i32, qty: &str, desc: &str, unit: &str, total: &str) -> Vec<WordBox> {
        vec![
            WordBox::new(qty, 50, y, 30, 20),
            WordBox::new(desc, 300, y, 100, 20),
            WordBox::new(unit, 900, y, 60, 20),
            WordBox::new(total, 1100, y, 80, 20),
        ]
    }

    #[test]
    fn test_multi_line_row_expands_upward() {
        let template = load_preset("regal").unwrap();
        let mut words = row_words(500, "234", "Widget", "10.00", "2340.00");
        words.push(WordBox::new("Model-X", 300, 470, 100, 20));

        let page = reconstruct(words, &geometry(), &template);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].description, "Model-X Widget");
        assert_eq!(page.bands[0].top, 470);
    }

    #[test]
    fn test_rows_split_between_anchors() {
        let template = load_preset("regal").unwrap();
        let mut words = row_words(400, "2", "Bolts", "1.50", "3.00");
        words.extend(row_words(500, "3", "Nuts", "0.50", "1.50"));
        words.push(WordBox::new("zinc", 300, 430, 60, 20));

        let page = reconstruct(words, &geometry(), &template);
        assert_eq!(page.source, AnchorSource::Validated);
        let descriptions: Vec<&str> = page.rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Bolts zinc", "Nuts"]);
        assert_eq!(page.rows[1].total, "1.50");
    }

    #[test]
    fn test_fallback_row_count_matches_candidates() {
        let template = load_preset("regal").unwrap();
        let words = vec![
            WordBox::new("1", 50, 300, 20, 20),
            WordBox::new("Alpha", 300, 300, 60, 20),
            WordBox::new("2", 50, 400, 20, 20),
            WordBox::new("Beta", 300, 400, 60, 20),
        ];
        let page = reconstruct(words, &geometry(), &template);
        assert_eq!(page.source, AnchorSource::Fallback);
        assert_eq!(page.rows.len(), page.candidates);
        assert_eq!(page.rows.len(), 2);
    }

    #[test]
    fn test_empty_page() {
        let template = load_preset("regal").unwrap();
        let page = reconstruct(Vec::new(), &geometry(), &template);
        assert!(page.rows.is_empty());
        assert_eq!(page.source, AnchorSource::None);
    }

    #[test]
    fn test_idempotent() {
        let template = load_preset("regal").unwrap();
        let mut words = row_words(400, "2", "Bolts", "1.50", "3.00");
        words.extend(row_words(560, "3", "Nuts", "0.50", "1.50"));
        words.push(WordBox::new("7", 60, 700, 20, 20));

        let first = reconstruct(words.clone(), &geometry(), &template);
        let mut shuffled = words;
        shuffled.reverse();
        let second = reconstruct(shuffled, &geometry(), &template);
        assert_eq!(first.rows, second.rows);
        assert_eq!(first.bands, second.bands);
    }
}
