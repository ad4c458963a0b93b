use crate::error::FacturaError;
use crate::model::PageGeometry;
use crate::ocr::{OcrPage, RawWord};
use std::collections::BTreeMap;

const TSV_MIN_FIELDS: usize = 11;
const TSV_PAGE_LEVEL: u32 = 1;
const TSV_WORD_LEVEL: u32 = 5;

#[derive(Default)]
struct PageAccumulator {
    geometry: Option<PageGeometry>,
    words: Vec<RawWord>,
}

/// Parse Tesseract TSV output (`tesseract img stdout tsv`) into pages.
///
/// Page geometry comes from the level-1 record of each page. Word records
/// (level 5) are kept as-is, including empty text and `-1` confidences, so
/// filtering stays in one place (the word index). Malformed lines are skipped.
pub fn parse_tsv(tsv: &str) -> Result<Vec<OcrPage>, FacturaError> {
    let mut pages: BTreeMap<usize, PageAccumulator> = BTreeMap::new();

    for (line_num, line) in tsv.lines().enumerate() {
        if line_num == 0 && line.starts_with("level") {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < TSV_MIN_FIELDS {
            continue;
        }

        let Ok(level) = fields[0].trim().parse::<u32>() else {
            continue;
        };
        let page_num = fields[1].trim().parse::<usize>().unwrap_or(1);
        let (Some(left), Some(top), Some(width), Some(height)) = (
            parse_int(fields[6]),
            parse_int(fields[7]),
            parse_int(fields[8]),
            parse_int(fields[9]),
        ) else {
            continue;
        };

        let page = pages.entry(page_num).or_default();
        match level {
            TSV_PAGE_LEVEL => {
                if width > 0 && height > 0 {
                    page.geometry = Some(PageGeometry::new(width as u32, height as u32));
                }
            }
            TSV_WORD_LEVEL => {
                let confidence = fields[10].trim().parse::<f32>().ok();
                let text = fields.get(11).copied().unwrap_or("").to_string();
                page.words.push(RawWord {
                    text,
                    left,
                    top,
                    width,
                    height,
                    confidence,
                });
            }
            _ => {}
        }
    }

    if pages.is_empty() {
        return Err(FacturaError::OcrParse(
            "no page or word records found in TSV".into(),
        ));
    }

    Ok(pages
        .into_iter()
        .map(|(page_number, acc)| {
            let geometry = acc
                .geometry
                .unwrap_or_else(|| geometry_from_extent(&acc.words));
            OcrPage {
                page_number,
                geometry,
                words: acc.words,
            }
        })
        .collect())
}

fn parse_int(field: &str) -> Option<i32> {
    field.trim().parse().ok()
}

/// Fallback when a TSV fragment lacks its page record.
pub(crate) fn geometry_from_extent(words: &[RawWord]) -> PageGeometry {
    let width = words.iter().map(|w| w.left + w.width).max().unwrap_or(1);
    let height = words.iter().map(|w| w.top + w.height).max().unwrap_or(1);
    PageGeometry::new(width.max(1) as u32, height.max(1) as u32)
}
