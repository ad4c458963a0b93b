use crate::model::{ColumnKind, ExtractedRow, RowAnchor, RowBand};
use crate::parsing::{correct_leading_a, extract_money, looks_like_code};
use crate::reconstruct::index::WordIndex;
use crate::template::layout::ResolvedLayout;

/// Build the output row for one band.
///
/// Every word whose `top` falls in the band is routed by the zone containing
/// its `left`. Tokens in the code column that do not look like codes are
/// description overflow and join the description instead.
pub fn assemble_row(
    anchor: &RowAnchor,
    band: &RowBand,
    index: &WordIndex,
    layout: &ResolvedLayout,
) -> ExtractedRow {
    let mut description: Vec<&str> = Vec::new();
    let mut codes: Vec<String> = Vec::new();
    let mut unit_prices: Vec<&str> = Vec::new();
    let mut totals: Vec<&str> = Vec::new();

    // The index yields words in reading order, so every buffer is already sorted.
    for word in index.in_vertical_range(band.top, band.bottom) {
        let Some(kind) = layout.zone_at(word.left) else {
            continue;
        };
        match kind {
            ColumnKind::Quantity => {}
            ColumnKind::Description => description.push(&word.text),
            ColumnKind::Code => {
                if looks_like_code(&word.text, &layout.codes) {
                    let code = if layout.codes.correct_leading_a {
                        correct_leading_a(&word.text, layout.codes.min_len)
                    } else {
                        word.text.clone()
                    };
                    codes.push(code);
                } else {
                    description.push(&word.text);
                }
            }
            ColumnKind::UnitPrice => unit_prices.push(&word.text),
            ColumnKind::Total => totals.push(&word.text),
        }
    }

    ExtractedRow {
        quantity: anchor.quantity_text.clone(),
        description: description.join(" "),
        code: codes.join(" "),
        unit_price: extract_money(&unit_prices),
        total: extract_money(&totals),
    }
}
