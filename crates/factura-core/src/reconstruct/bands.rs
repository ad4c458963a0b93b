use crate::model::{RowAnchor, RowBand};
use crate::template::layout::ResolvedLayout;

/// Turn sorted anchors into non-overlapping vertical row bands.
///
/// Each band starts `upward_margin` above its anchor, so model or size lines
/// printed above the quantity belong to the row. A band ends `row_gap` before
/// the next band starts; the last band extends `trailing_margin` below its anchor.
pub fn segment_rows(anchors: &[RowAnchor], layout: &ResolvedLayout) -> Vec<RowBand> {
    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            let top = anchor.y - layout.upward_margin;
            let bottom = match anchors.get(i + 1) {
                Some(next) => next.y - layout.upward_margin - layout.row_gap,
                None => anchor.y + layout.trailing_margin,
            };
            RowBand {
                top,
                bottom: bottom.max(top),
            }
        })
        .collect()
}
