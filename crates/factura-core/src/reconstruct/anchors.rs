use crate::model::{AnchorSource, ColumnKind, RowAnchor};
use crate::parsing::{is_money_like, is_quantity_like};
use crate::reconstruct::index::WordIndex;
use crate::template::layout::ResolvedLayout;
use crate::template::schema::AnchorPolicy;

/// Result of anchor detection on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorDetection {
    /// Kept anchors, ascending by `y`.
    pub anchors: Vec<RowAnchor>,
    pub source: AnchorSource,
    /// Number of quantity-like candidates before validation.
    pub candidates: usize,
}

/// Find the words that start table rows.
pub fn detect_anchors(index: &WordIndex, layout: &ResolvedLayout) -> AnchorDetection {
    let candidates = scan_candidates(index, layout);
    let count = candidates.len();

    if candidates.is_empty() {
        return AnchorDetection {
            anchors: Vec::new(),
            source: AnchorSource::None,
            candidates: 0,
        };
    }

    let (kept, source) = match layout.policy {
        AnchorPolicy::AcceptAll => (candidates, AnchorSource::Unvalidated),
        AnchorPolicy::PriceCorroborated => {
            let validated: Vec<RowAnchor> = candidates
                .iter()
                .filter(|c| has_price_corroboration(c, index, layout))
                .cloned()
                .collect();
            if validated.is_empty() {
                tracing::warn!(
                    candidates = count,
                    "no anchor has a price on its row, keeping all candidates"
                );
                (candidates, AnchorSource::Fallback)
            } else {
                tracing::debug!(
                    candidates = count,
                    validated = validated.len(),
                    "validated anchors"
                );
                (validated, AnchorSource::Validated)
            }
        }
    };

    AnchorDetection {
        anchors: dedup_anchors(kept, layout.dedup_gap),
        source,
        candidates: count,
    }
}

fn scan_candidates(index: &WordIndex, layout: &ResolvedLayout) -> Vec<RowAnchor> {
    let Some(zone) = layout.zone(ColumnKind::Quantity) else {
        return Vec::new();
    };

    index
        .in_vertical_range(layout.body_top, layout.body_bottom.saturating_add(1))
        .iter()
        .filter(|w| zone.contains(w.left))
        .filter(|w| layout.min_anchor_height.map_or(true, |min| w.height >= min))
        .filter(|w| is_quantity_like(&w.text, layout.allow_grouping))
        .map(|w| RowAnchor {
            y: w.top,
            quantity_text: w.text.clone(),
        })
        .collect()
}

/// Check for a money-like token in the price columns within the search radius of the anchor.
pub fn has_price_corroboration(
    anchor: &RowAnchor,
    index: &WordIndex,
    layout: &ResolvedLayout,
) -> bool {
    let radius = layout.price_search_radius;
    index
        .in_vertical_range(anchor.y - radius, anchor.y + radius + 1)
        .iter()
        .any(|w| w.left >= layout.price_region_start && is_money_like(&w.text))
}

/// Collapse anchors closer than `gap` pixels into the first of the run.
///
/// Each anchor is compared against the last kept one, so a long run of
/// near-duplicates collapses only while each stays within `gap` of the kept anchor.
pub fn dedup_anchors(mut anchors: Vec<RowAnchor>, gap: i32) -> Vec<RowAnchor> {
    anchors.sort_by_key(|a| a.y);
    let mut kept: Vec<RowAnchor> = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        match kept.last() {
            Some(last) if anchor.y - last.y <= gap => {}
            _ => kept.push(anchor),
        }
    }
    kept
}
