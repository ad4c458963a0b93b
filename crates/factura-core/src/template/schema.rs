use crate::model::ColumnKind;
use serde::{Deserialize, Serialize};

/// Layout configuration for one document family (e.g. Regal invoices).
///
/// Column and body boundaries are page fractions; every pixel constant is
/// calibrated at `calibrated_dpi` and rescaled to the page's actual DPI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    #[serde(default = "default_calibrated_dpi")]
    pub calibrated_dpi: u32,
    /// Vertical working region holding the table body.
    pub body: BodyDef,
    /// Contiguous column zones, left to right. Each zone starts where the previous one ends.
    pub columns: Vec<ZoneDef>,
    #[serde(default)]
    pub anchors: AnchorDef,
    #[serde(default)]
    pub rows: RowDef,
    #[serde(default)]
    pub codes: CodeRules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_filter: Option<DuplicateFilter>,
}

fn default_calibrated_dpi() -> u32 {
    300
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodyDef {
    pub min_y: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ZoneDef {
    pub kind: ColumnKind,
    /// Right edge as a fraction of page width (exclusive).
    pub end: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Keep only anchors with a price-like token on the same row; fall back
    /// to every candidate when none are corroborated.
    #[default]
    PriceCorroborated,
    /// Keep every quantity-like candidate.
    AcceptAll,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorDef {
    pub dedup_gap: u32,
    pub price_search_radius: u32,
    pub min_height: Option<u32>,
    pub allow_grouping: bool,
    pub policy: AnchorPolicy,
}

impl Default for AnchorDef {
    fn default() -> Self {
        AnchorDef {
            dedup_gap: 15,
            price_search_radius: 25,
            min_height: None,
            allow_grouping: false,
            policy: AnchorPolicy::PriceCorroborated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RowDef {
    /// Expansion above the anchor, to catch model lines printed above the quantity.
    pub upward_margin: u32,
    /// Height of the last row, which has no following anchor.
    pub trailing_margin: u32,
    /// Space left between a row's bottom and the next row's top.
    pub row_gap: u32,
}

impl Default for RowDef {
    fn default() -> Self {
        RowDef {
            upward_margin: 30,
            trailing_margin: 150,
            row_gap: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeRules {
    /// Fixed tokens always accepted as codes (country of origin, etc.).
    pub literals: Vec<String>,
    pub min_len: usize,
    pub max_len: usize,
    /// Rewrite a leading 'A' misread from '4' on long numeric codes.
    pub correct_leading_a: bool,
}

impl Default for CodeRules {
    fn default() -> Self {
        CodeRules {
            literals: Vec::new(),
            min_len: 6,
            max_len: 14,
            correct_leading_a: false,
        }
    }
}

/// Skip pages that are duplicate copies of an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateFilter {
    /// A page containing any of these words (case-insensitive) is a copy...
    pub skip_markers: Vec<String>,
    /// ...unless it also contains one of these.
    #[serde(default)]
    pub keep_markers: Vec<String>,
}
