use crate::parsing::parse_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One OCR-detected token, in page pixel coordinates (`top` grows downward).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBox {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl WordBox {
    pub fn new(text: impl Into<String>, left: i32, top: i32, width: i32, height: i32) -> Self {
        WordBox {
            text: text.into(),
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.left + self.width
    }
}

/// Pixel dimensions of a rasterized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    /// Resolution the page was rasterized at, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
}

impl PageGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        PageGeometry {
            width,
            height,
            dpi: None,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }
}

/// A word hypothesized to mark the start of a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowAnchor {
    pub y: i32,
    pub quantity_text: String,
}

/// The vertical slice `[top, bottom)` assigned to one logical row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowBand {
    pub top: i32,
    pub bottom: i32,
}

impl RowBand {
    pub fn contains(&self, y: i32) -> bool {
        self.top <= y && y < self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Quantity,
    Description,
    Code,
    UnitPrice,
    Total,
}

impl ColumnKind {
    pub fn is_price(self) -> bool {
        matches!(self, ColumnKind::UnitPrice | ColumnKind::Total)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Quantity => write!(f, "quantity"),
            ColumnKind::Description => write!(f, "description"),
            ColumnKind::Code => write!(f, "code"),
            ColumnKind::UnitPrice => write!(f, "unit_price"),
            ColumnKind::Total => write!(f, "total"),
        }
    }
}

/// The output record for one table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRow {
    pub quantity: String,
    pub description: String,
    pub code: String,
    pub unit_price: String,
    pub total: String,
}

/// How the anchors of a page were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSource {
    /// Every kept anchor had price corroboration on its row.
    Validated,
    /// Validation rejected every candidate, so all candidates were used.
    Fallback,
    /// The template accepts candidates without corroboration.
    Unvalidated,
    /// No quantity-like token was found in the table body.
    None,
}

impl fmt::Display for AnchorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorSource::Validated => write!(f, "validated"),
            AnchorSource::Fallback => write!(f, "fallback"),
            AnchorSource::Unvalidated => write!(f, "unvalidated"),
            AnchorSource::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageExtraction {
    pub page_number: usize,
    pub anchor_source: AnchorSource,
    /// Set when the page was dropped by the template's duplicate-copy filter.
    #[serde(default)]
    pub skipped: bool,
    pub rows: Vec<ExtractedRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    NoRowsDetected,
    ValidationFallback,
    DuplicatePageSkipped,
    MissingPrice,
    TotalMismatch,
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningCode::NoRowsDetected => write!(f, "no_rows_detected"),
            WarningCode::ValidationFallback => write!(f, "validation_fallback"),
            WarningCode::DuplicatePageSkipped => write!(f, "duplicate_page_skipped"),
            WarningCode::MissingPrice => write!(f, "missing_price"),
            WarningCode::TotalMismatch => write!(f, "total_mismatch"),
        }
    }
}

/// Something a reviewer should double-check in the extracted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionWarning {
    pub code: WarningCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    /// 1-based row index within the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
}

impl ExtractionWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            page: None,
            row: None,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.page, self.row) {
            (Some(page), Some(row)) => write!(f, "page {page}, row {row}: {}", self.message),
            (Some(page), None) => write!(f, "page {page}: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Rows extracted from a whole document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentExtraction {
    pub template: String,
    pub pages: Vec<PageExtraction>,
    pub warnings: Vec<ExtractionWarning>,
}

impl DocumentExtraction {
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }

    /// True when no page produced a row ("no data detected").
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// All rows with their page number, in document order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &ExtractedRow)> {
        self.pages
            .iter()
            .flat_map(|p| p.rows.iter().map(move |r| (p.page_number, r)))
    }

    /// Sum of every row total that parses as money.
    ///
    /// A total that would overflow the sum is left out.
    pub fn grand_total(&self) -> Decimal {
        sum_totals(
            self.rows()
                .filter_map(|(page, row)| parse_money(&row.total).map(|t| (page, t))),
        )
    }
}

fn sum_totals(totals: impl Iterator<Item = (usize, Decimal)>) -> Decimal {
    totals.fold(Decimal::ZERO, |acc, (page, total)| {
        acc.checked_add(total).unwrap_or_else(|| {
            tracing::warn!(page, %total, "row total overflows the grand total, skipped");
            acc
        })
    })
}
