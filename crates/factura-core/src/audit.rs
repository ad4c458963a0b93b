use crate::model::{AnchorSource, ExtractedRow, ExtractionWarning, PageExtraction, WarningCode};
use crate::parsing::{parse_money, parse_quantity};
use rust_decimal::Decimal;

/// Largest accepted difference between quantity × unit price and the row total.
const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Review a reconstructed page and report what needs a human check.
pub fn audit_page(page: &PageExtraction) -> Vec<ExtractionWarning> {
    let page_number = page.page_number;

    if page.skipped {
        return vec![ExtractionWarning::new(
            WarningCode::DuplicatePageSkipped,
            "page is a duplicate copy and was skipped",
        )
        .with_page(page_number)];
    }

    let mut warnings = Vec::new();
    match page.anchor_source {
        AnchorSource::None => warnings.push(
            ExtractionWarning::new(WarningCode::NoRowsDetected, "no table rows detected")
                .with_page(page_number),
        ),
        AnchorSource::Fallback => warnings.push(
            ExtractionWarning::new(
                WarningCode::ValidationFallback,
                "no row had a price on its line; every quantity-like token was kept",
            )
            .with_page(page_number),
        ),
        AnchorSource::Validated | AnchorSource::Unvalidated => {}
    }

    for (i, row) in page.rows.iter().enumerate() {
        if let Some(warning) = audit_row(row) {
            warnings.push(warning.with_page(page_number).with_row(i + 1));
        }
    }

    warnings
}

/// Check one row's prices: both present, and quantity × unit price matching the total.
pub fn audit_row(row: &ExtractedRow) -> Option<ExtractionWarning> {
    let missing: Vec<&str> = [("unit price", &row.unit_price), ("total", &row.total)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
    if !missing.is_empty() {
        return Some(ExtractionWarning::new(
            WarningCode::MissingPrice,
            format!("missing {}", missing.join(" and ")),
        ));
    }

    let quantity = parse_quantity(&row.quantity)?;
    let unit_price = parse_money(&row.unit_price)?;
    let total = parse_money(&row.total)?;
    let Some(expected) = quantity.checked_mul(unit_price) else {
        return Some(ExtractionWarning::new(
            WarningCode::TotalMismatch,
            format!(
                "{} x {} is out of range; total reads {}",
                row.quantity, row.unit_price, row.total
            ),
        ));
    };
    if (expected - total).abs() > TOTAL_TOLERANCE {
        return Some(ExtractionWarning::new(
            WarningCode::TotalMismatch,
            format!(
                "{} x {} = {} but total reads {}",
                row.quantity, row.unit_price, expected, row.total
            ),
        ));
    }

    None
}
