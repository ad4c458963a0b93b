use factura_core::error::FacturaError;
use factura_core::model::ColumnKind;
use factura_core::template::builtin;
use factura_core::template::schema::{AnchorPolicy, TemplateDef};
use std::path::Path;

pub fn list() -> Result<(), FacturaError> {
    println!("Available predefined templates:\n");
    for name in builtin::PRESETS {
        let t = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!("  {:<10} v{}{}", name, t.version, default_marker);
        if let Some(ref desc) = t.description {
            println!("             {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), FacturaError> {
    let t = builtin::load_preset(preset)?;

    println!("{} (version {})\n", t.name, t.version);
    if let Some(ref desc) = t.description {
        println!("{}\n", desc);
    }

    println!(
        "Table body: {:.0}% to {:.0}% of the page height.\n",
        t.body.min_y * 100.0,
        t.body.max_y * 100.0
    );

    println!("Columns, left to right (percent of page width):\n");
    let mut start = 0.0;
    for zone in &t.columns {
        println!(
            "  {:>5.1}% - {:>5.1}%  {}",
            start * 100.0,
            zone.end * 100.0,
            column_label(zone.kind)
        );
        start = zone.end;
    }
    println!();

    let grouping = if t.anchors.allow_grouping {
        "digits, optionally with comma thousands groups"
    } else {
        "plain digits"
    };
    println!("A row starts at a quantity ({grouping}) in the quantity column.");
    match t.anchors.policy {
        AnchorPolicy::PriceCorroborated => println!(
            "It must have a price within {}px of its line, unless no row on the page does.",
            t.anchors.price_search_radius
        ),
        AnchorPolicy::AcceptAll => println!("Every quantity starts a row."),
    }
    println!(
        "Quantities closer than {}px are merged. Rows extend {}px above their quantity.",
        t.anchors.dedup_gap, t.rows.upward_margin
    );
    println!(
        "Pixel values are calibrated at {} DPI and scaled to the scan resolution.",
        t.calibrated_dpi
    );

    if t.columns.iter().any(|z| z.kind == ColumnKind::Code) {
        println!(
            "\nCodes: numeric, or uppercase alphanumeric of {} to {} characters.",
            t.codes.min_len, t.codes.max_len
        );
        if !t.codes.literals.is_empty() {
            println!("Also accepted as codes: {}", t.codes.literals.join(", "));
        }
        println!("Other text in the code column is treated as description.");
    }

    if let Some(ref filter) = t.duplicate_filter {
        println!(
            "\nPages mentioning {} are skipped as duplicate copies",
            filter.skip_markers.join(" / ")
        );
        if !filter.keep_markers.is_empty() {
            println!("unless they also mention {}.", filter.keep_markers.join(" / "));
        }
    }

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FacturaError> {
    let t = factura_core::template::load_template(file)?;

    println!("Template '{}' (v{}) is valid.", t.name, t.version);
    let kinds: Vec<String> = t.columns.iter().map(|z| z.kind.to_string()).collect();
    println!("  Columns: {}", kinds.join(", "));

    let warnings = lint(&t);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

/// Valid but probably unintended settings.
fn lint(t: &TemplateDef) -> Vec<String> {
    let mut warnings = Vec::new();
    if t.columns.last().is_some_and(|z| z.end < 1.0) {
        warnings.push("last column ends before the page edge; words past it are ignored".into());
    }
    if !t.columns.iter().any(|z| z.kind.is_price()) {
        warnings.push(
            "no price column: anchors can never be corroborated and every page falls back".into(),
        );
    }
    if t.rows.trailing_margin == 0 {
        warnings.push("trailing_margin is 0: the last row of each page is empty".into());
    }
    warnings
}

fn column_label(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Quantity => "Quantity",
        ColumnKind::Description => "Description",
        ColumnKind::Code => "Code",
        ColumnKind::UnitPrice => "Unit price",
        ColumnKind::Total => "Total",
    }
}
