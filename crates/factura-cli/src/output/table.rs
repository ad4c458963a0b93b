use factura_core::model::{DocumentExtraction, ExtractedRow, PageExtraction};
use std::fmt::Write;

const HEADERS: [&str; 5] = ["Qty", "Code", "Description", "Unit price", "Total"];

fn cells(row: &ExtractedRow) -> [&str; 5] {
    [
        &row.quantity,
        &row.code,
        &row.description,
        &row.unit_price,
        &row.total,
    ]
}

pub fn format_document(doc: &DocumentExtraction) -> String {
    let mut out = String::new();

    for (i, page) in doc.pages.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        format_page(&mut out, page);
    }

    let _ = writeln!(
        out,
        "\n{} row(s), template {}, grand total {}",
        doc.row_count(),
        doc.template,
        doc.grand_total()
    );
    out
}

fn format_page(out: &mut String, page: &PageExtraction) {
    let _ = writeln!(out, "=== Page {} ===\n", page.page_number);

    if page.skipped {
        let _ = writeln!(out, "  (duplicate copy, skipped)");
        return;
    }
    if page.rows.is_empty() {
        let _ = writeln!(out, "  (no rows detected)");
        return;
    }

    let mut widths = HEADERS.map(str::len);
    for row in &page.rows {
        for (w, cell) in widths.iter_mut().zip(cells(row)) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_line(out, HEADERS, &widths);
    let rule = widths.map(|w| "-".repeat(w));
    write_line(out, rule.each_ref().map(String::as_str), &widths);
    for row in &page.rows {
        write_line(out, cells(row), &widths);
    }
}

fn write_line(out: &mut String, cells: [&str; 5], widths: &[usize; 5]) {
    let [qty, code, desc, unit, total] = cells;
    let _ = writeln!(
        out,
        "  {:>qw$}  {:<cw$}  {:<dw$}  {:>uw$}  {:>tw$}",
        qty,
        code,
        desc,
        unit,
        total,
        qw = widths[0],
        cw = widths[1],
        dw = widths[2],
        uw = widths[3],
        tw = widths[4],
    );
}
