pub mod builtin;
pub mod layout;
pub mod schema;

use crate::error::FacturaError;
use crate::model::ColumnKind;
use schema::TemplateDef;
use std::path::Path;

/// Load a template from a JSON file.
pub fn load_template(path: &Path) -> Result<TemplateDef, FacturaError> {
    let content = std::fs::read_to_string(path).map_err(|e| FacturaError::TemplateLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_template(&content, path)
}

/// Parse a template from a JSON string.
pub fn parse_template(json: &str, source: &Path) -> Result<TemplateDef, FacturaError> {
    let template: TemplateDef =
        serde_json::from_str(json).map_err(|e| FacturaError::TemplateLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_template(&template)?;
    Ok(template)
}

/// Parse a template from a JSON string (no file path context).
pub fn parse_template_str(json: &str) -> Result<TemplateDef, FacturaError> {
    let template: TemplateDef = serde_json::from_str(json).map_err(FacturaError::Json)?;
    validate_template(&template)?;
    Ok(template)
}

/// Validate that a template describes a usable page layout.
pub fn validate_template(template: &TemplateDef) -> Result<(), FacturaError> {
    if template.name.trim().is_empty() {
        return Err(FacturaError::TemplateInvalid(
            "template name must not be empty".into(),
        ));
    }

    if template.calibrated_dpi == 0 {
        return Err(FacturaError::TemplateInvalid(
            "calibrated_dpi must be positive".into(),
        ));
    }

    let body = &template.body;
    if !(0.0..=1.0).contains(&body.min_y)
        || !(0.0..=1.0).contains(&body.max_y)
        || body.min_y >= body.max_y
    {
        return Err(FacturaError::TemplateInvalid(format!(
            "body range [{}, {}] must satisfy 0 <= min_y < max_y <= 1",
            body.min_y, body.max_y
        )));
    }

    if template.columns.is_empty() {
        return Err(FacturaError::TemplateInvalid(
            "columns must not be empty".into(),
        ));
    }

    let mut start = 0.0;
    let mut seen_price = false;
    for zone in &template.columns {
        if zone.end <= start || zone.end > 1.0 {
            return Err(FacturaError::TemplateInvalid(format!(
                "column '{}' ends at {} (must be > {} and <= 1)",
                zone.kind, zone.end, start
            )));
        }
        if zone.kind.is_price() {
            seen_price = true;
        } else if seen_price {
            return Err(FacturaError::TemplateInvalid(format!(
                "column '{}' lies right of a price column; price columns must be rightmost",
                zone.kind
            )));
        }
        start = zone.end;
    }

    for kind in [
        ColumnKind::Quantity,
        ColumnKind::Description,
        ColumnKind::Code,
        ColumnKind::UnitPrice,
        ColumnKind::Total,
    ] {
        let count = template.columns.iter().filter(|z| z.kind == kind).count();
        let required = matches!(kind, ColumnKind::Quantity | ColumnKind::Description);
        if count > 1 {
            return Err(FacturaError::TemplateInvalid(format!(
                "column '{kind}' appears {count} times"
            )));
        }
        if required && count == 0 {
            return Err(FacturaError::TemplateInvalid(format!(
                "template must define a '{kind}' column"
            )));
        }
    }

    let codes = &template.codes;
    if codes.min_len == 0 || codes.min_len > codes.max_len {
        return Err(FacturaError::TemplateInvalid(format!(
            "code length range [{}, {}] is empty",
            codes.min_len, codes.max_len
        )));
    }

    if let Some(ref filter) = template.duplicate_filter {
        if filter.skip_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(FacturaError::TemplateInvalid(
                "duplicate_filter needs at least one skip marker".into(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_columns(columns: &str) -> String {
        format!(
            r#"{{
                "name": "Test",
                "version": "1.0",
                "body": {{ "min_y": 0.2, "max_y": 0.9 }},
                "columns": {columns}
            }}"#
        )
    }

    #[test]
    fn test_parse_valid_template() {
        let json = with_columns(
            r#"[
                { "kind": "quantity", "end": 0.12 },
                { "kind": "description", "end": 0.40 },
                { "kind": "code", "end": 0.52 },
                { "kind": "unit_price", "end": 0.66 },
                { "kind": "total", "end": 1.0 }
            ]"#,
        );
        let t = parse_template_str(&json).unwrap();
        assert_eq!(t.name, "Test");
        assert_eq!(t.calibrated_dpi, 300);
        assert_eq!(t.columns.len(), 5);
        assert_eq!(t.anchors.dedup_gap, 15);
        assert_eq!(t.rows.upward_margin, 30);
        assert!(t.duplicate_filter.is_none());
    }

    #[test]
    fn test_missing_quantity_rejected() {
        let json = with_columns(
            r#"[
                { "kind": "description", "end": 0.5 },
                { "kind": "total", "end": 1.0 }
            ]"#,
        );
        assert!(matches!(
            parse_template_str(&json),
            Err(FacturaError::TemplateInvalid(_))
        ));
    }

    #[test]
    fn test_non_increasing_columns_rejected() {
        let json = with_columns(
            r#"[
                { "kind": "quantity", "end": 0.3 },
                { "kind": "description", "end": 0.2 }
            ]"#,
        );
        assert!(parse_template_str(&json).is_err());
    }

    #[test]
    fn test_column_past_page_rejected() {
        let json = with_columns(
            r#"[
                { "kind": "quantity", "end": 0.3 },
                { "kind": "description", "end": 1.2 }
            ]"#,
        );
        assert!(parse_template_str(&json).is_err());
    }

    #[test]
    fn test_price_column_must_be_rightmost() {
        let json = with_columns(
            r#"[
                { "kind": "quantity", "end": 0.1 },
                { "kind": "total", "end": 0.3 },
                { "kind": "description", "end": 1.0 }
            ]"#,
        );
        assert!(parse_template_str(&json).is_err());
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let json = with_columns(
            r#"[
                { "kind": "quantity", "end": 0.1 },
                { "kind": "description", "end": 0.5 },
                { "kind": "total", "end": 0.7 },
                { "kind": "total", "end": 1.0 }
            ]"#,
        );
        assert!(parse_template_str(&json).is_err());
    }

    #[test]
    fn test_inverted_body_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "body": { "min_y": 0.9, "max_y": 0.2 },
            "columns": [
                { "kind": "quantity", "end": 0.1 },
                { "kind": "description", "end": 1.0 }
            ]
        }"#;
        assert!(parse_template_str(json).is_err());
    }

    #[test]
    fn test_unknown_column_kind_is_parse_error() {
        let json = with_columns(r#"[{ "kind": "weight", "end": 1.0 }]"#);
        assert!(matches!(
            parse_template_str(&json),
            Err(FacturaError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_template(Path::new("/nonexistent/template.json")).unwrap_err();
        assert!(matches!(err, FacturaError::TemplateLoad { .. }));
    }
}
