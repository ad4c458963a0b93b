use crate::error::FacturaError;
use crate::template::schema::TemplateDef;
use crate::template::validate_template;

const REGAL_JSON: &str = include_str!("../../../../templates/regal.json");
const GOODYEAR_JSON: &str = include_str!("../../../../templates/goodyear.json");
const DUCA_JSON: &str = include_str!("../../../../templates/duca.json");

/// Available predefined templates.
pub const PRESETS: &[&str] = &["regal", "goodyear", "duca"];

pub const DEFAULT_PRESET: &str = "regal";

/// Load a predefined template by name.
pub fn load_preset(name: &str) -> Result<TemplateDef, FacturaError> {
    let json = match name {
        "regal" => REGAL_JSON,
        "goodyear" => GOODYEAR_JSON,
        "duca" => DUCA_JSON,
        _ => {
            return Err(FacturaError::UnknownPreset {
                name: name.to_string(),
                available: PRESETS.join(", "),
            })
        }
    };
    let template: TemplateDef = serde_json::from_str(json)?;
    validate_template(&template)?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnKind;

    #[test]
    fn test_all_presets_load() {
        for name in PRESETS {
            let t = load_preset(name).unwrap();
            assert_eq!(t.name, *name);
        }
    }

    #[test]
    fn test_default_preset_is_listed() {
        assert!(PRESETS.contains(&DEFAULT_PRESET));
    }

    #[test]
    fn test_regal_zones() {
        let t = load_preset("regal").unwrap();
        let kinds: Vec<ColumnKind> = t.columns.iter().map(|z| z.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Quantity,
                ColumnKind::Description,
                ColumnKind::Code,
                ColumnKind::UnitPrice,
                ColumnKind::Total,
            ]
        );
        let ends: Vec<f64> = t.columns.iter().map(|z| z.end).collect();
        assert_eq!(ends, vec![0.12, 0.40, 0.52, 0.66, 1.0]);
        assert_eq!(t.body.min_y, 0.20);
        assert_eq!(t.body.max_y, 0.90);
        assert!(t.duplicate_filter.is_some());
    }

    #[test]
    fn test_goodyear_code_first() {
        let t = load_preset("goodyear").unwrap();
        assert_eq!(t.columns[0].kind, ColumnKind::Code);
        assert!(t.duplicate_filter.is_none());
    }

    #[test]
    fn test_unknown_preset() {
        let err = load_preset("xyz").unwrap_err();
        assert!(matches!(err, FacturaError::UnknownPreset { ref name, .. } if name == "xyz"));
    }
}
