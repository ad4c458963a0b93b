use crate::model::{ColumnKind, PageGeometry};
use crate::template::schema::{AnchorPolicy, CodeRules, TemplateDef};

/// A column zone in absolute page pixels, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub kind: ColumnKind,
    pub start: i32,
    pub end: i32,
}

impl Zone {
    pub fn contains(&self, x: i32) -> bool {
        self.start <= x && x < self.end
    }
}

/// A template applied to one page: every threshold in that page's pixels.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    pub zones: Vec<Zone>,
    pub body_top: i32,
    pub body_bottom: i32,
    /// Left edge of the price columns; money tokens right of it corroborate anchors.
    pub price_region_start: i32,
    pub dedup_gap: i32,
    pub price_search_radius: i32,
    pub min_anchor_height: Option<i32>,
    pub allow_grouping: bool,
    pub policy: AnchorPolicy,
    pub upward_margin: i32,
    pub trailing_margin: i32,
    pub row_gap: i32,
    pub codes: CodeRules,
}

impl ResolvedLayout {
    pub fn resolve(template: &TemplateDef, geometry: &PageGeometry) -> Self {
        let width = f64::from(geometry.width);
        let height = f64::from(geometry.height);
        let scale = match geometry.dpi {
            Some(dpi) if dpi > 0 && template.calibrated_dpi > 0 => {
                f64::from(dpi) / f64::from(template.calibrated_dpi)
            }
            _ => 1.0,
        };
        let px = |v: u32| (f64::from(v) * scale).round() as i32;

        let mut zones = Vec::with_capacity(template.columns.len());
        let mut start = 0;
        for def in &template.columns {
            let end = (def.end * width).round() as i32;
            zones.push(Zone {
                kind: def.kind,
                start,
                end,
            });
            start = end;
        }

        let price_region_start = zones
            .iter()
            .filter(|z| !z.kind.is_price())
            .map(|z| z.end)
            .max()
            .unwrap_or(0);

        let a = &template.anchors;
        let r = &template.rows;
        ResolvedLayout {
            zones,
            body_top: (template.body.min_y * height).round() as i32,
            body_bottom: (template.body.max_y * height).round() as i32,
            price_region_start,
            dedup_gap: px(a.dedup_gap),
            price_search_radius: px(a.price_search_radius),
            min_anchor_height: a.min_height.map(px),
            allow_grouping: a.allow_grouping,
            policy: a.policy,
            upward_margin: px(r.upward_margin),
            trailing_margin: px(r.trailing_margin),
            row_gap: px(r.row_gap),
            codes: template.codes.clone(),
        }
    }

    /// The first zone containing `x`, if any.
    pub fn zone_at(&self, x: i32) -> Option<ColumnKind> {
        self.zones.iter().find(|z| z.contains(x)).map(|z| z.kind)
    }

    pub fn zone(&self, kind: ColumnKind) -> Option<&Zone> {
        self.zones.iter().find(|z| z.kind == kind)
    }
}
