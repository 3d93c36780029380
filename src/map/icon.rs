use serde::Serialize;
use utoipa::ToSchema;

const BASE_ZOOM: f64 = 2.0;
const SCALE_PER_ZOOM: f64 = 0.2;
const MIN_SCALE: f64 = 0.5;
const MAX_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    /// The primary tracked object
    Station,
    /// Everything loaded from the bulk source
    Constellation,
}

struct BaseIcon {
    url: &'static str,
    width: f64,
    height: f64,
    anchor_x: f64,
    anchor_y: f64,
    tooltip_offset: f64,
}

impl IconKind {
    fn base(&self) -> BaseIcon {
        match self {
            IconKind::Station => BaseIcon {
                url: "/static/icons/iss.png",
                width: 200.0,
                height: 110.0,
                anchor_x: 150.0,
                anchor_y: 55.0,
                tooltip_offset: 20.0,
            },
            IconKind::Constellation => BaseIcon {
                url: "/static/icons/starlink.png",
                width: 113.0,
                height: 113.0,
                anchor_x: 56.5,
                anchor_y: 56.5,
                tooltip_offset: 15.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Icon {
    pub kind: IconKind,
    pub url: String,
    pub size: [f64; 2],
    pub anchor: [f64; 2],
    pub tooltip_anchor: [f64; 2],
}

impl Icon {
    pub fn scaled(kind: IconKind, zoom: u8) -> Self {
        let base = kind.base();
        let scale = scale_for_zoom(zoom);
        Icon {
            kind,
            url: base.url.to_string(),
            size: [base.width * scale, base.height * scale],
            anchor: [base.anchor_x * scale, base.anchor_y * scale],
            tooltip_anchor: [0.0, -base.tooltip_offset * scale],
        }
    }
}

/// 1x at zoom 2, +0.2 per zoom level, clamped to [0.5, 2]
pub fn scale_for_zoom(zoom: u8) -> f64 {
    (1.0 + (zoom as f64 - BASE_ZOOM) * SCALE_PER_ZOOM).clamp(MIN_SCALE, MAX_SCALE)
}
