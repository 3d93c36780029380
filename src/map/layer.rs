use serde::Serialize;
use utoipa::ToSchema;

use crate::preferences::Theme;

const LIGHT_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const DARK_URL: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";
const IMAGERY_URL: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
const IMAGERY_ATTRIBUTION: &str = "Tiles © Esri — Source: Esri, Maxar, Earthstar Geographics, \
CNES/Airbus DS, USDA, USGS, AeroGRID, IGN, and the GIS User Community";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TileLayer {
    pub theme: Theme,
    pub url: String,
    pub attribution: Option<String>,
}

impl TileLayer {
    pub fn for_theme(theme: Theme) -> Self {
        let (url, attribution) = match theme {
            Theme::Light => (LIGHT_URL, None),
            Theme::Dark => (DARK_URL, None),
            Theme::Satellite => (IMAGERY_URL, Some(IMAGERY_ATTRIBUTION)),
        };
        Self {
            theme,
            url: url.to_string(),
            attribution: attribution.map(String::from),
        }
    }
}
