//! Basemap styles offered by the style switcher.
//!
//! Each style is a small static table of raster sources and the layers that
//! draw them. `BasemapStyle::to_style_json` renders it as a MapLibre style
//! document (style version 8) which the frontend hands to `map.setStyle`.

use serde_json::{Map, Value, json};

const OSM_TILES: &str = "https://a.tile.openstreetmap.org/{z}/{x}/{y}.png";
const GOOGLE_SATELLITE_TILES: &str = "https://mt1.google.com/vt/lyrs=s&x={x}&y={y}&z={z}";
const GOOGLE_HYBRID_TILES: &str = "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}";

const TILE_SIZE: u32 = 256;
const MAX_ZOOM: u32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasemapKind {
    Osm,
    GoogleSatellite,
    OsmSatellite,
    GoogleHybrid,
}

impl BasemapKind {
    /// Order in which the switcher lists the styles.
    pub const ALL: [BasemapKind; 4] = [
        BasemapKind::Osm,
        BasemapKind::GoogleSatellite,
        BasemapKind::OsmSatellite,
        BasemapKind::GoogleHybrid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BasemapKind::Osm => "OpenStreetMap",
            BasemapKind::GoogleSatellite => "Google Satellite",
            BasemapKind::OsmSatellite => "OSM + Satellite",
            BasemapKind::GoogleHybrid => "Google Hybrid",
        }
    }

    pub fn style(self) -> BasemapStyle {
        match self {
            BasemapKind::Osm => BasemapStyle {
                sources: vec![RasterSource::new(
                    "osm",
                    OSM_TILES,
                    "&copy; OpenStreetMap contributors",
                )],
                layers: vec![RasterLayer::new("osm", "osm", None)],
            },
            BasemapKind::GoogleSatellite => BasemapStyle {
                sources: vec![RasterSource::new(
                    "googlesatellite",
                    GOOGLE_SATELLITE_TILES,
                    "&copy; Google",
                )],
                layers: vec![RasterLayer::new("googlesatellite", "googlesatellite", None)],
            },
            BasemapKind::OsmSatellite => BasemapStyle {
                sources: vec![
                    RasterSource::new("osm", OSM_TILES, "&copy; OpenStreetMap Contributors"),
                    RasterSource::new("googleSatellite", GOOGLE_SATELLITE_TILES, "&copy; Google"),
                ],
                layers: vec![
                    RasterLayer::new("osmSat", "osm", Some(0.7)),
                    RasterLayer::new("osmSatSatellite", "googleSatellite", Some(0.7)),
                ],
            },
            BasemapKind::GoogleHybrid => BasemapStyle {
                sources: vec![RasterSource::new(
                    "googlehybrid",
                    GOOGLE_HYBRID_TILES,
                    "&copy; Google",
                )],
                layers: vec![RasterLayer::new("googlehybrid", "googlehybrid", None)],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterSource {
    pub id: &'static str,
    pub tiles: &'static str,
    pub attribution: &'static str,
    pub tile_size: u32,
    pub max_zoom: u32,
}

impl RasterSource {
    fn new(id: &'static str, tiles: &'static str, attribution: &'static str) -> Self {
        Self {
            id,
            tiles,
            attribution,
            tile_size: TILE_SIZE,
            max_zoom: MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayer {
    pub id: &'static str,
    pub source: &'static str,
    /// `raster-opacity` paint property; `None` leaves the renderer default.
    pub opacity: Option<f64>,
}

impl RasterLayer {
    fn new(id: &'static str, source: &'static str, opacity: Option<f64>) -> Self {
        Self { id, source, opacity }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasemapStyle {
    pub sources: Vec<RasterSource>,
    pub layers: Vec<RasterLayer>,
}

impl BasemapStyle {
    pub fn to_style_json(&self) -> Value {
        let mut sources = Map::new();
        for source in &self.sources {
            sources.insert(
                source.id.to_string(),
                json!({
                    "type": "raster",
                    "tiles": [source.tiles],
                    "tileSize": source.tile_size,
                    "attribution": source.attribution,
                    "maxzoom": source.max_zoom,
                }),
            );
        }

        let layers: Vec<Value> = self
            .layers
            .iter()
            .map(|layer| {
                let mut value = json!({
                    "id": layer.id,
                    "type": "raster",
                    "source": layer.source,
                });
                if let Some(opacity) = layer.opacity {
                    value["paint"] = json!({ "raster-opacity": opacity });
                }
                value
            })
            .collect();

        json!({
            "version": 8,
            "sources": sources,
            "layers": layers,
        })
    }
}
