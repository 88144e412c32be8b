//! Static configuration for the viewer.
//!
//! There is no configuration file and nothing is read from the environment;
//! the defaults below are what the browser app runs with. The frontend takes
//! a `ViewerConfig` as a component property so tests and embedders can
//! override individual values.

use crate::model::basemap::BasemapKind;

/// USGS "all earthquakes, past 7 days" CSV feed.
pub const FEED_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.csv";

/// Base of the USGS event page; the record identifier is appended.
pub const EVENT_PAGE_BASE: &str = "https://earthquake.usgs.gov/earthquakes/eventpage/";

/// How long a successfully fetched feed is reused without touching the network.
pub const CACHE_TTL_MS: u64 = 60_000;

/// Pause between two marker insertions within one refresh pass.
pub const MARKER_PACING_MS: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub feed_url: String,
    pub event_page_base: String,
    pub cache_ttl_ms: u64,
    pub marker_pacing_ms: u32,
    /// Initial map center as `(longitude, latitude)`.
    pub initial_center: (f64, f64),
    pub initial_zoom: f64,
    pub initial_basemap: BasemapKind,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            feed_url: FEED_URL.to_string(),
            event_page_base: EVENT_PAGE_BASE.to_string(),
            cache_ttl_ms: CACHE_TTL_MS,
            marker_pacing_ms: MARKER_PACING_MS,
            initial_center: (0.0, 0.0),
            initial_zoom: 3.0,
            initial_basemap: BasemapKind::Osm,
        }
    }
}
