//! Viewport-driven marker lifecycle.
//!
//! [`MarkerSynchronizer`] decides which records get a marker; the map itself
//! is reached through [`MarkerLayer`], and the pause between insertions
//! through [`Pacer`].

use std::future::Future;

use crate::model::bounds::GeoBounds;
use crate::model::earthquake::EarthquakeRecord;
use crate::model::magnitude::MagnitudeBucket;

mod popup;
mod sync;

pub use popup::{escape_html, format_timestamp, render_popup};
pub use sync::{MarkerSynchronizer, PassOutcome, PassReport, PassToken};

/// The map surface markers are drawn on.
pub trait MarkerLayer {
    /// Whatever the map library returns for a placed marker.
    type Handle;

    /// Region currently rendered, queried fresh on every call.
    fn visible_bounds(&self) -> GeoBounds;

    fn add_marker(&self, marker: &MarkerSpec) -> Self::Handle;

    fn remove_marker(&self, handle: &Self::Handle);
}

/// Suspends the current pass for a few milliseconds.
pub trait Pacer {
    fn pause(&self, ms: u32) -> impl Future<Output = ()>;
}

/// Everything needed to draw one marker and its popup.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub key: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: &'static str,
    pub popup_html: String,
}

impl MarkerSpec {
    /// Builds the marker for a record, or `None` when it has no usable
    /// coordinates.
    pub fn for_record(record: &EarthquakeRecord, event_page_base: &str) -> Option<Self> {
        let (latitude, longitude) = record.coordinates()?;
        let key = record.marker_key()?;
        Some(Self {
            key,
            latitude,
            longitude,
            color: MagnitudeBucket::classify(record.mag).color(),
            popup_html: render_popup(record, latitude, longitude, event_page_base),
        })
    }
}
