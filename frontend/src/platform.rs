//! Browser implementations of the traits the core components are written
//! against: HTTP through `gloo-net`, the clock through `js_sys::Date`, pacing
//! through `gloo-timers`, and markers through MapLibre.

use common::error::FeedError;
use common::feed::{Clock, FeedSource};
use common::markers::{MarkerLayer, MarkerSpec, Pacer};
use common::model::bounds::GeoBounds;
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Date, Object, Reflect};
use wasm_bindgen::JsValue;

use crate::maplibre::{Map, Marker, Popup};

/// Pixel offset of the popup from the marker anchor.
const POPUP_OFFSET: f64 = 16.0;

pub struct HttpFeedSource {
    url: String,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch_feed(&self) -> Result<String, FeedError> {
        let response = Request::get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(FeedError::Status(response.status()));
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))
    }
}

pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        Date::now() as u64
    }
}

pub struct TimerPacer;

impl Pacer for TimerPacer {
    async fn pause(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

/// Marker layer backed by a live MapLibre map.
pub struct MapLibreLayer {
    map: Map,
}

impl MapLibreLayer {
    pub fn new(map: Map) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }
}

impl MarkerLayer for MapLibreLayer {
    type Handle = Marker;

    fn visible_bounds(&self) -> GeoBounds {
        let bounds = self.map.get_bounds();
        GeoBounds::new(
            bounds.get_west(),
            bounds.get_south(),
            bounds.get_east(),
            bounds.get_north(),
        )
    }

    fn add_marker(&self, marker: &MarkerSpec) -> Marker {
        let popup = Popup::new(&options(&[("offset", JsValue::from_f64(POPUP_OFFSET))]));
        popup.set_html(&marker.popup_html);

        let lng_lat = Array::of2(
            &JsValue::from_f64(marker.longitude),
            &JsValue::from_f64(marker.latitude),
        );
        Marker::new(&options(&[("color", JsValue::from_str(marker.color))]))
            .set_lng_lat(&lng_lat)
            .set_popup(&popup)
            .add_to(&self.map)
    }

    fn remove_marker(&self, handle: &Marker) {
        handle.remove();
    }
}

/// Builds a plain JS options object from key/value pairs.
pub fn options(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object.into()
}
