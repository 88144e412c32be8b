//! Component state for the earthquake map.
//!
//! The map itself only exists after the first render, once the container
//! `<div>` is in the DOM, so everything that depends on it (the MapLibre
//! instance, the marker synchronizer and the `moveend` listener) starts out
//! as `None` and is filled in by `mount_map`.
//!
//! The fetcher and the synchronizer sit behind `Rc` because refresh passes
//! run in `spawn_local` tasks that outlive a single `update` call.

use std::rc::Rc;

use common::config::ViewerConfig;
use common::feed::DataFetcher;
use common::markers::MarkerSynchronizer;
use common::model::basemap::BasemapKind;
use js_sys::{Array, Function, JSON};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;
use yew::html::Scope;
use yew::prelude::*;

use super::messages::Msg;
use crate::maplibre::{Map, NavigationControl};
use crate::platform::{options, BrowserClock, HttpFeedSource, MapLibreLayer, TimerPacer};

pub type QuakeFetcher = DataFetcher<HttpFeedSource, BrowserClock>;
pub type QuakeMarkers = MarkerSynchronizer<MapLibreLayer, TimerPacer>;

pub struct EarthquakeMapComponent {
    pub config: ViewerConfig,

    /// The `<div>` MapLibre renders into.
    pub container_ref: NodeRef,

    /// Feed fetcher and its cache. Lives as long as the component.
    pub fetcher: Rc<QuakeFetcher>,

    /// Marker synchronizer bound to the live map; `None` until mounted.
    pub markers: Option<Rc<QuakeMarkers>>,

    /// Basemap currently applied to the map, highlighted in the switcher.
    pub active_basemap: BasemapKind,

    /// Keeps the `moveend` callback alive while it is registered.
    pub moveend_listener: Option<Closure<dyn FnMut()>>,

    /// Guard to run first-render initialization once.
    pub loaded: bool,
}

impl EarthquakeMapComponent {
    pub fn new(config: &ViewerConfig) -> Self {
        let fetcher = DataFetcher::new(
            HttpFeedSource::new(config.feed_url.clone()),
            BrowserClock,
            config.cache_ttl_ms,
        );
        Self {
            config: config.clone(),
            container_ref: NodeRef::default(),
            fetcher: Rc::new(fetcher),
            markers: None,
            active_basemap: config.initial_basemap,
            moveend_listener: None,
            loaded: false,
        }
    }

    /// Creates the MapLibre map inside the container, adds the navigation
    /// control and forwards every `moveend` to the component as
    /// `Msg::ViewSettled`.
    pub fn mount_map(&mut self, link: &Scope<Self>) -> Result<(), JsValue> {
        let container = self
            .container_ref
            .cast::<HtmlElement>()
            .ok_or_else(|| JsValue::from_str("map container is not mounted"))?;

        let (lon, lat) = self.config.initial_center;
        let map = Map::new(&options(&[
            ("container", container.into()),
            ("style", style_value(self.active_basemap)?),
            ("center", Array::of2(&lon.into(), &lat.into()).into()),
            ("zoom", JsValue::from_f64(self.config.initial_zoom)),
        ]))?;
        map.add_control(&NavigationControl::new());

        let link = link.clone();
        let listener = Closure::<dyn FnMut()>::new(move || link.send_message(Msg::ViewSettled));
        map.on("moveend", listener.as_ref().unchecked_ref::<Function>());
        self.moveend_listener = Some(listener);

        self.markers = Some(Rc::new(MarkerSynchronizer::new(
            MapLibreLayer::new(map),
            TimerPacer,
            self.config.marker_pacing_ms,
            self.config.event_page_base.clone(),
        )));
        Ok(())
    }

    /// Stops any running pass, unregisters the listener and destroys the map.
    pub fn teardown(&mut self) {
        if let Some(markers) = self.markers.take() {
            markers.begin_pass();
            let map = markers.layer().map();
            if let Some(listener) = self.moveend_listener.take() {
                map.off("moveend", listener.as_ref().unchecked_ref::<Function>());
            }
            map.remove();
        }
    }
}

/// MapLibre style document for a basemap, as a JS object.
pub fn style_value(kind: BasemapKind) -> Result<JsValue, JsValue> {
    JSON::parse(&kind.style().to_style_json().to_string())
}
