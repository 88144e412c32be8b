//! Minimal `wasm-bindgen` bindings to the global `maplibregl` namespace.
//!
//! `index.html` loads MapLibre GL JS from a `<script>` tag, so only the handful
//! of classes and methods the viewer calls are declared here.

use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl)]
    #[derive(Clone)]
    pub type Map;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, catch)]
    pub fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = getBounds)]
    pub fn get_bounds(this: &Map) -> LngLatBounds;

    #[wasm_bindgen(method, js_name = setStyle, catch)]
    pub fn set_style(this: &Map, style: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = addControl)]
    pub fn add_control(this: &Map, control: &NavigationControl);

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, listener: &Function);

    #[wasm_bindgen(method)]
    pub fn off(this: &Map, event: &str, listener: &Function);

    #[wasm_bindgen(method)]
    pub fn remove(this: &Map);

    #[wasm_bindgen(js_namespace = maplibregl)]
    pub type LngLatBounds;

    #[wasm_bindgen(method, js_name = getWest)]
    pub fn get_west(this: &LngLatBounds) -> f64;

    #[wasm_bindgen(method, js_name = getSouth)]
    pub fn get_south(this: &LngLatBounds) -> f64;

    #[wasm_bindgen(method, js_name = getEast)]
    pub fn get_east(this: &LngLatBounds) -> f64;

    #[wasm_bindgen(method, js_name = getNorth)]
    pub fn get_north(this: &LngLatBounds) -> f64;

    #[wasm_bindgen(js_namespace = maplibregl)]
    pub type NavigationControl;

    #[wasm_bindgen(constructor, js_namespace = maplibregl)]
    pub fn new() -> NavigationControl;

    #[wasm_bindgen(js_namespace = maplibregl)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = maplibregl)]
    pub fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &Marker, lng_lat: &Array) -> Marker;

    #[wasm_bindgen(method, js_name = setPopup)]
    pub fn set_popup(this: &Marker, popup: &Popup) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Marker) -> Marker;

    #[wasm_bindgen(js_namespace = maplibregl)]
    pub type Popup;

    #[wasm_bindgen(constructor, js_namespace = maplibregl)]
    pub fn new(options: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    pub fn set_html(this: &Popup, html: &str) -> Popup;
}
