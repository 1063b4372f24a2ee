//! Bindings for the parts of the global `L` (Leaflet) object the map uses.
//! Wrappers only: no state, no logic.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    pub type LeafletMap;
    pub type Layer;
    pub type Popup;
    pub type Control;

    #[wasm_bindgen(js_namespace = L, js_name = map, catch)]
    pub fn map(container_id: &str, options: &JsValue) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = geoJSON)]
    pub fn geo_json(data: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, map: &LeafletMap);

    #[wasm_bindgen(method)]
    pub fn remove(this: &Layer);

    #[wasm_bindgen(method)]
    pub fn on(this: &Layer, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(js_namespace = L, js_name = popup)]
    pub fn popup() -> Popup;

    #[wasm_bindgen(method, js_name = setLatLng)]
    pub fn set_lat_lng(this: &Popup, at: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setContent)]
    pub fn set_content(this: &Popup, html: &str) -> Popup;

    #[wasm_bindgen(method, js_name = openOn)]
    pub fn open_on(this: &Popup, map: &LeafletMap);

    #[wasm_bindgen(js_namespace = ["L", "control"], js_name = layers)]
    pub fn control_layers(base_layers: &js_sys::Object, overlays: &JsValue) -> Control;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_control_to(this: &Control, map: &LeafletMap);
}
