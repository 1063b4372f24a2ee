use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use census_map_core::config::CensusConfig;
use census_map_core::geojson::FeatureCollection;
use census_map_core::{
    popup_html, FeatureProperties, LatLng, LayerDescriptor, LayerId, LookupOutcome, MapConfig,
    MapPanel, MapSurface,
};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::fetch;
use crate::leaflet::{self, LeafletMap};

pub type SharedPanel = Rc<RefCell<MapPanel<LeafletSurface>>>;
type PanelHandle = Rc<OnceCell<Weak<RefCell<MapPanel<LeafletSurface>>>>>;

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or_else(|e| {
        log::error!("failed to convert value for Leaflet: {e}");
        JsValue::UNDEFINED
    })
}

fn lat_lng(at: LatLng) -> JsValue {
    js_sys::Array::of2(&at.lat.into(), &at.lng.into()).into()
}

/// A `L.geoJSON` layer plus the click listener it owns.
pub struct LeafletOverlay {
    layer: leaflet::Layer,
    _on_click: Option<Closure<dyn FnMut(JsValue)>>,
}

pub struct LeafletSurface {
    map: LeafletMap,
    census: Rc<CensusConfig>,
    panel: PanelHandle,
}

impl LeafletSurface {
    /// Creates the Leaflet map in `container_id` with the configured view and
    /// base layers, the first base layer shown.
    pub fn create(container_id: &str, config: &MapConfig) -> Result<Self, JsValue> {
        let options = json!({
            "center": [config.view.center.lat, config.view.center.lng],
            "zoom": config.view.zoom,
        });
        let map = leaflet::map(container_id, &to_js(&options))?;

        let base_layers = js_sys::Object::new();
        for (index, base) in config.base_layers.iter().enumerate() {
            let options = json!({
                "attribution": base.attribution,
                "maxZoom": base.max_zoom,
            });
            let layer = leaflet::tile_layer(&base.url_template, &to_js(&options));
            if index == 0 {
                layer.add_to(&map);
            }
            js_sys::Reflect::set(&base_layers, &JsValue::from_str(&base.name), &layer)?;
        }
        leaflet::control_layers(&base_layers, &JsValue::NULL).add_control_to(&map);

        Ok(Self {
            map,
            census: Rc::new(config.census.clone()),
            panel: Rc::new(OnceCell::new()),
        })
    }

    /// Lets click handlers reach the panel that owns this surface.
    pub fn bind(panel: &SharedPanel) {
        let handle = panel.borrow().surface().panel.clone();
        if handle.set(Rc::downgrade(panel)).is_err() {
            log::warn!("map surface was already bound to a panel");
        }
    }
}

impl MapSurface for LeafletSurface {
    type Overlay = LeafletOverlay;

    fn add_overlay(&mut self, descriptor: &LayerDescriptor, data: FeatureCollection) -> LeafletOverlay {
        let options = json!({ "style": { "color": descriptor.color.as_str() } });
        let layer = leaflet::geo_json(&to_js(&data), &to_js(&options));

        let on_click = descriptor.lookup_enabled.then(|| {
            let handler = click_handler(descriptor.id, self.panel.clone(), self.census.clone());
            layer.on("click", handler.as_ref().unchecked_ref());
            handler
        });

        layer.add_to(&self.map);
        LeafletOverlay {
            layer,
            _on_click: on_click,
        }
    }

    fn remove_overlay(&mut self, overlay: LeafletOverlay) {
        overlay.layer.remove();
    }

    fn open_popup(&mut self, at: LatLng, outcome: &LookupOutcome) {
        leaflet::popup()
            .set_lat_lng(&lat_lng(at))
            .set_content(&popup_html(outcome))
            .open_on(&self.map);
    }
}

fn click_handler(
    layer: LayerId,
    panel: PanelHandle,
    census: Rc<CensusConfig>,
) -> Closure<dyn FnMut(JsValue)> {
    Closure::new(move |event: JsValue| {
        let Some((at, properties)) = read_click(&event) else {
            log::warn!("click on layer {layer} without a feature");
            return;
        };
        let Some(panel) = panel.get().and_then(Weak::upgrade) else {
            return;
        };

        let lookup = panel.borrow().lookup_for(layer, &properties);
        let query = match lookup {
            Ok(Some(query)) => query,
            Ok(None) => return,
            Err(e) => {
                panel.borrow_mut().show_lookup(at, &Err(e));
                return;
            }
        };

        let panel = Rc::downgrade(&panel);
        let census = census.clone();
        spawn_local(async move {
            let outcome = fetch::lookup(&query, &census).await;
            if let Err(e) = &outcome {
                log::warn!("lookup for {} failed: {e}", query.scope());
            }
            if let Some(panel) = panel.upgrade() {
                panel.borrow_mut().show_lookup(at, &outcome);
            }
        });
    })
}

/// `e.latlng` and `e.layer.feature.properties` from a Leaflet click event.
fn read_click(event: &JsValue) -> Option<(LatLng, FeatureProperties)> {
    let get = |target: &JsValue, key: &str| {
        js_sys::Reflect::get(target, &JsValue::from_str(key))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    };

    let latlng = get(event, "latlng")?;
    let at = LatLng::new(get(&latlng, "lat")?.as_f64()?, get(&latlng, "lng")?.as_f64()?);

    let properties = get(event, "layer")
        .and_then(|layer| get(&layer, "feature"))
        .and_then(|feature| get(&feature, "properties"))
        .and_then(|properties| serde_wasm_bindgen::from_value(properties).ok())
        .unwrap_or_default();

    Some((at, properties))
}
