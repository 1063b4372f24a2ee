mod fetch;
mod layer_item;
mod leaflet;
mod surface;

use std::cell::RefCell;
use std::rc::Rc;

use census_map_core::{MapConfig, MapPanel};
use wasm_bindgen::JsValue;

use surface::LeafletSurface;

const MAP_CONTAINER: &str = "map";
const LAYER_LIST: &str = "layerList";

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

    if let Err(e) = start() {
        log::error!("failed to start the map: {e:?}");
    }
}

fn start() -> Result<(), JsValue> {
    let mut config = MapConfig::default();
    config.census.api_key = option_env!("CENSUS_API_KEY")
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string);
    if config.census.api_key.is_none() {
        log::warn!("CENSUS_API_KEY was not set at build time, lookups are unauthenticated");
    }

    let surface = LeafletSurface::create(MAP_CONTAINER, &config)?;
    let panel = MapPanel::new(&config, surface).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let panel = Rc::new(RefCell::new(panel));
    LeafletSurface::bind(&panel);

    layer_item::render_layer_list(LAYER_LIST, &panel)?;
    log::info!("map ready with {} layers", panel.borrow().descriptors().len());
    Ok(())
}
