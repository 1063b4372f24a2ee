use census_map_core::config::CensusConfig;
use census_map_core::geojson::FeatureCollection;
use census_map_core::overlay::parse_feature_collection;
use census_map_core::{LanguageTable, LoadError, LookupError, LookupOutcome, LookupQuery};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

enum FetchError {
    Network(String),
    Status(u16),
}

fn js_error(value: JsValue) -> FetchError {
    FetchError::Network(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

async fn fetch_text(url: &str, mode: RequestMode) -> Result<String, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(mode);

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = response.dyn_into().map_err(js_error)?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| FetchError::Network(format!("{url}: body is not text")))
}

/// Overlay documents are served next to the page.
pub async fn fetch_layer(url: &str) -> Result<FeatureCollection, LoadError> {
    let text = fetch_text(url, RequestMode::SameOrigin)
        .await
        .map_err(|e| match e {
            FetchError::Network(message) => LoadError::Network(format!("{url}: {message}")),
            FetchError::Status(status) => LoadError::Network(format!("{url}: HTTP {status}")),
        })?;
    parse_feature_collection(&text)
}

pub async fn lookup(query: &LookupQuery, census: &CensusConfig) -> LookupOutcome {
    let scope = query.scope();
    log::info!("census lookup for {scope}");

    let body = fetch_text(&query.url(census), RequestMode::Cors)
        .await
        .map_err(|e| match e {
            FetchError::Network(message) => LookupError::Network(message),
            FetchError::Status(status) if status >= 500 => {
                LookupError::Network(format!("census API returned HTTP {status}"))
            }
            FetchError::Status(status) => {
                LookupError::Parse(format!("census API rejected the query with HTTP {status}"))
            }
        })?;

    LanguageTable::from_response(&body, &scope)
}
