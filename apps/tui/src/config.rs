use census_map_core::MapConfig;
use color_eyre::eyre::{eyre, WrapErr};
use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};

/// Directory the default `/data/...` layer urls are resolved against.
const DEFAULT_LAYER_BASE: &str = "./public";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub map: MapConfig,
    pub layer_base: String,
    pub log_file: PathBuf,
}

/// Where an overlay document is read from once its url is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    Http(String),
    File(PathBuf),
}

impl LayerSource {
    /// Absolute `http(s)` urls are fetched as-is; anything else is joined
    /// onto `base`, which may itself be a url or a local directory.
    pub fn resolve(base: &str, url: &str) -> Self {
        if is_http(url) {
            return Self::Http(url.to_string());
        }

        let relative = url.trim_start_matches('/');
        if is_http(base) {
            Self::Http(format!("{}/{relative}", base.trim_end_matches('/')))
        } else {
            Self::File(Path::new(base).join(relative))
        }
    }
}

impl std::fmt::Display for LayerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_http(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Loads `.env`, an optional JSON map config from `MAP_CONFIG`, then the
/// individual environment overrides.
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    dotenv().ok();

    let mut map = match env::var("MAP_CONFIG") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("Failed to read map config {path}"))?;
            MapConfig::from_json(&text).map_err(|e| eyre!("{path}: {e}"))?
        }
        Err(_) => MapConfig::default(),
    };

    if let Ok(key) = env::var("CENSUS_API_KEY") {
        map.census.api_key = Some(key).filter(|key| !key.trim().is_empty());
    }
    if let Ok(url) = env::var("CENSUS_BASE_URL") {
        map.census.base_url = url;
    }
    if let Ok(timeout) = env::var("CENSUS_TIMEOUT_SECS") {
        map.census.timeout_secs = timeout
            .parse()
            .wrap_err_with(|| format!("CENSUS_TIMEOUT_SECS must be a number, got {timeout}"))?;
    }

    map.validate().map_err(|e| eyre!("Invalid map config: {e}"))?;

    let layer_base = env::var("LAYER_BASE").unwrap_or_else(|_| DEFAULT_LAYER_BASE.to_string());
    let log_file = env::var("LOG_FILE").map_or_else(|_| PathBuf::from("census-map.log"), PathBuf::from);

    Ok(AppConfig {
        map,
        layer_base,
        log_file,
    })
}

/// Debug logging goes to a file so it never paints over the alternate screen.
pub fn debug_enabled() -> bool {
    env::var("DEBUG").is_ok_and(|value| value != "0" && !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::LayerSource;
    use std::path::PathBuf;

    #[test]
    fn absolute_urls_are_fetched_directly() {
        assert_eq!(
            LayerSource::resolve("./public", "https://example.org/states.json"),
            LayerSource::Http("https://example.org/states.json".into())
        );
    }

    #[test]
    fn site_relative_urls_join_onto_a_directory() {
        assert_eq!(
            LayerSource::resolve("./public", "/data/gz_2010_us_040_00_20m.json"),
            LayerSource::File(PathBuf::from("./public/data/gz_2010_us_040_00_20m.json"))
        );
    }

    #[test]
    fn site_relative_urls_join_onto_a_remote_base() {
        assert_eq!(
            LayerSource::resolve("http://localhost:3000/", "/data/counties.json"),
            LayerSource::Http("http://localhost:3000/data/counties.json".into())
        );
    }
}
