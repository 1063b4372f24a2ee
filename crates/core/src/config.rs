use serde::{Deserialize, Serialize};

use crate::domain::{HexColor, LatLng, LayerDescriptor, LayerId};
use crate::error::ConfigError;

pub const DEFAULT_CENSUS_BASE_URL: &str = "https://api.census.gov/data/2013/language";

/// Column order of every lookup response: LAN7, LAN, EST, LANLABEL, NAME.
pub const DEFAULT_CENSUS_FIELDS: &str = "LAN7,LAN,EST,LANLABEL,NAME";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub census: CensusConfig,
    pub view: ViewConfig,
    pub base_layers: Vec<BaseLayer>,
    pub layers: Vec<LayerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CensusConfig {
    pub base_url: String,
    pub fields: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: u8,
}

/// A raster tile source offered in the base layer control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseLayer {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub url: String,
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub lookup: bool,
}

impl LayerConfig {
    fn new(url: &str, label: &str, color: &str, lookup: bool) -> Self {
        Self {
            url: url.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            lookup,
        }
    }
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CENSUS_BASE_URL.to_string(),
            fields: DEFAULT_CENSUS_FIELDS.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        // Geographic centre of the contiguous US.
        Self {
            center: LatLng::new(39.82, -98.58),
            zoom: 4,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        let osm_attribution = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>";

        Self {
            census: CensusConfig::default(),
            view: ViewConfig::default(),
            base_layers: vec![
                BaseLayer {
                    name: "Satellite".to_string(),
                    url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
                    attribution: "Imagery &copy; Esri".to_string(),
                    max_zoom: 18,
                },
                BaseLayer {
                    name: "Streetview".to_string(),
                    url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                    attribution: osm_attribution.to_string(),
                    max_zoom: 18,
                },
            ],
            layers: vec![
                LayerConfig::new("/data/gz_2010_us_outline_20m.json", "US Country Border", "#ff0000", false),
                LayerConfig::new("/data/gz_2010_us_040_00_20m.json", "US State Borders", "#00ff00", true),
                LayerConfig::new("/data/gz_2010_us_050_00_20m.json", "Counties", "#6666ff", true),
                LayerConfig::new("/data/gz_2010_us_500_11_5m.json", "Congressional Districts", "#B500B5", false),
            ],
        }
    }
}

impl MapConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Read(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        if self.census.base_url.trim().is_empty() {
            return Err(ConfigError::MissingCensusUrl);
        }
        if self.census.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if !(1..=18).contains(&self.view.zoom) {
            return Err(ConfigError::InvalidZoom(self.view.zoom));
        }
        self.descriptors().map(|_| ())
    }

    /// Builds one descriptor per configured layer, in display order.
    pub fn descriptors(&self) -> Result<Vec<LayerDescriptor>, ConfigError> {
        self.layers
            .iter()
            .enumerate()
            .map(|(index, layer)| {
                if layer.url.trim().is_empty() {
                    return Err(ConfigError::MissingSource(layer.label.clone()));
                }
                let color = HexColor::parse(&layer.color).ok_or_else(|| ConfigError::InvalidColor {
                    label: layer.label.clone(),
                    value: layer.color.clone(),
                })?;

                Ok(LayerDescriptor {
                    id: LayerId(index),
                    source_url: layer.url.clone(),
                    label: layer.label.clone(),
                    color,
                    lookup_enabled: layer.lookup,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerConfig, MapConfig};
    use crate::error::ConfigError;

    #[test]
    fn default_config_is_valid_and_matches_the_classic_layers() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());

        let descriptors = config.descriptors().unwrap();
        let labels: Vec<_> = descriptors.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "US Country Border",
                "US State Borders",
                "Counties",
                "Congressional Districts"
            ]
        );

        let lookups: Vec<_> = descriptors.iter().map(|d| d.lookup_enabled).collect();
        assert_eq!(lookups, [false, true, true, false]);
        assert_eq!(descriptors[1].color.as_str(), "#00ff00");
    }

    #[test]
    fn rejects_empty_layer_list() {
        let config = MapConfig {
            layers: Vec::new(),
            ..MapConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoLayers));
    }

    #[test]
    fn rejects_bad_colour_with_layer_label() {
        let mut config = MapConfig::default();
        config.layers.push(LayerConfig {
            url: "/data/x.json".into(),
            label: "Broken".into(),
            color: "green".into(),
            lookup: false,
        });

        match config.validate() {
            Err(ConfigError::InvalidColor { label, .. }) => assert_eq!(label, "Broken"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = MapConfig::from_json(
            r##"{ "layers": [ { "url": "/data/states.json", "label": "States", "color": "#00ff00", "lookup": true } ] }"##,
        )
        .unwrap();

        assert_eq!(config.layers.len(), 1);
        assert_eq!(config.view.zoom, 4);
        assert_eq!(config.census.fields, "LAN7,LAN,EST,LANLABEL,NAME");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = MapConfig::default();
        config.census.timeout_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeout));

        let from_json = MapConfig::from_json(r#"{ "census": { "timeout_secs": 0 } }"#);
        assert_eq!(from_json, Err(ConfigError::InvalidTimeout));
    }

    #[test]
    fn zero_zoom_is_rejected() {
        let mut config = MapConfig::default();
        config.view.zoom = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidZoom(0)));
    }
}
