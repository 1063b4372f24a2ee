use thiserror::Error;

use crate::domain::LayerId;

/// Failure while loading the GeoJSON document behind an overlay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to fetch overlay data: {0}")]
    Network(String),
    #[error("overlay data is not a valid feature collection: {0}")]
    Parse(String),
    #[error("overlay data contains no features")]
    Empty,
}

/// Failure anywhere in the click → query → response chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("feature has no usable STATE or COUNTY code")]
    MissingRegion,
    #[error("census request failed: {0}")]
    Network(String),
    #[error("census response could not be read: {0}")]
    Parse(String),
    #[error("census service returned no rows for {scope}")]
    Empty { scope: String },
}

impl LookupError {
    /// Text shown to the user in place of a result table.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Error: Unable to reach the census service".to_string(),
            Self::MissingRegion | Self::Parse(_) => {
                "Error: No language data for the selected area".to_string()
            }
            Self::Empty { scope } => format!("No language data available for {scope}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("no layer with id {0}")]
    UnknownLayer(LayerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one overlay layer must be configured")]
    NoLayers,
    #[error("layer '{label}' has an invalid colour '{value}' (expected #rrggbb)")]
    InvalidColor { label: String, value: String },
    #[error("layer '{0}' has an empty source url")]
    MissingSource(String),
    #[error("zoom level must be between 1 and 18, got {0}")]
    InvalidZoom(u8),
    #[error("census request timeout must be at least one second")]
    InvalidTimeout,
    #[error("census base url must not be empty")]
    MissingCensusUrl,
    #[error("failed to read map config: {0}")]
    Read(String),
}
