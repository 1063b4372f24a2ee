// Shared by the terminal and browser front-ends; nothing in here performs I/O.
pub mod census;
pub mod config;
pub mod domain;
pub mod error;
pub mod overlay;
pub mod panel;

pub use census::{popup_html, LanguageTable, LookupOutcome, LookupQuery};
pub use config::MapConfig;
pub use domain::{FeatureProperties, HexColor, LatLng, LayerDescriptor, LayerId};
pub use error::{ConfigError, LoadError, LookupError, PanelError};
pub use panel::{LayerItem, LayerStatus, LoadOutcome, LoadTicket, MapPanel, MapSurface};

/// Re-exported so front-ends name the same `FeatureCollection` the panel uses.
pub use geojson;
