use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key/value mapping attached to a GeoJSON feature.
pub type FeatureProperties = serde_json::Map<String, Value>;

/// Position of a descriptor in the configured layer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub usize);

impl LayerId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A `#rrggbb` colour as written in the layer config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor {
    raw: String,
    rgb: (u8, u8, u8),
}

impl HexColor {
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        let rgb = (channel(0..2)?, channel(2..4)?, channel(4..6)?);

        Some(Self {
            raw: value.trim().to_string(),
            rgb,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub const fn rgb(&self) -> (u8, u8, u8) {
        self.rgb
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Static description of one toggleable overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDescriptor {
    pub id: LayerId,
    pub source_url: String,
    pub label: String,
    pub color: HexColor,
    pub lookup_enabled: bool,
}

/// Reads a numeric region code (`STATE`, `COUNTY`) from feature properties.
///
/// Census boundary files carry codes as zero-padded strings, other sources as
/// integers. Both are returned as their decimal digits; anything else
/// (negative numbers, non-digit strings, `null`) counts as absent.
pub fn region_code(properties: &FeatureProperties, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(code) => {
            let code = code.trim();
            (!code.is_empty() && code.chars().all(|c| c.is_ascii_digit())).then(|| code.to_string())
        }
        Value::Number(number) => number.as_u64().map(|code| code.to_string()),
        _ => None,
    }
}
