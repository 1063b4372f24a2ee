use geo::{BoundingRect, Contains, Geometry, LineString, MultiLineString, MultiPolygon, Point, Rect};
use geojson::{FeatureCollection, GeoJson};

use crate::domain::{FeatureProperties, LatLng};
use crate::error::LoadError;

/// Parses an overlay document. Only feature collections are accepted.
pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection, LoadError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| LoadError::Parse(e.to_string()))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => {
            return Err(LoadError::Parse("expected a FeatureCollection, got a Feature".into()))
        }
        GeoJson::Geometry(_) => {
            return Err(LoadError::Parse("expected a FeatureCollection, got a Geometry".into()))
        }
    };

    if collection.features.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(collection)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Area(MultiPolygon<f64>),
    Path(MultiLineString<f64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFeature {
    pub properties: FeatureProperties,
    pub shape: Shape,
}

/// Overlay geometry in `geo` form, for front-ends that draw and hit-test
/// shapes themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    features: Vec<OverlayFeature>,
}

impl Overlay {
    /// Converts every polygonal or linear feature; points and features without
    /// geometry are skipped.
    pub fn from_collection(collection: &FeatureCollection) -> Self {
        let mut features = Vec::with_capacity(collection.features.len());

        for feature in &collection.features {
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            let geometry = match Geometry::<f64>::try_from(geometry.value.clone()) {
                Ok(geometry) => geometry,
                Err(error) => {
                    log::debug!("skipping feature with unsupported geometry: {error}");
                    continue;
                }
            };

            let properties = feature.properties.clone().unwrap_or_default();
            let mut polygons = Vec::new();
            let mut lines = Vec::new();
            flatten(geometry, &mut polygons, &mut lines);

            if !polygons.is_empty() {
                features.push(OverlayFeature {
                    properties: properties.clone(),
                    shape: Shape::Area(MultiPolygon(polygons)),
                });
            }
            if !lines.is_empty() {
                features.push(OverlayFeature {
                    properties,
                    shape: Shape::Path(MultiLineString(lines)),
                });
            }
        }

        Self { features }
    }

    pub fn features(&self) -> &[OverlayFeature] {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Properties of the topmost area containing `at`. Paths are never hit.
    pub fn feature_at(&self, at: LatLng) -> Option<&FeatureProperties> {
        let point = Point::new(at.lng, at.lat);
        self.features
            .iter()
            .rev()
            .find(|feature| match &feature.shape {
                Shape::Area(area) => area.contains(&point),
                Shape::Path(_) => false,
            })
            .map(|feature| &feature.properties)
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(|feature| match &feature.shape {
                Shape::Area(area) => area.bounding_rect(),
                Shape::Path(path) => path.bounding_rect(),
            })
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
    }
}

fn flatten(
    geometry: Geometry<f64>,
    polygons: &mut Vec<geo::Polygon<f64>>,
    lines: &mut Vec<LineString<f64>>,
) {
    match geometry {
        Geometry::Polygon(polygon) => polygons.push(polygon),
        Geometry::MultiPolygon(multi) => polygons.extend(multi.0),
        Geometry::LineString(line) => lines.push(line),
        Geometry::MultiLineString(multi) => lines.extend(multi.0),
        Geometry::GeometryCollection(collection) => {
            for geometry in collection.0 {
                flatten(geometry, polygons, lines);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_feature_collection, Overlay, Shape};
    use crate::domain::{region_code, LatLng};
    use crate::error::LoadError;

    const STATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "GEO_ID": "0400000US06", "STATE": "06", "NAME": "California" },
                "geometry": { "type": "Polygon", "coordinates": [[[-124.0, 32.0], [-114.0, 32.0], [-114.0, 42.0], [-124.0, 42.0], [-124.0, 32.0]]] }
            },
            {
                "type": "Feature",
                "properties": { "GEO_ID": "0400000US32", "STATE": "32", "NAME": "Nevada" },
                "geometry": { "type": "MultiPolygon", "coordinates": [[[[-120.0, 35.0], [-114.0, 35.0], [-114.0, 42.0], [-120.0, 42.0], [-120.0, 35.0]]]] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Border" },
                "geometry": { "type": "LineString", "coordinates": [[-130.0, 30.0], [-110.0, 45.0]] }
            }
        ]
    }"#;

    #[test]
    fn parses_collections_and_converts_shapes() {
        let collection = parse_feature_collection(STATES).unwrap();
        let overlay = Overlay::from_collection(&collection);

        assert_eq!(overlay.features().len(), 3);
        assert!(matches!(overlay.features()[0].shape, Shape::Area(_)));
        assert!(matches!(overlay.features()[2].shape, Shape::Path(_)));
    }

    #[test]
    fn hit_test_prefers_the_topmost_area() {
        let overlay = Overlay::from_collection(&parse_feature_collection(STATES).unwrap());

        let overlap = overlay.feature_at(LatLng::new(38.0, -117.0)).unwrap();
        assert_eq!(region_code(overlap, "STATE").as_deref(), Some("32"));

        let coast = overlay.feature_at(LatLng::new(36.0, -122.0)).unwrap();
        assert_eq!(region_code(coast, "STATE").as_deref(), Some("06"));

        assert!(overlay.feature_at(LatLng::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn bounds_cover_all_features() {
        let overlay = Overlay::from_collection(&parse_feature_collection(STATES).unwrap());
        let bounds = overlay.bounds().unwrap();

        assert!((bounds.min().x - -130.0).abs() < f64::EPSILON);
        assert!((bounds.max().y - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_collections_and_empty_collections() {
        let feature = r#"{ "type": "Feature", "properties": {}, "geometry": null }"#;
        assert!(matches!(parse_feature_collection(feature), Err(LoadError::Parse(_))));

        let empty = r#"{ "type": "FeatureCollection", "features": [] }"#;
        assert!(matches!(parse_feature_collection(empty), Err(LoadError::Empty)));

        assert!(matches!(parse_feature_collection("not json"), Err(LoadError::Parse(_))));
    }
}
