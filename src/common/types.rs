use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::error::Result;

/// A WGS84 point. Serialized as `[lon, lat]`, the GeoJSON axis order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for Position {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

impl From<Position> for (f64, f64) {
    fn from(p: Position) -> Self {
        (p.lon, p.lat)
    }
}

/// Which feed a feature came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Seismic,
    Weather,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Seismic => "seismic",
            Category::Weather => "weather",
        }
    }
}

/// One renderable point with display-ready attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub position: Position,
    pub category: Category,
    /// Pre-formatted strings keyed by field name
    pub attributes: BTreeMap<String, String>,
    /// Where the data came from; synthetic data carries its own tag
    pub provenance: String,
}

impl Feature {
    pub fn new(position: Position, category: Category, provenance: impl Into<String>) -> Self {
        Self {
            position,
            category,
            attributes: BTreeMap::new(),
            provenance: provenance.into(),
        }
    }

    /// Builder-style attribute insertion
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Ordered features; order follows the source's iteration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            features: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Number of features tagged with the given provenance
    pub fn count_provenance(&self, provenance: &str) -> usize {
        self.features
            .iter()
            .filter(|f| f.provenance == provenance)
            .count()
    }

    /// GeoJSON view of the collection, as consumed by the map front end
    pub fn to_geojson(&self) -> geojson::Entity<'_> {
        geojson::Entity::FeatureCollection {
            features: self.features.iter().map(geojson::Entity::from).collect(),
        }
    }

    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_geojson())?)
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

pub mod geojson {
    use std::collections::BTreeMap;

    use serde::Serialize;

    use super::Feature;

    #[derive(Debug, Serialize)]
    #[serde(tag = "type")]
    pub enum Geometry {
        Point { coordinates: (f64, f64) },
    }

    #[derive(Debug, Serialize)]
    #[serde(tag = "type")]
    pub enum Entity<'a> {
        Feature {
            geometry: Geometry,
            properties: BTreeMap<&'a str, &'a str>,
        },
        FeatureCollection {
            features: Vec<Entity<'a>>,
        },
    }

    impl<'a> From<&'a Feature> for Entity<'a> {
        fn from(f: &'a Feature) -> Self {
            let mut properties: BTreeMap<&str, &str> = f
                .attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            properties.insert("category", f.category.as_str());
            properties.insert("provenance", f.provenance.as_str());
            Entity::Feature {
                geometry: Geometry::Point {
                    coordinates: f.position.into(),
                },
                properties,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_geojson_shape() {
        let collection: FeatureCollection = vec![Feature::new(
            Position::new(127.52, -6.62),
            Category::Seismic,
            "BMKG",
        )
        .with("magnitude", "5.1")]
        .into_iter()
        .collect();

        let value: Value = serde_json::from_str(&collection.to_geojson_string().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [127.52, -6.62] },
                    "properties": {
                        "category": "seismic",
                        "magnitude": "5.1",
                        "provenance": "BMKG"
                    }
                }]
            })
        );
    }

    #[test]
    fn test_position_serializes_lon_first() {
        let v = serde_json::to_value(Position::new(106.8456, -6.2088)).unwrap();
        assert_eq!(v, json!([106.8456, -6.2088]));
    }

    #[test]
    fn test_count_provenance() {
        let mut c = FeatureCollection::new();
        c.push(Feature::new(Position::new(1.0, 1.0), Category::Weather, "a"));
        c.push(Feature::new(Position::new(1.0, 1.0), Category::Weather, "b"));
        c.push(Feature::new(Position::new(1.0, 1.0), Category::Weather, "a"));
        assert_eq!(c.count_provenance("a"), 2);
        assert_eq!(c.count_provenance("c"), 0);
        assert_eq!(c.len(), 3);
    }
}
