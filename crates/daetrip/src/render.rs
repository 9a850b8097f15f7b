//! Output adapters that turn an [`Itinerary`] into something a map client can draw.

use serde_json::{json, Map, Value};

use crate::geo::Coordinate;
use crate::itinerary::Itinerary;
use crate::recommendation::MapView;

/// Renders an itinerary, optionally framed by a map view.
pub trait ItineraryRenderer {
    type Output;

    fn render(&self, itinerary: &Itinerary, map: Option<&MapView>) -> Self::Output;
}

/// GeoJSON `FeatureCollection` with one point per stop, one line per routed leg and the
/// centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonRenderer;

impl ItineraryRenderer for GeoJsonRenderer {
    type Output = Value;

    fn render(&self, itinerary: &Itinerary, map: Option<&MapView>) -> Value {
        let mut features = Vec::new();

        for (index, site) in itinerary.sites().iter().enumerate() {
            let mut properties = Map::new();
            properties.insert("kind".into(), json!("site"));
            properties.insert("name".into(), json!(site.name));
            properties.insert("order".into(), json!(index + 1));
            if let Some(description) = &site.description {
                properties.insert("description".into(), json!(description));
            }
            if let Some(rating) = site.rating {
                properties.insert("rating".into(), json!(rating));
            }
            features.push(feature(point(site.coordinate()), Value::Object(properties)));
        }

        for segment in itinerary.segments() {
            if let Some(path) = &segment.path {
                let coordinates: Vec<Value> = path.coordinates.iter().map(position).collect();
                features.push(feature(
                    json!({ "type": "LineString", "coordinates": coordinates }),
                    json!({
                        "kind": "route",
                        "from": segment.from,
                        "to": segment.to,
                        "length_m": path.length_m(),
                    }),
                ));
            }
        }

        features.push(feature(
            point(itinerary.centroid()),
            json!({ "kind": "centroid" }),
        ));

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        if let Some(map) = map {
            collection["properties"] = json!({
                "title": map.title,
                "style": map.style,
                "radius_m": map.radius_m,
            });
        }
        collection
    }
}

// GeoJSON positions are [longitude, latitude].
fn position(coordinate: &Coordinate) -> Value {
    json!([coordinate.lon, coordinate.lat])
}

fn point(coordinate: Coordinate) -> Value {
    json!({ "type": "Point", "coordinates": position(&coordinate) })
}

fn feature(geometry: Value, properties: Value) -> Value {
    json!({ "type": "Feature", "geometry": geometry, "properties": properties })
}
