//! Ordered visiting plans built from catalog sites, with optional road paths between stops.

mod graph;
mod network;

pub use graph::{NodeId, RoutingGraph};
pub use network::{RoadNetwork, RoadNetworkError};

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::catalog::Site;
use crate::geo::{self, Coordinate};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItineraryError {
    #[error("an itinerary needs at least one site")]
    EmptySelection,
}

/// Road path between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePath {
    pub nodes: Vec<NodeId>,
    pub coordinates: Vec<Coordinate>,
}

impl RoutePath {
    /// Great-circle length of the path geometry in meters.
    pub fn length_m(&self) -> f64 {
        self.coordinates
            .windows(2)
            .map(|pair| pair[0].distance_m(&pair[1]))
            .sum()
    }
}

/// Leg between two consecutive stops. `path` is `None` when no route was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub from: String,
    pub to: String,
    pub from_node: Option<NodeId>,
    pub to_node: Option<NodeId>,
    pub path: Option<RoutePath>,
}

impl RouteSegment {
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }
}

/// Sites in visiting order plus the per-leg routes computed at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    sites: Vec<Site>,
    segments: Vec<RouteSegment>,
}

impl Itinerary {
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    /// Mean latitude and longitude of the stops.
    pub fn centroid(&self) -> Coordinate {
        // `build` rejects empty selections, so the fallback is never taken.
        geo::centroid(self.sites.iter().map(Site::coordinate))
            .unwrap_or(Coordinate::new(f64::NAN, f64::NAN))
    }

    pub fn site_names(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(|site| site.name.as_str())
    }
}

#[derive(Serialize)]
struct ItineraryView<'a> {
    centroid: Coordinate,
    sites: &'a [Site],
    #[serde(skip_serializing_if = "<[RouteSegment]>::is_empty")]
    segments: &'a [RouteSegment],
}

impl Serialize for Itinerary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ItineraryView {
            centroid: self.centroid(),
            sites: &self.sites,
            segments: &self.segments,
        }
        .serialize(serializer)
    }
}

/// Builds an itinerary that visits `sites` in the given order.
///
/// With a transport graph every consecutive pair gets a segment; legs the graph cannot
/// route keep `path: None` and the remaining legs are still computed.
pub fn build(
    sites: Vec<Site>,
    transport: Option<&dyn RoutingGraph>,
) -> Result<Itinerary, ItineraryError> {
    if sites.is_empty() {
        return Err(ItineraryError::EmptySelection);
    }

    let segments = match transport {
        Some(graph) => sites
            .windows(2)
            .map(|pair| route_segment(graph, &pair[0], &pair[1]))
            .collect(),
        None => Vec::new(),
    };

    debug!(
        sites = sites.len(),
        segments = segments.len(),
        "built itinerary"
    );

    Ok(Itinerary { sites, segments })
}

fn route_segment(graph: &dyn RoutingGraph, from: &Site, to: &Site) -> RouteSegment {
    let from_node = graph.nearest_node(from.coordinate());
    let to_node = graph.nearest_node(to.coordinate());

    let path = match (from_node, to_node) {
        (Some(start), Some(end)) => graph
            .shortest_path(start, end)
            .filter(|nodes| !nodes.is_empty())
            .and_then(|nodes| {
                // A node without a position leaves the leg unroutable rather than misaligned.
                let coordinates = nodes
                    .iter()
                    .map(|node| graph.node_position(*node))
                    .collect::<Option<Vec<_>>>()?;
                Some(RoutePath { nodes, coordinates })
            }),
        _ => None,
    };

    if path.is_none() {
        warn!(
            from = %from.name,
            to = %to.name,
            ?from_node,
            ?to_node,
            "no road path between stops"
        );
    }

    RouteSegment {
        from: from.name.clone(),
        to: to.name.clone(),
        from_node,
        to_node,
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    /// Graph with one node per site and a fixed table of reachable pairs.
    struct StubGraph {
        nodes: BTreeMap<NodeId, Coordinate>,
        routes: HashMap<(NodeId, NodeId), Vec<NodeId>>,
    }

    impl RoutingGraph for StubGraph {
        fn nearest_node(&self, position: Coordinate) -> Option<NodeId> {
            self.nodes
                .iter()
                .find(|(_, coordinate)| **coordinate == position)
                .map(|(id, _)| *id)
        }

        fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
            self.routes.get(&(from, to)).cloned()
        }

        fn node_position(&self, node: NodeId) -> Option<Coordinate> {
            self.nodes.get(&node).copied()
        }
    }

    fn triangle() -> Vec<Site> {
        vec![
            Site::new("A", 0.0, 0.0),
            Site::new("B", 0.0, 2.0),
            Site::new("C", 2.0, 0.0),
        ]
    }

    #[test]
    fn centroid_is_the_mean_of_the_stops_in_any_order() {
        let forward = build(triangle(), None).expect("itinerary");
        let mut reversed_sites = triangle();
        reversed_sites.reverse();
        let reversed = build(reversed_sites, None).expect("itinerary");

        for itinerary in [&forward, &reversed] {
            let centroid = itinerary.centroid();
            assert!((centroid.lat - 2.0 / 3.0).abs() < 1e-9);
            assert!((centroid.lon - 2.0 / 3.0).abs() < 1e-9);
        }

        assert_eq!(forward.site_names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(reversed.site_names().collect::<Vec<_>>(), vec!["C", "B", "A"]);
        assert!(forward.segments().is_empty());
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert_eq!(
            build(Vec::new(), None).expect_err("empty"),
            ItineraryError::EmptySelection
        );
    }

    #[test]
    fn unroutable_leg_is_recorded_without_aborting_the_rest() {
        let graph = StubGraph {
            nodes: [
                (NodeId(1), Coordinate::new(0.0, 0.0)),
                (NodeId(2), Coordinate::new(0.0, 2.0)),
                (NodeId(3), Coordinate::new(2.0, 0.0)),
            ]
            .into_iter()
            .collect(),
            // A to B is reachable, B to C is not.
            routes: [((NodeId(1), NodeId(2)), vec![NodeId(1), NodeId(2)])]
                .into_iter()
                .collect(),
        };

        let itinerary = build(triangle(), Some(&graph)).expect("itinerary");
        let segments = itinerary.segments();
        assert_eq!(segments.len(), 2);

        let first = &segments[0];
        assert_eq!((first.from.as_str(), first.to.as_str()), ("A", "B"));
        let path = first.path.as_ref().expect("A to B has a path");
        assert_eq!(path.nodes, vec![NodeId(1), NodeId(2)]);
        assert_eq!(
            path.coordinates,
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0)]
        );
        assert!(path.length_m() > 0.0);

        let second = &segments[1];
        assert_eq!((second.from.as_str(), second.to.as_str()), ("B", "C"));
        assert_eq!(second.from_node, Some(NodeId(2)));
        assert_eq!(second.to_node, Some(NodeId(3)));
        assert!(!second.has_path());
    }

    #[test]
    fn empty_graph_leaves_every_leg_without_a_path() {
        let graph = StubGraph {
            nodes: BTreeMap::new(),
            routes: HashMap::new(),
        };
        let itinerary = build(triangle(), Some(&graph)).expect("itinerary");
        assert!(itinerary
            .segments()
            .iter()
            .all(|segment| segment.from_node.is_none() && !segment.has_path()));
    }

    #[test]
    fn single_stop_has_no_segments() {
        let graph = StubGraph {
            nodes: BTreeMap::new(),
            routes: HashMap::new(),
        };
        let itinerary = build(vec![Site::new("A", 36.0, 127.0)], Some(&graph)).expect("one stop");
        assert!(itinerary.segments().is_empty());
        assert_eq!(itinerary.centroid(), Coordinate::new(36.0, 127.0));
    }

    #[test]
    fn leg_through_an_unplaced_node_has_no_path() {
        let mut graph = StubGraph {
            nodes: [
                (NodeId(1), Coordinate::new(0.0, 0.0)),
                (NodeId(2), Coordinate::new(0.0, 2.0)),
                (NodeId(3), Coordinate::new(2.0, 0.0)),
            ]
            .into_iter()
            .collect(),
            routes: HashMap::new(),
        };
        // B to C detours through node 9, which the graph cannot place.
        graph
            .routes
            .insert((NodeId(1), NodeId(2)), vec![NodeId(1), NodeId(2)]);
        graph
            .routes
            .insert((NodeId(2), NodeId(3)), vec![NodeId(2), NodeId(9), NodeId(3)]);

        let itinerary = build(triangle(), Some(&graph)).expect("itinerary");
        let segments = itinerary.segments();

        let first = segments[0].path.as_ref().expect("A to B is placed");
        assert_eq!(first.nodes.len(), first.coordinates.len());
        assert!(!segments[1].has_path());
        assert_eq!(segments[1].to_node, Some(NodeId(3)));
    }

    #[test]
    fn centroid_matches_the_geographic_mean_of_the_stops() {
        let itinerary = build(triangle(), None).expect("itinerary");
        let expected = geo::centroid(triangle().iter().map(Site::coordinate)).expect("non-empty");
        assert_eq!(itinerary.centroid(), expected);
    }

    #[test]
    fn serializes_with_derived_centroid() {
        let itinerary = build(triangle(), None).expect("itinerary");
        let value = serde_json::to_value(&itinerary).expect("serialize");
        assert_eq!(value["sites"].as_array().map(Vec::len), Some(3));
        assert!(value.get("segments").is_none());
        let lat = value["centroid"]["lat"].as_f64().expect("lat");
        assert!((lat - 2.0 / 3.0).abs() < 1e-9);
    }
}
