use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::graph::{NodeId, RoutingGraph};
use crate::geo::Coordinate;

#[derive(Debug)]
pub enum RoadNetworkError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateNode(NodeId),
    InvalidCoordinate(NodeId),
    UnknownNode { node: NodeId },
    InvalidLength { from: NodeId, to: NodeId },
}

impl fmt::Display for RoadNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadNetworkError::Io(err) => write!(f, "failed to read road network: {}", err),
            RoadNetworkError::Csv(err) => write!(f, "invalid road network CSV data: {}", err),
            RoadNetworkError::DuplicateNode(node) => {
                write!(f, "road node {} is defined more than once", node)
            }
            RoadNetworkError::InvalidCoordinate(node) => {
                write!(f, "road node {} has invalid coordinates", node)
            }
            RoadNetworkError::UnknownNode { node } => {
                write!(f, "edge references unknown road node {}", node)
            }
            RoadNetworkError::InvalidLength { from, to } => {
                write!(f, "edge {} -> {} has a negative or non-finite length", from, to)
            }
        }
    }
}

impl std::error::Error for RoadNetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoadNetworkError::Io(err) => Some(err),
            RoadNetworkError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RoadNetworkError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RoadNetworkError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct NodeRow {
    #[serde(alias = "osmid", alias = "node")]
    id: u64,
    #[serde(alias = "y", alias = "latitude")]
    lat: f64,
    #[serde(alias = "x", alias = "longitude")]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeRow {
    #[serde(alias = "u", alias = "source")]
    from: u64,
    #[serde(alias = "v", alias = "target")]
    to: u64,
    #[serde(default, alias = "length")]
    length_m: Option<f64>,
    #[serde(default, deserialize_with = "flag")]
    oneway: bool,
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        value.as_deref().map(|raw| raw.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "yes" | "1")
    ))
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: NodeId,
    length_m: f64,
}

/// Weighted road graph with node positions, routed with Dijkstra over edge length.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: BTreeMap<NodeId, Coordinate>,
    adjacency: HashMap<NodeId, Vec<Edge>>,
}

impl RoadNetwork {
    pub fn from_csv_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        nodes: P,
        edges: Q,
    ) -> Result<Self, RoadNetworkError> {
        let nodes = std::fs::File::open(nodes)?;
        let edges = std::fs::File::open(edges)?;
        Self::from_readers(nodes, edges)
    }

    /// Loads `id,lat,lon` node rows and `from,to[,length_m][,oneway]` edge rows.
    pub fn from_readers<N: Read, E: Read>(nodes: N, edges: E) -> Result<Self, RoadNetworkError> {
        let mut network = Self::default();

        let mut node_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(nodes);
        for record in node_reader.deserialize::<NodeRow>() {
            let row = record?;
            network.insert_node(NodeId(row.id), Coordinate::new(row.lat, row.lon))?;
        }

        let mut edge_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(edges);
        for record in edge_reader.deserialize::<EdgeRow>() {
            let row = record?;
            network.connect(NodeId(row.from), NodeId(row.to), row.length_m, row.oneway)?;
        }

        debug!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "loaded road network"
        );
        Ok(network)
    }

    pub fn insert_node(&mut self, id: NodeId, position: Coordinate) -> Result<(), RoadNetworkError> {
        if !position.is_valid() {
            return Err(RoadNetworkError::InvalidCoordinate(id));
        }
        if self.nodes.insert(id, position).is_some() {
            return Err(RoadNetworkError::DuplicateNode(id));
        }
        Ok(())
    }

    /// Adds an edge; a missing length falls back to the great-circle distance between the nodes.
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: Option<f64>,
        oneway: bool,
    ) -> Result<(), RoadNetworkError> {
        let start = self.position(from)?;
        let end = self.position(to)?;
        let length_m = length_m.unwrap_or_else(|| start.distance_m(&end));
        if !length_m.is_finite() || length_m < 0.0 {
            return Err(RoadNetworkError::InvalidLength { from, to });
        }

        self.adjacency
            .entry(from)
            .or_default()
            .push(Edge { to, length_m });
        if !oneway {
            self.adjacency.entry(to).or_default().push(Edge {
                to: from,
                length_m,
            });
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Directed edge count; two-way roads count twice.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Sum of the shortest edge lengths along `path`, or `None` if two nodes are not adjacent.
    pub fn path_length_m(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2)
            .map(|pair| self.edge_length(pair[0], pair[1]))
            .sum()
    }

    fn edge_length(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.adjacency
            .get(&from)?
            .iter()
            .filter(|edge| edge.to == to)
            .map(|edge| edge.length_m)
            .min_by(f64::total_cmp)
    }

    fn position(&self, node: NodeId) -> Result<Coordinate, RoadNetworkError> {
        self.nodes
            .get(&node)
            .copied()
            .ok_or(RoadNetworkError::UnknownNode { node })
    }
}

#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl RoutingGraph for RoadNetwork {
    /// Closest node by great-circle distance; ties go to the lowest id.
    fn nearest_node(&self, position: Coordinate) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (id, node) in &self.nodes {
            let distance = node.distance_m(&position);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((*id, distance)),
            }
        }
        best.map(|(id, _)| id)
    }

    fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        if !self.nodes.contains_key(&from) || !self.nodes.contains_key(&to) {
            return None;
        }

        let mut distances: HashMap<NodeId, f64> = HashMap::from([(from, 0.0)]);
        let mut previous: HashMap<NodeId, NodeId> = HashMap::new();
        let mut heap = BinaryHeap::from([Reverse(Frontier {
            cost: 0.0,
            node: from,
        })]);

        while let Some(Reverse(Frontier { cost, node })) = heap.pop() {
            if node == to {
                break;
            }
            if distances.get(&node).is_some_and(|best| cost > *best) {
                continue;
            }

            for edge in self.adjacency.get(&node).into_iter().flatten() {
                let next_cost = cost + edge.length_m;
                let improves = distances
                    .get(&edge.to)
                    .map_or(true, |known| next_cost < *known);
                if improves {
                    distances.insert(edge.to, next_cost);
                    previous.insert(edge.to, node);
                    heap.push(Reverse(Frontier {
                        cost: next_cost,
                        node: edge.to,
                    }));
                }
            }
        }

        if !distances.contains_key(&to) {
            return None;
        }

        let mut path = vec![to];
        let mut cursor = to;
        while cursor != from {
            cursor = *previous.get(&cursor)?;
            path.push(cursor);
        }
        path.reverse();
        Some(path)
    }

    fn node_position(&self, node: NodeId) -> Option<Coordinate> {
        self.nodes.get(&node).copied()
    }
}
