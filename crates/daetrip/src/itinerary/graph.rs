use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Identifier of a road-network node, as exported by the graph source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport graph capability used to attach paths to itinerary segments.
pub trait RoutingGraph: Send + Sync {
    /// Node closest to `position`, or `None` when the graph has no nodes.
    fn nearest_node(&self, position: Coordinate) -> Option<NodeId>;

    /// Node sequence from `from` to `to`, both inclusive, or `None` when unreachable.
    fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>>;

    /// Position of `node`. A path containing a node without a position is treated as
    /// unroutable.
    fn node_position(&self, node: NodeId) -> Option<Coordinate>;
}
