//! Tile graph: Nodes (tile centers), Corners (tile vertices) and Edges
//!
//! The graph is the planar dual of a convex hull of points on the unit
//! sphere. It is stored as an arena: every entity lives in a `Vec` owned by
//! [`Graph`] and is addressed by a typed index. Incidence lists hold edge
//! handles, so there are no reference cycles to manage.

mod build;

pub use build::build_from_hull;

use glam::Vec3;

use crate::error::{Result, WorldError};
use crate::terrain::TerrainCategory;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl $name {
            /// Position of the entity in its arena
            #[inline]
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(
    /// Handle to a [`Node`]
    NodeId
);
arena_id!(
    /// Handle to a [`Corner`]
    CornerId
);
arena_id!(
    /// Handle to an [`Edge`]
    EdgeId
);

/// Either end of an edge, used by [`Graph::relink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Node(NodeId),
    Corner(CornerId),
}

/// Kind of boundary between two tiles
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeKind {
    #[default]
    Regular,
    River,
}

/// Tile center
#[derive(Debug, Clone)]
pub struct Node {
    /// Height-scaled position; its length is the tile height
    pub position: Vec3,
    /// Terrain category
    pub category: TerrainCategory,
    edges: Vec<EdgeId>,
}

impl Node {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            category: TerrainCategory::default(),
            edges: Vec::new(),
        }
    }

    /// Direction of the tile center from the sphere center
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.position.normalize()
    }

    /// Distance of the tile center from the sphere center
    #[inline]
    pub fn height(&self) -> f32 {
        self.position.length()
    }

    /// Incident edges, in cyclic order once the graph is sorted
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// Tile vertex, shared by three tiles
#[derive(Debug, Clone)]
pub struct Corner {
    /// Height-scaled position
    pub position: Vec3,
    /// Scalar terrain height
    pub height: f32,
    edges: Vec<EdgeId>,
}

impl Corner {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            height: 1.0,
            edges: Vec::new(),
        }
    }

    /// Direction of the corner from the sphere center
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.position.normalize()
    }

    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// Boundary between two adjacent tiles
#[derive(Debug, Clone)]
pub struct Edge {
    nodes: [NodeId; 2],
    corners: [CornerId; 2],
    /// Regular boundary or river segment
    pub kind: EdgeKind,
    /// River width, 0 for regular edges
    pub river_width: f32,
}

impl Edge {
    /// The two tiles this edge separates
    #[inline]
    pub fn nodes(&self) -> [NodeId; 2] {
        self.nodes
    }

    /// The two tile vertices this edge joins
    #[inline]
    pub fn corners(&self) -> [CornerId; 2] {
        self.corners
    }

    #[inline]
    pub fn has_corner(&self, corner: CornerId) -> bool {
        self.corners[0] == corner || self.corners[1] == corner
    }

    /// The corner at the far end from `corner`
    #[inline]
    pub fn other_corner(&self, corner: CornerId) -> CornerId {
        if self.corners[0] == corner {
            self.corners[1]
        } else {
            self.corners[0]
        }
    }

    /// The tile on the far side from `node`
    #[inline]
    pub fn other_node(&self, node: NodeId) -> NodeId {
        if self.nodes[0] == node {
            self.nodes[1]
        } else {
            self.nodes[0]
        }
    }

    #[inline]
    pub fn is_river(&self) -> bool {
        self.kind == EdgeKind::River
    }
}

/// Arena owning every Node, Corner and Edge of one generated world
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    corners: Vec<Corner>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Create an empty graph with room for `node_count` tiles
    ///
    /// A triangulated sphere with `n` vertices has `2n - 4` faces and
    /// `3n - 6` edges.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            corners: Vec::with_capacity(node_count * 2),
            edges: Vec::with_capacity(node_count * 3),
        }
    }

    pub fn add_node(&mut self, position: Vec3) -> NodeId {
        self.nodes.push(Node::new(position));
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_corner(&mut self, position: Vec3) -> CornerId {
        self.corners.push(Corner::new(position));
        CornerId(self.corners.len() - 1)
    }

    /// Append an edge and register it with its four endpoints
    pub fn add_edge(&mut self, nodes: [NodeId; 2], corners: [CornerId; 2]) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            nodes,
            corners,
            kind: EdgeKind::Regular,
            river_width: 0.0,
        });
        for node in nodes {
            self.nodes[node.0].edges.push(id);
        }
        for corner in corners {
            self.corners[corner.0].edges.push(id);
        }
        id
    }

    /// Move one end of an edge from `old` to `new`
    ///
    /// The edge is removed from the old endpoint's incidence list and
    /// appended to the new one's.
    ///
    /// # Errors
    ///
    /// Returns `TopologyInconsistency` if `old` is not an endpoint of the
    /// edge or `old` and `new` are not the same kind of endpoint.
    pub fn relink(&mut self, edge: EdgeId, old: Endpoint, new: Endpoint) -> Result<()> {
        let slot = self.edges.get(edge.0).and_then(|e| match old {
            Endpoint::Node(n) => e.nodes.iter().position(|&x| x == n),
            Endpoint::Corner(c) => e.corners.iter().position(|&x| x == c),
        });
        let Some(slot) = slot else {
            return Err(WorldError::TopologyInconsistency(format!(
                "{:?} is not an endpoint of {:?}",
                old, edge
            )));
        };

        match (old, new) {
            (Endpoint::Node(old), Endpoint::Node(new)) if new.0 < self.nodes.len() => {
                self.nodes[old.0].edges.retain(|&e| e != edge);
                self.nodes[new.0].edges.push(edge);
                self.edges[edge.0].nodes[slot] = new;
            }
            (Endpoint::Corner(old), Endpoint::Corner(new)) if new.0 < self.corners.len() => {
                self.corners[old.0].edges.retain(|&e| e != edge);
                self.corners[new.0].edges.push(edge);
                self.edges[edge.0].corners[slot] = new;
            }
            _ => {
                return Err(WorldError::TopologyInconsistency(format!(
                    "cannot relink {:?} from {:?} to {:?}",
                    edge, old, new
                )))
            }
        }
        Ok(())
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn corner(&self, id: CornerId) -> &Corner {
        &self.corners[id.0]
    }

    #[inline]
    pub fn corner_mut(&mut self, id: CornerId) -> &mut Corner {
        &mut self.corners[id.0]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.0]
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn corners_mut(&mut self) -> &mut [Corner] {
        &mut self.corners
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId> {
        (0..self.corners.len()).map(CornerId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }

    /// Tiles sharing an edge with `node`, in incidence order
    pub fn node_neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[node.0]
            .edges
            .iter()
            .map(move |&e| self.edges[e.0].other_node(node))
    }

    /// Corners one edge away from `corner`, with the edge leading there
    pub fn corner_neighbors(&self, corner: CornerId) -> impl Iterator<Item = (EdgeId, CornerId)> + '_ {
        self.corners[corner.0]
            .edges
            .iter()
            .map(move |&e| (e, self.edges[e.0].other_corner(corner)))
    }

    /// Whether an edge already joins the two corners
    pub fn corners_connected(&self, a: CornerId, b: CornerId) -> bool {
        self.corners[a.0]
            .edges
            .iter()
            .any(|&e| self.edges[e.0].other_corner(a) == b)
    }

    /// Whether any tile around `corner` has the given category
    pub fn corner_touches(&self, corner: CornerId, category: TerrainCategory) -> bool {
        self.corners[corner.0].edges.iter().any(|&e| {
            let [n1, n2] = self.edges[e.0].nodes;
            self.nodes[n1.0].category == category || self.nodes[n2.0].category == category
        })
    }

    /// Number of river edges meeting at `corner`
    pub fn river_edge_count(&self, corner: CornerId) -> usize {
        self.corners[corner.0]
            .edges
            .iter()
            .filter(|&&e| self.edges[e.0].is_river())
            .count()
    }

    /// Order a node's incident edges so consecutive edges share a corner
    ///
    /// Starting from the first edge's first corner, each following slot is
    /// filled with the next edge touching the current corner, which then
    /// advances to that edge's other corner. A broken cycle leaves the
    /// remaining edges in their original order.
    pub fn sort_incident_edges(&mut self, node: NodeId) {
        let Self { nodes, edges, .. } = self;
        let list = &mut nodes[node.0].edges;
        if list.len() < 3 {
            return;
        }

        let mut current = edges[list[0].0].corners[0];
        for slot in 1..list.len() - 1 {
            if let Some(found) = (slot..list.len()).find(|&k| edges[list[k].0].has_corner(current)) {
                current = edges[list[found].0].other_corner(current);
                list.swap(slot, found);
            }
        }
    }

    /// Sort the incident edges of every node
    pub fn sort_all_incident_edges(&mut self) {
        for i in 0..self.nodes.len() {
            self.sort_incident_edges(NodeId(i));
        }
    }

    /// Whether every node can be reached from node 0
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![NodeId(0)];
        seen[0] = true;
        let mut reached = 1;
        while let Some(node) = stack.pop() {
            for next in self.node_neighbors(node) {
                if !seen[next.0] {
                    seen[next.0] = true;
                    reached += 1;
                    stack.push(next);
                }
            }
        }
        reached == self.nodes.len()
    }

    /// Verify the dual-graph invariants
    ///
    /// Every edge has two distinct corners, both of which bound both of its
    /// tiles; every corner has at least three edges; incidence lists agree
    /// with edge endpoints; the graph is connected.
    pub fn check_topology(&self) -> Result<()> {
        let fail = |msg: String| Err(WorldError::TopologyInconsistency(msg));

        for (i, edge) in self.edges.iter().enumerate() {
            let id = EdgeId(i);
            let [c1, c2] = edge.corners;
            if c1 == c2 {
                return fail(format!("{:?} joins {:?} to itself", id, c1));
            }
            for node in edge.nodes {
                if !self.nodes[node.0].edges.contains(&id) {
                    return fail(format!("{:?} missing from {:?}", id, node));
                }
                for corner in edge.corners {
                    let bounds = self.nodes[node.0]
                        .edges
                        .iter()
                        .any(|&e| self.edges[e.0].has_corner(corner));
                    if !bounds {
                        return fail(format!("{:?} does not bound {:?}", corner, node));
                    }
                }
            }
            for corner in edge.corners {
                if !self.corners[corner.0].edges.contains(&id) {
                    return fail(format!("{:?} missing from {:?}", id, corner));
                }
            }
        }

        for (i, corner) in self.corners.iter().enumerate() {
            if corner.edges.len() < 3 {
                return fail(format!(
                    "{:?} has {} edges",
                    CornerId(i),
                    corner.edges.len()
                ));
            }
        }

        if !self.is_connected() {
            return fail("graph is not connected".into());
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Tetrahedron dual: 4 nodes, 4 corners, 6 edges
    pub(crate) fn tetrahedron() -> Graph {
        let mut graph = Graph::with_capacity(4);
        let n: Vec<NodeId> = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ]
        .into_iter()
        .map(|p| graph.add_node(p.normalize()))
        .collect();

        // Corner i is the face opposite node i
        let faces = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];
        let c: Vec<CornerId> = faces
            .iter()
            .map(|f| {
                let sum: Vec3 = f.iter().map(|&k| graph.node(n[k]).position).sum();
                graph.add_corner(sum.normalize())
            })
            .collect();

        // Edge between nodes a and b joins the two faces containing both
        for a in 0..4 {
            for b in (a + 1)..4 {
                let shared: Vec<CornerId> = (0..4)
                    .filter(|&f| faces[f].contains(&a) && faces[f].contains(&b))
                    .map(|f| c[f])
                    .collect();
                graph.add_edge([n[a], n[b]], [shared[0], shared[1]]);
            }
        }
        graph
    }

    #[test]
    fn test_add_edge_registers_incidence() {
        let graph = tetrahedron();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.corner_count(), 4);
        assert_eq!(graph.edge_count(), 6);
        for node in graph.nodes() {
            assert_eq!(node.edges().len(), 3);
        }
        for corner in graph.corners() {
            assert_eq!(corner.edges().len(), 3);
        }
        graph.check_topology().unwrap();
    }

    #[test]
    fn test_relink_moves_incidence() {
        let mut graph = tetrahedron();
        let edge = EdgeId(0);
        let [old, _] = graph.edge(edge).corners();
        let new = CornerId((old.0 + 1) % 4);
        let new = if graph.edge(edge).has_corner(new) {
            CornerId((old.0 + 2) % 4)
        } else {
            new
        };
        let before = graph.corner(new).edges().len();

        graph
            .relink(edge, Endpoint::Corner(old), Endpoint::Corner(new))
            .unwrap();

        assert!(!graph.corner(old).edges().contains(&edge));
        assert_eq!(graph.corner(new).edges().len(), before + 1);
        assert_eq!(graph.corner(new).edges().last(), Some(&edge));
        assert!(graph.edge(edge).has_corner(new));
    }

    #[test]
    fn test_relink_rejects_non_endpoint() {
        let mut graph = tetrahedron();
        let edge = EdgeId(0);
        let [a, b] = graph.edge(edge).nodes();
        let outsider = graph
            .node_ids()
            .find(|&n| n != a && n != b)
            .unwrap();

        let result = graph.relink(edge, Endpoint::Node(outsider), Endpoint::Node(a));
        assert!(matches!(result, Err(WorldError::TopologyInconsistency(_))));

        let result = graph.relink(edge, Endpoint::Node(a), Endpoint::Corner(CornerId(0)));
        assert!(result.is_err());
    }

    #[test]
    fn test_sort_incident_edges_forms_cycle() {
        let mut graph = tetrahedron();
        graph.sort_all_incident_edges();
        for node in graph.nodes() {
            let edges = node.edges();
            for i in 0..edges.len() {
                let a = graph.edge(edges[i]);
                let b = graph.edge(edges[(i + 1) % edges.len()]);
                let shared = a.corners().iter().any(|&c| b.has_corner(c));
                assert!(shared, "consecutive edges must share a corner");
            }
        }
    }

    #[test]
    fn test_other_endpoints() {
        let graph = tetrahedron();
        let edge = graph.edge(EdgeId(0));
        let [n1, n2] = edge.nodes();
        let [c1, c2] = edge.corners();
        assert_eq!(edge.other_node(n1), n2);
        assert_eq!(edge.other_node(n2), n1);
        assert_eq!(edge.other_corner(c1), c2);
        assert!(graph.corners_connected(c1, c2));
    }

    #[test]
    fn test_corner_touches_category() {
        let mut graph = tetrahedron();
        let corner = CornerId(0);
        assert!(!graph.corner_touches(corner, TerrainCategory::Sea));

        // Corner 0 is opposite node 0 and touches nodes 1, 2 and 3
        graph.node_mut(NodeId(2)).category = TerrainCategory::Sea;
        assert!(graph.corner_touches(corner, TerrainCategory::Sea));
        assert!(graph.corner_touches(CornerId(2), TerrainCategory::Ground));
    }

    #[test]
    fn test_connectivity() {
        let graph = tetrahedron();
        assert!(graph.is_connected());
        assert_eq!(graph.node_neighbors(NodeId(0)).count(), 3);
    }
}
