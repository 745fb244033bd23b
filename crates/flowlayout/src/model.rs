//! Caller-facing layout types.
//!
//! These are the shapes the editor exchanges with the engine: boxes keyed by
//! node id going in, the same boxes at new positions coming out. Field names
//! serialize in camelCase to match the editor's JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use flowlayout_core::geometry::{Bounds, Size, Vector2};

/// One node box as the caller sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeBox {
    top_left: Vector2,
    size: Size,
    /// Simulated mass; the configured default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mass: Option<f32>,
}

impl NodeBox {
    /// Creates a box from its top-left corner and size
    pub fn new(top_left: Vector2, size: Size) -> Self {
        Self {
            top_left,
            size,
            mass: None,
        }
    }

    /// Sets an explicit mass for this node
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn top_left(&self) -> Vector2 {
        self.top_left
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn mass(&self) -> Option<f32> {
        self.mass
    }

    /// Returns the center of the box
    pub fn center(&self) -> Vector2 {
        self.bounds().center()
    }

    /// Returns the area covered by the box
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.top_left, self.size)
    }
}

/// A directed edge: `from` should end up above `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    from: String,
    to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }
}

/// The graph to arrange.
///
/// Nodes keep their insertion order, which fixes the order entities are
/// visited in and makes seeded runs reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutInput {
    #[serde(default)]
    nodes: IndexMap<String, NodeBox>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl LayoutInput {
    pub fn new(nodes: IndexMap<String, NodeBox>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Adds or replaces a node
    pub fn with_node(mut self, id: impl Into<String>, node: NodeBox) -> Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Appends an edge
    pub fn with_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push(Edge::new(from, to));
        self
    }

    pub fn nodes(&self) -> &IndexMap<String, NodeBox> {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Why a simulation run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// Kinetic energy fell below the convergence threshold.
    Converged,
    /// The iteration budget ran out first.
    TimedOut,
    /// The caller raised the cancellation flag.
    Cancelled,
    /// There was nothing to lay out.
    Empty,
    /// Still running; only seen in per-iteration snapshots.
    Running,
}

/// The arranged graph plus convergence metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    nodes: IndexMap<String, NodeBox>,
    edges: Vec<Edge>,
    iterations_used: usize,
    timed_out: bool,
    final_energy: f32,
    termination: Termination,
}

impl LayoutOutput {
    pub(crate) fn new(
        nodes: IndexMap<String, NodeBox>,
        edges: Vec<Edge>,
        iterations_used: usize,
        final_energy: f32,
        termination: Termination,
    ) -> Self {
        Self {
            nodes,
            edges,
            iterations_used,
            timed_out: termination == Termination::TimedOut,
            final_energy,
            termination,
        }
    }

    /// Returns the laid-out boxes, in input order
    pub fn nodes(&self) -> &IndexMap<String, NodeBox> {
        &self.nodes
    }

    /// Returns a single laid-out box
    pub fn node(&self, id: &str) -> Option<&NodeBox> {
        self.nodes.get(id)
    }

    /// Returns the edges exactly as they were passed in
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn iterations_used(&self) -> usize {
        self.iterations_used
    }

    /// Returns true if the iteration budget ran out before the layout settled
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Returns the total kinetic energy after the last iteration
    pub fn final_energy(&self) -> f32 {
        self.final_energy
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Returns the area covered by all boxes, or `None` for an empty layout
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .values()
            .map(NodeBox::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}
