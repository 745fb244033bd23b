//! Entity model: the engine's view of a node box.
//!
//! Caller boxes are anchored at their top-left corner, while the simulation
//! works with centers. This module converts between the two and tags every
//! entity with its [`EntityKind`] once, at ingest.

use flowlayout_core::geometry::{Bounds, Size, Vector2};

use crate::{LayoutError, model::NodeBox, physics::Body};

const INPUT_ANCHOR_PREFIX: &str = "node-input";
const OUTPUT_ANCHOR_PREFIX: &str = "node-output";

/// Largest coordinate or box extent accepted at ingest, in canvas units.
///
/// Force terms stay within `f32` range for inputs inside this bound and
/// constants of the default order.
pub const MAX_COORDINATE: f32 = 1.0e7;

/// Smallest mass accepted at ingest.
pub const MIN_MASS: f32 = 1.0e-3;

/// Largest mass accepted at ingest.
pub const MAX_MASS: f32 = 1.0e6;

/// What a simulated entity stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// An ordinary node box.
    Plain,
    /// The point where a flow's inputs sit; kept above output anchors.
    InputAnchor,
    /// The point where a flow's outputs sit; kept below input anchors.
    OutputAnchor,
}

impl EntityKind {
    /// Classifies a node by its id prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowlayout::entity::EntityKind;
    /// assert_eq!(EntityKind::from_id("node-input-request"), EntityKind::InputAnchor);
    /// assert_eq!(EntityKind::from_id("node-output-response"), EntityKind::OutputAnchor);
    /// assert_eq!(EntityKind::from_id("add-1"), EntityKind::Plain);
    /// ```
    pub fn from_id(id: &str) -> Self {
        if id.starts_with(INPUT_ANCHOR_PREFIX) {
            EntityKind::InputAnchor
        } else if id.starts_with(OUTPUT_ANCHOR_PREFIX) {
            EntityKind::OutputAnchor
        } else {
            EntityKind::Plain
        }
    }
}

/// One simulated node: identity, footprint and moving body.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: String,
    kind: EntityKind,
    size: Size,
    body: Body,
}

impl Entity {
    /// Builds an entity from a caller box, placing its body at the box center.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidNode`] if the box has non-finite
    /// coordinates, a negative or non-finite size, a coordinate or extent
    /// beyond [`MAX_COORDINATE`], or a mass that is not positive or falls
    /// outside [`MIN_MASS`]..=[`MAX_MASS`].
    pub fn ingest(id: &str, node: &NodeBox, default_mass: f32) -> Result<Self, LayoutError> {
        let top_left = node.top_left();
        if !top_left.is_finite() {
            return Err(LayoutError::invalid_node(
                id,
                format!("position {top_left:?} is not finite"),
            ));
        }
        if top_left.x().abs() > MAX_COORDINATE || top_left.y().abs() > MAX_COORDINATE {
            return Err(LayoutError::invalid_node(
                id,
                format!("position {top_left:?} is outside ±{MAX_COORDINATE}"),
            ));
        }
        let size = node.size();
        if !size.is_valid() {
            return Err(LayoutError::invalid_node(
                id,
                format!("size {size:?} must be finite and not negative"),
            ));
        }
        if size.width() > MAX_COORDINATE || size.height() > MAX_COORDINATE {
            return Err(LayoutError::invalid_node(
                id,
                format!("size {size:?} exceeds {MAX_COORDINATE}"),
            ));
        }
        let mass = node.mass().unwrap_or(default_mass);
        if !mass.is_finite() || mass <= 0.0 {
            return Err(LayoutError::invalid_node(
                id,
                format!("mass must be positive, got {mass}"),
            ));
        }
        if !(MIN_MASS..=MAX_MASS).contains(&mass) {
            return Err(LayoutError::invalid_node(
                id,
                format!("mass must be between {MIN_MASS} and {MAX_MASS}, got {mass}"),
            ));
        }

        Ok(Self {
            id: id.to_string(),
            kind: EntityKind::from_id(id),
            size,
            body: Body::at_rest(node.center(), mass),
        })
    }

    /// Converts the entity back into a caller box anchored at its top-left.
    pub fn to_node_box(&self) -> NodeBox {
        let top_left = Bounds::new_from_center(self.body.position(), self.size).min_point();
        NodeBox::new(top_left, self.size)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Returns the current center position
    pub fn position(&self) -> Vector2 {
        self.body.position()
    }

    pub(crate) fn set_body(&mut self, body: Body) {
        self.body = body;
    }
}
