//! Force field computation.
//!
//! Every iteration the [`ForceField`] walks all entity pairs, every entity,
//! and every resolved edge, adding its contributions to a force accumulator
//! that is laid out like the entity arena. Pair and edge forces are always
//! split evenly: each side receives half of the magnitude, in opposite
//! directions.
//!
//! The rules, in order of application:
//!
//! 1. **Separation** - vertically close entities push apart sideways
//! 2. **Alignment** - nearly level entities pull onto one row
//! 3. **Ordering** - input anchors are pushed above output anchors
//! 4. **Centering** - every entity drifts toward `x = 0`
//! 5. **Springs** - each edge holds `from` a fixed distance above `to`

use rand::Rng;

use flowlayout_core::geometry::Vector2;

use crate::{
    config::ForceConfig,
    entity::{Entity, EntityKind},
};

/// An edge resolved to indices into the entity arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spring {
    from: usize,
    to: usize,
}

impl Spring {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// The force rules for one simulation run.
#[derive(Debug, Clone)]
pub struct ForceField<'a> {
    config: &'a ForceConfig,
    springs: Vec<Spring>,
}

impl<'a> ForceField<'a> {
    /// Create a force field over already-resolved springs
    pub fn new(config: &'a ForceConfig, springs: Vec<Spring>) -> Self {
        Self { config, springs }
    }

    /// Adds this iteration's forces for `entities` into `forces`.
    ///
    /// `forces` must be as long as `entities`; entry `i` receives the forces
    /// acting on entity `i`. Existing values are added to, not replaced.
    /// `rng` is only consulted when two entities share the same `x`.
    pub fn accumulate<R: Rng + ?Sized>(
        &self,
        entities: &[Entity],
        forces: &mut [Vector2],
        rng: &mut R,
    ) {
        debug_assert_eq!(entities.len(), forces.len());

        for i in 0..entities.len() {
            for j in (i + 1)..entities.len() {
                self.apply_pair(i, j, entities, forces, rng);
            }
        }

        for (entity, force) in entities.iter().zip(forces.iter_mut()) {
            let pull = Vector2::new(-self.config.centering_strength() * entity.position().x(), 0.0);
            *force = force.add_vector(pull);
        }

        for spring in &self.springs {
            self.apply_spring(*spring, entities, forces);
        }
    }

    fn apply_pair<R: Rng + ?Sized>(
        &self,
        i: usize,
        j: usize,
        entities: &[Entity],
        forces: &mut [Vector2],
        rng: &mut R,
    ) {
        let delta = entities[i].position().sub_vector(entities[j].position());
        let (dx, dy) = (delta.x(), delta.y());

        if dy.abs() < self.config.min_vertical_distance_for_separation()
            && dx.abs() < self.config.min_horizontal_distance()
        {
            let magnitude =
                (self.config.min_horizontal_distance() - dx.abs()) * self.config.horizontal_push_force();
            let direction = if dx == 0.0 { random_sign(rng) } else { dx.signum() };
            let push = Vector2::new(direction * magnitude / 2.0, 0.0);
            add_opposed(forces, i, j, push);
        }

        if dy.abs() < self.config.min_vertical_distance_for_aligning() {
            let pull = Vector2::new(0.0, -dy * self.config.alignment_force() / 2.0);
            add_opposed(forces, i, j, pull);
        }

        // Only the input/output pairing carries an ordering rule. Anchors of
        // the same kind, and plain nodes, are left alone.
        match (entities[i].kind(), entities[j].kind()) {
            (EntityKind::InputAnchor, EntityKind::OutputAnchor) => {
                self.apply_ordering(i, j, entities, forces)
            }
            (EntityKind::OutputAnchor, EntityKind::InputAnchor) => {
                self.apply_ordering(j, i, entities, forces)
            }
            _ => {}
        }
    }

    fn apply_ordering(&self, input: usize, output: usize, entities: &[Entity], forces: &mut [Vector2]) {
        let gap = entities[output].position().y() - entities[input].position().y();
        if gap >= self.config.min_input_output_distance() {
            return;
        }

        // Scaled by the horizontal distance, not the anchor gap; the force
        // flips sign once `gap` passes `min_horizontal_distance`.
        let magnitude = (self.config.min_horizontal_distance() - gap) * self.config.alignment_force();
        let push_up = Vector2::new(0.0, -magnitude / 2.0);
        add_opposed(forces, input, output, push_up);
    }

    fn apply_spring(&self, spring: Spring, entities: &[Entity], forces: &mut [Vector2]) {
        let ideal = Vector2::new(0.0, -self.config.ideal_vertical_distance());
        let actual = entities[spring.from]
            .position()
            .sub_vector(entities[spring.to].position());
        let error = ideal.sub_vector(actual);

        let magnitude = error.length() * self.config.vertical_push_force();
        let pull = error.normalize().scale(magnitude / 2.0);
        add_opposed(forces, spring.from, spring.to, pull);
    }
}

/// Adds `force` to entry `a` and its opposite to entry `b`.
fn add_opposed(forces: &mut [Vector2], a: usize, b: usize, force: Vector2) {
    forces[a] = forces[a].add_vector(force);
    forces[b] = forces[b].sub_vector(force);
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use rand::{SeedableRng, rngs::StdRng};

    use flowlayout_core::geometry::Size;

    use super::*;
    use crate::model::NodeBox;

    /// A zero-sized entity, so its center is exactly `(x, y)`.
    fn entity(id: &str, x: f32, y: f32) -> Entity {
        Entity::ingest(id, &NodeBox::new(Vector2::new(x, y), Size::new(0.0, 0.0)), 1.0).unwrap()
    }

    fn without_centering() -> ForceConfig {
        ForceConfig::default().with_centering_strength(0.0)
    }

    fn accumulate(config: &ForceConfig, entities: &[Entity], springs: Vec<Spring>) -> Vec<Vector2> {
        let mut forces = vec![Vector2::ZERO; entities.len()];
        let mut rng = StdRng::seed_from_u64(1);
        ForceField::new(config, springs).accumulate(entities, &mut forces, &mut rng);
        forces
    }

    #[test]
    fn test_separation_pushes_apart() {
        let config = without_centering();
        let entities = [entity("a", 0.0, 60.0), entity("b", 100.0, 0.0)];
        let forces = accumulate(&config, &entities, Vec::new());

        // (400 - 100) * 1000, half each
        assert_approx_eq!(f32, forces[0].x(), -150_000.0);
        assert_approx_eq!(f32, forces[1].x(), 150_000.0);
    }

    #[test]
    fn test_no_separation_outside_vertical_band() {
        let config = without_centering();
        let entities = [entity("a", 0.0, 0.0), entity("b", 100.0, 80.0)];
        let forces = accumulate(&config, &entities, Vec::new());

        assert_eq!(forces[0], Vector2::ZERO);
        assert_eq!(forces[1], Vector2::ZERO);
    }

    #[test]
    fn test_no_separation_when_far_enough_apart() {
        let config = without_centering();
        let entities = [entity("a", 0.0, 0.0), entity("b", 400.0, 0.0)];
        let forces = accumulate(&config, &entities, Vec::new());

        assert_eq!(forces[0], Vector2::ZERO);
        assert_eq!(forces[1], Vector2::ZERO);
    }

    #[test]
    fn test_alignment_pulls_onto_one_row() {
        let config = without_centering();
        let entities = [entity("a", 0.0, 0.0), entity("b", 1000.0, 40.0)];
        let forces = accumulate(&config, &entities, Vec::new());

        // dy = -40, magnitude 40 * 100, half each
        assert_approx_eq!(f32, forces[0].y(), 2000.0);
        assert_approx_eq!(f32, forces[1].y(), -2000.0);
        assert_eq!(forces[0].x(), 0.0);
    }

    #[test]
    fn test_coincident_entities_separate_in_opposite_directions() {
        let config = without_centering();
        let entities = [entity("a", 10.0, 10.0), entity("b", 10.0, 10.0)];
        let forces = accumulate(&config, &entities, Vec::new());

        assert!(forces[0].is_finite());
        assert_approx_eq!(f32, forces[0].x().abs(), 200_000.0);
        assert_approx_eq!(f32, forces[0].x(), -forces[1].x());
        assert_eq!(forces[0].y(), 0.0);
    }

    #[test]
    fn test_tie_break_is_deterministic_for_a_seed() {
        let config = without_centering();
        let entities = [entity("a", 0.0, 0.0), entity("b", 0.0, 0.0)];

        let first = accumulate(&config, &entities, Vec::new());
        let second = accumulate(&config, &entities, Vec::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_ordering_pushes_input_above_output() {
        let config = without_centering();
        // Output anchor sits 100 above the input anchor, out of the rows' bands.
        let entities = [
            entity("node-output-result", 1000.0, 0.0),
            entity("node-input-data", 0.0, 100.0),
        ];
        let forces = accumulate(&config, &entities, Vec::new());

        // gap = 0 - 100 = -100, magnitude (400 + 100) * 100
        assert_approx_eq!(f32, forces[1].y(), -25_000.0);
        assert_approx_eq!(f32, forces[0].y(), 25_000.0);
    }

    #[test]
    fn test_ordering_stops_once_gap_is_large_enough() {
        let config = without_centering();
        let entities = [
            entity("node-input-data", 0.0, 0.0),
            entity("node-output-result", 1000.0, 500.0),
        ];
        let forces = accumulate(&config, &entities, Vec::new());

        assert_eq!(forces[0], Vector2::ZERO);
        assert_eq!(forces[1], Vector2::ZERO);
    }

    #[test]
    fn test_same_kind_anchors_have_no_ordering_force() {
        let config = without_centering();
        let entities = [
            entity("node-input-a", 0.0, 0.0),
            entity("node-input-b", 1000.0, 300.0),
        ];
        let forces = accumulate(&config, &entities, Vec::new());

        assert_eq!(forces[0], Vector2::ZERO);
        assert_eq!(forces[1], Vector2::ZERO);
    }

    #[test]
    fn test_centering_pulls_toward_vertical_axis() {
        let config = ForceConfig::default();
        let entities = [entity("a", 30.0, 0.0)];
        let forces = accumulate(&config, &entities, Vec::new());

        assert_approx_eq!(f32, forces[0].x(), -1500.0);
        assert_eq!(forces[0].y(), 0.0);
    }

    #[test]
    fn test_spring_pulls_toward_ideal_offset() {
        let config = without_centering();
        // from is level with to and 1000 to its left: error = (1000, -200)
        let entities = [entity("from", 0.0, 0.0), entity("to", 1000.0, 0.0)];
        let forces = accumulate(&config, &entities, vec![Spring::new(0, 1)]);

        // The pair also aligns (dy = 0, no force) but does not separate (dx = 1000).
        assert_approx_eq!(f32, forces[0].x(), 500_000.0, epsilon = 1.0);
        assert_approx_eq!(f32, forces[0].y(), -100_000.0, epsilon = 1.0);
        assert_approx_eq!(f32, forces[1].x(), -500_000.0, epsilon = 1.0);
        assert_approx_eq!(f32, forces[1].y(), 100_000.0, epsilon = 1.0);
    }

    #[test]
    fn test_spring_at_rest_length_is_silent() {
        let config = without_centering();
        let entities = [entity("from", 0.0, 0.0), entity("to", 0.0, 200.0)];
        let forces = accumulate(&config, &entities, vec![Spring::new(0, 1)]);

        assert_eq!(forces[0], Vector2::ZERO);
        assert_eq!(forces[1], Vector2::ZERO);
    }

    #[test]
    fn test_forces_add_to_existing_values() {
        let config = ForceConfig::default();
        let entities = [entity("a", 30.0, 0.0)];
        let mut forces = vec![Vector2::new(1.0, 2.0)];
        let mut rng = StdRng::seed_from_u64(1);
        ForceField::new(&config, Vec::new()).accumulate(&entities, &mut forces, &mut rng);

        assert_approx_eq!(f32, forces[0].x(), -1499.0);
        assert_eq!(forces[0].y(), 2.0);
    }
}
