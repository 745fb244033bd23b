//! The simulation loop.
//!
//! A [`Simulation`] is built fresh from a [`LayoutInput`] for every run and
//! owns its entity arena until it finishes. Each iteration zeroes the force
//! accumulator, applies the [`ForceField`], integrates every body, damps and
//! caps its speed, then reports a snapshot to the observer if one is set.
//! The run ends when kinetic energy drops below the configured threshold,
//! the iteration budget is spent, or the cancellation flag is raised.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use indexmap::IndexMap;
use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};

use flowlayout_core::geometry::Vector2;

use crate::{
    LayoutError,
    config::LayoutConfig,
    entity::Entity,
    forces::{ForceField, Spring},
    model::{Edge, LayoutInput, LayoutOutput, Termination},
    physics::Body,
};

/// Callback receiving a read-only snapshot and the zero-based index of the
/// iteration that produced it.
pub type IterationObserver<'a> = Box<dyn FnMut(&LayoutOutput, usize) + 'a>;

/// Energy is not checked before this many iterations have run; at rest the
/// first steps report near-zero energy before any force has acted.
const CONVERGENCE_GRACE_ITERATIONS: usize = 2;

/// One layout run over a fixed input.
pub struct Simulation<'a, R = StdRng> {
    config: &'a LayoutConfig,
    edges: &'a [Edge],
    entities: Vec<Entity>,
    forces: Vec<Vector2>,
    field: ForceField<'a>,
    rng: R,
    cancel: Option<Arc<AtomicBool>>,
    observer: Option<IterationObserver<'a>>,
}

impl<'a> Simulation<'a, StdRng> {
    /// Validates `config`, ingests `input` and resolves its edges.
    ///
    /// The random source is seeded from the configured seed, or from the
    /// operating system when none is set.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] or [`LayoutError::InvalidNode`]
    /// before any simulation work happens.
    pub fn new(config: &'a LayoutConfig, input: &'a LayoutInput) -> Result<Self, LayoutError> {
        config.validate()?;

        let default_mass = config.simulation().default_mass();
        let entities = input
            .nodes()
            .iter()
            .map(|(id, node)| Entity::ingest(id, node, default_mass))
            .collect::<Result<Vec<_>, _>>()?;

        let springs = resolve_springs(input);
        debug!(
            entity_count = entities.len(),
            spring_count = springs.len(),
            skipped_edges = input.edges().len() - springs.len();
            "Simulation ingested"
        );

        let rng = match config.simulation().seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            config,
            edges: input.edges(),
            forces: vec![Vector2::ZERO; entities.len()],
            entities,
            field: ForceField::new(config.forces(), springs),
            rng,
            cancel: None,
            observer: None,
        })
    }
}

impl<'a, R: Rng> Simulation<'a, R> {
    /// Replaces the random source used to break ties between coincident
    /// entities.
    pub fn with_rng<S: Rng>(self, rng: S) -> Simulation<'a, S> {
        Simulation {
            config: self.config,
            edges: self.edges,
            entities: self.entities,
            forces: self.forces,
            field: self.field,
            rng,
            cancel: self.cancel,
            observer: self.observer,
        }
    }

    /// Sets a flag that stops the run at the start of the next iteration
    /// once it is raised.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Registers a callback invoked after every iteration.
    ///
    /// The callback runs synchronously on the simulation's stack and must
    /// return promptly; it only ever sees an immutable snapshot.
    pub fn on_iteration(mut self, observer: impl FnMut(&LayoutOutput, usize) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Returns the entities in their current state
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns the total kinetic energy `Σ 0.5·m·|v|²`
    pub fn kinetic_energy(&self) -> f32 {
        self.entities
            .iter()
            .map(|entity| entity.body().kinetic_energy())
            .sum()
    }

    /// Runs until convergence, cancellation, or `max_iterations` steps.
    pub fn run(mut self, max_iterations: usize) -> LayoutOutput {
        if self.entities.is_empty() {
            debug!("Nothing to lay out");
            return self.output(0, 0.0, Termination::Empty);
        }

        info!(
            entity_count = self.entities.len(),
            max_iterations;
            "Running layout simulation"
        );

        let min_energy = self.config.simulation().min_energy();
        let mut iterations = 0;
        let mut energy = self.kinetic_energy();

        let termination = loop {
            if iterations == max_iterations {
                break Termination::TimedOut;
            }
            if self.is_cancelled() {
                break Termination::Cancelled;
            }

            energy = self.step();
            iterations += 1;
            trace!(iteration = iterations, energy; "Iteration complete");

            if self.observer.is_some() {
                let snapshot = self.output(iterations, energy, Termination::Running);
                if let Some(observer) = self.observer.as_mut() {
                    observer(&snapshot, iterations - 1);
                }
            }

            if iterations >= CONVERGENCE_GRACE_ITERATIONS && energy < min_energy {
                break Termination::Converged;
            }
        };

        info!(
            iterations,
            energy,
            termination:? = termination;
            "Layout simulation finished"
        );
        self.output(iterations, energy, termination)
    }

    /// Advances every entity by one timestep and returns the resulting energy.
    fn step(&mut self) -> f32 {
        let config = self.config;
        let simulation = config.simulation();

        self.forces.fill(Vector2::ZERO);
        self.field
            .accumulate(&self.entities, &mut self.forces, &mut self.rng);

        for (entity, force) in self.entities.iter_mut().zip(&self.forces) {
            let body = entity
                .body()
                .integrate(*force, simulation.timestep_ms())
                .damp(simulation.damping())
                .clamp_speed(simulation.max_speed());
            if body.is_finite() {
                entity.set_body(body);
            } else {
                // An overflowed step is dropped; the entity stays put and stops.
                warn!(entity = entity.id(); "Discarding non-finite step");
                let rest = Body::at_rest(entity.position(), entity.body().mass());
                entity.set_body(rest);
            }
        }

        self.kinetic_energy()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|cancel| cancel.load(Ordering::Relaxed))
    }

    fn output(&self, iterations: usize, energy: f32, termination: Termination) -> LayoutOutput {
        let nodes: IndexMap<String, _> = self
            .entities
            .iter()
            .map(|entity| (entity.id().to_string(), entity.to_node_box()))
            .collect();

        LayoutOutput::new(nodes, self.edges.to_vec(), iterations, energy, termination)
    }
}

/// Maps edges onto arena indices, dropping those that cannot take part.
fn resolve_springs(input: &LayoutInput) -> Vec<Spring> {
    input
        .edges()
        .iter()
        .filter_map(|edge| {
            let from = input.nodes().get_index_of(edge.from());
            let to = input.nodes().get_index_of(edge.to());
            match (from, to) {
                (Some(from), Some(to)) if from == to => {
                    debug!(node = edge.from(); "Skipping self-loop edge");
                    None
                }
                (Some(from), Some(to)) => Some(Spring::new(from, to)),
                _ => {
                    warn!(
                        from = edge.from(),
                        to = edge.to();
                        "Skipping edge with unknown endpoint"
                    );
                    None
                }
            }
        })
        .collect()
}
