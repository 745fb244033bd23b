//! Flowlayout - force-directed auto-layout for visual flow editors.
//!
//! Given node boxes and the directed edges between them, the engine relaxes
//! the graph with a small physics simulation so that boxes stop overlapping,
//! edges point downward, and spacing stays within configured bounds. It is a
//! best-effort heuristic with a hard iteration budget, not an optimal graph
//! drawing.
//!
//! Every call starts a fresh simulation from the caller's positions, so an
//! editor can re-run it after the user drags a node.

pub mod config;
pub mod entity;
pub mod forces;
pub mod physics;
pub mod simulation;

mod error;
mod model;

pub use flowlayout_core::geometry;

pub use error::LayoutError;
pub use model::{Edge, LayoutInput, LayoutOutput, NodeBox, Termination};
pub use simulation::{IterationObserver, Simulation};

use log::debug;

use config::LayoutConfig;

/// Lays out `input` with the default configuration.
///
/// The tie-break random source is seeded from the operating system; use a
/// [`LayoutEngine`] with a configured seed for reproducible runs.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidNode`] if a node box is malformed.
///
/// # Examples
///
/// ```
/// use flowlayout::{LayoutInput, NodeBox, geometry::{Size, Vector2}};
///
/// let input = LayoutInput::default()
///     .with_node("source", NodeBox::new(Vector2::new(0.0, 0.0), Size::new(120.0, 40.0)))
///     .with_node("sink", NodeBox::new(Vector2::new(0.0, 0.0), Size::new(120.0, 40.0)))
///     .with_edge("source", "sink");
///
/// let output = flowlayout::run_layout(&input, 1000).expect("valid input");
/// let source = output.node("source").unwrap().center();
/// let sink = output.node("sink").unwrap().center();
/// assert!(source.y() < sink.y());
/// ```
pub fn run_layout(input: &LayoutInput, max_iterations: usize) -> Result<LayoutOutput, LayoutError> {
    LayoutEngine::default().run(input, max_iterations)
}

/// Runs layout simulations with a fixed configuration.
///
/// The engine holds no state between calls; each run builds its own
/// [`Simulation`].
///
/// # Examples
///
/// ```
/// use flowlayout::{
///     LayoutEngine, LayoutInput, NodeBox,
///     config::{ForceConfig, LayoutConfig, SimulationConfig},
///     geometry::{Size, Vector2},
/// };
///
/// let config = LayoutConfig::new(
///     SimulationConfig::default().with_seed(Some(7)),
///     ForceConfig::default(),
/// );
/// let engine = LayoutEngine::new(config).expect("valid config");
///
/// let input = LayoutInput::default()
///     .with_node("a", NodeBox::new(Vector2::new(0.0, 0.0), Size::new(100.0, 40.0)));
///
/// let mut frames = 0;
/// let output = engine
///     .run_observed(&input, 100, |_snapshot, _index| frames += 1)
///     .expect("valid input");
/// assert_eq!(frames, output.iterations_used());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create a new engine after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] for a value that would make
    /// the simulation produce NaN or never settle.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Builds a simulation for `input` that can be further configured
    /// before running.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidNode`] if a node box is malformed.
    pub fn simulation<'a>(&'a self, input: &'a LayoutInput) -> Result<Simulation<'a>, LayoutError> {
        Simulation::new(&self.config, input)
    }

    /// Lays out `input` in at most `max_iterations` steps.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidNode`] if a node box is malformed.
    pub fn run(&self, input: &LayoutInput, max_iterations: usize) -> Result<LayoutOutput, LayoutError> {
        let output = self.simulation(input)?.run(max_iterations);
        log_summary(&output);
        Ok(output)
    }

    /// Like [`run`](Self::run), calling `observer` with a snapshot after
    /// every iteration.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidNode`] if a node box is malformed.
    pub fn run_observed<'a>(
        &'a self,
        input: &'a LayoutInput,
        max_iterations: usize,
        observer: impl FnMut(&LayoutOutput, usize) + 'a,
    ) -> Result<LayoutOutput, LayoutError> {
        let output = self
            .simulation(input)?
            .on_iteration(observer)
            .run(max_iterations);
        log_summary(&output);
        Ok(output)
    }
}

fn log_summary(output: &LayoutOutput) {
    debug!(
        nodes = output.nodes().len(),
        iterations = output.iterations_used(),
        timed_out = output.timed_out(),
        final_energy = output.final_energy();
        "Layout calculated"
    );
}
