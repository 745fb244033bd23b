//! Configuration types for the Flowlayout engine.
//!
//! This module provides the tunable constants that drive the force
//! simulation. All types implement [`serde::Deserialize`] with per-field
//! defaults, so a configuration file only needs to name the values it
//! overrides.
//!
//! # Overview
//!
//! - [`LayoutConfig`] - Top-level configuration combining simulation and force settings.
//! - [`SimulationConfig`] - Integration, damping and convergence parameters.
//! - [`ForceConfig`] - Strengths and distance thresholds of the force field.
//!
//! # Example
//!
//! ```
//! # use flowlayout::config::LayoutConfig;
//! let config = LayoutConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.forces().min_horizontal_distance(), 400.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    LayoutError,
    entity::{MAX_MASS, MIN_MASS},
};

/// Top-level engine configuration combining simulation and force settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Simulation loop section.
    #[serde(default)]
    simulation: SimulationConfig,

    /// Force field section.
    #[serde(default)]
    forces: ForceConfig,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`] from its two sections.
    ///
    /// # Arguments
    ///
    /// * `simulation` - Integration and convergence settings.
    /// * `forces` - Force field strengths and thresholds.
    pub fn new(simulation: SimulationConfig, forces: ForceConfig) -> Self {
        Self { simulation, forces }
    }

    /// Returns the simulation configuration.
    pub fn simulation(&self) -> &SimulationConfig {
        &self.simulation
    }

    /// Returns the force configuration.
    pub fn forces(&self) -> &ForceConfig {
        &self.forces
    }

    /// Returns a mutable reference to the simulation configuration.
    pub fn simulation_mut(&mut self) -> &mut SimulationConfig {
        &mut self.simulation
    }

    /// Returns a mutable reference to the force configuration.
    pub fn forces_mut(&mut self) -> &mut ForceConfig {
        &mut self.forces
    }

    /// Checks every value before a simulation is allowed to use it.
    ///
    /// A bad constant would turn into NaN positions a few iterations later,
    /// so the engine refuses to start instead.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), LayoutError> {
        self.simulation.validate()?;
        self.forces.validate()
    }
}

/// Integration, damping and convergence parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Factor applied to every velocity after each step (default: 0.5).
    damping: f32,
    /// Upper bound on an entity's speed after damping (default: 100.0).
    max_speed: f32,
    /// Kinetic energy below which the layout counts as settled (default: 0.01).
    min_energy: f32,
    /// Fixed integration timestep in milliseconds (default: 15.0).
    timestep_ms: f32,
    /// Mass given to nodes that do not carry their own (default: 1.0).
    default_mass: f32,
    /// Iteration budget used when the caller does not pass one (default: 500).
    max_iterations: usize,
    /// Seed for the tie-break random source; `None` seeds from the OS.
    seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            damping: 0.5,
            max_speed: 100.0,
            min_energy: 0.01,
            timestep_ms: 15.0,
            default_mass: 1.0,
            max_iterations: 500,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn min_energy(&self) -> f32 {
        self.min_energy
    }

    pub fn timestep_ms(&self) -> f32 {
        self.timestep_ms
    }

    pub fn default_mass(&self) -> f32 {
        self.default_mass
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Set the speed cap
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Set the convergence energy threshold
    pub fn with_min_energy(mut self, min_energy: f32) -> Self {
        self.min_energy = min_energy;
        self
    }

    /// Set the integration timestep in milliseconds
    pub fn with_timestep_ms(mut self, timestep_ms: f32) -> Self {
        self.timestep_ms = timestep_ms;
        self
    }

    /// Set the mass used for nodes without an explicit one
    pub fn with_default_mass(mut self, default_mass: f32) -> Self {
        self.default_mass = default_mass;
        self
    }

    /// Set the default iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<(), LayoutError> {
        ensure(
            "simulation.damping",
            self.damping,
            (0.0..=1.0).contains(&self.damping),
            "must be between 0 and 1",
        )?;
        ensure(
            "simulation.max_speed",
            self.max_speed,
            self.max_speed > 0.0,
            "must be positive",
        )?;
        ensure(
            "simulation.min_energy",
            self.min_energy,
            self.min_energy >= 0.0,
            "must not be negative",
        )?;
        ensure(
            "simulation.timestep_ms",
            self.timestep_ms,
            self.timestep_ms > 0.0,
            "must be positive",
        )?;
        ensure(
            "simulation.default_mass",
            self.default_mass,
            (MIN_MASS..=MAX_MASS).contains(&self.default_mass),
            "must be between 0.001 and 1000000",
        )
    }
}

/// Strengths and distance thresholds of the force field.
///
/// Distances are in canvas units, strengths are force per unit of
/// displacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Strength of the sideways push between vertically close entities (default: 1000.0).
    horizontal_push_force: f32,
    /// Stiffness of the edge springs (default: 1000.0).
    vertical_push_force: f32,
    /// Horizontal gap the sideways push tries to open (default: 400.0).
    min_horizontal_distance: f32,
    /// Pairs closer than this vertically get pushed apart sideways (default: 80.0).
    min_vertical_distance_for_separation: f32,
    /// Pairs closer than this vertically get pulled onto one row (default: 50.0).
    min_vertical_distance_for_aligning: f32,
    /// Strength of the row alignment and anchor ordering forces (default: 100.0).
    alignment_force: f32,
    /// Vertical gap wanted between an input anchor and an output anchor (default: 500.0).
    min_input_output_distance: f32,
    /// Vertical gap an edge spring settles at (default: 200.0).
    ideal_vertical_distance: f32,
    /// Pull of every entity toward `x = 0`, per unit of distance (default: 50.0).
    centering_strength: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            horizontal_push_force: 1000.0,
            vertical_push_force: 1000.0,
            min_horizontal_distance: 400.0,
            min_vertical_distance_for_separation: 80.0,
            min_vertical_distance_for_aligning: 50.0,
            alignment_force: 100.0,
            min_input_output_distance: 500.0,
            ideal_vertical_distance: 200.0,
            centering_strength: 50.0,
        }
    }
}

impl ForceConfig {
    pub fn horizontal_push_force(&self) -> f32 {
        self.horizontal_push_force
    }

    pub fn vertical_push_force(&self) -> f32 {
        self.vertical_push_force
    }

    pub fn min_horizontal_distance(&self) -> f32 {
        self.min_horizontal_distance
    }

    pub fn min_vertical_distance_for_separation(&self) -> f32 {
        self.min_vertical_distance_for_separation
    }

    pub fn min_vertical_distance_for_aligning(&self) -> f32 {
        self.min_vertical_distance_for_aligning
    }

    pub fn alignment_force(&self) -> f32 {
        self.alignment_force
    }

    pub fn min_input_output_distance(&self) -> f32 {
        self.min_input_output_distance
    }

    pub fn ideal_vertical_distance(&self) -> f32 {
        self.ideal_vertical_distance
    }

    pub fn centering_strength(&self) -> f32 {
        self.centering_strength
    }

    /// Set the sideways push strength
    pub fn with_horizontal_push_force(mut self, force: f32) -> Self {
        self.horizontal_push_force = force;
        self
    }

    /// Set the edge spring stiffness
    pub fn with_vertical_push_force(mut self, force: f32) -> Self {
        self.vertical_push_force = force;
        self
    }

    /// Set the horizontal gap the sideways push opens
    pub fn with_min_horizontal_distance(mut self, distance: f32) -> Self {
        self.min_horizontal_distance = distance;
        self
    }

    /// Set the vertical band in which the sideways push applies
    pub fn with_min_vertical_distance_for_separation(mut self, distance: f32) -> Self {
        self.min_vertical_distance_for_separation = distance;
        self
    }

    /// Set the vertical band in which row alignment applies
    pub fn with_min_vertical_distance_for_aligning(mut self, distance: f32) -> Self {
        self.min_vertical_distance_for_aligning = distance;
        self
    }

    /// Set the alignment and anchor ordering strength
    pub fn with_alignment_force(mut self, force: f32) -> Self {
        self.alignment_force = force;
        self
    }

    /// Set the wanted gap between input and output anchors
    pub fn with_min_input_output_distance(mut self, distance: f32) -> Self {
        self.min_input_output_distance = distance;
        self
    }

    /// Set the gap edge springs settle at
    pub fn with_ideal_vertical_distance(mut self, distance: f32) -> Self {
        self.ideal_vertical_distance = distance;
        self
    }

    /// Set the pull toward the vertical axis
    pub fn with_centering_strength(mut self, strength: f32) -> Self {
        self.centering_strength = strength;
        self
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let non_negative = [
            ("forces.horizontal_push_force", self.horizontal_push_force),
            ("forces.vertical_push_force", self.vertical_push_force),
            ("forces.min_horizontal_distance", self.min_horizontal_distance),
            (
                "forces.min_vertical_distance_for_separation",
                self.min_vertical_distance_for_separation,
            ),
            (
                "forces.min_vertical_distance_for_aligning",
                self.min_vertical_distance_for_aligning,
            ),
            ("forces.alignment_force", self.alignment_force),
            ("forces.min_input_output_distance", self.min_input_output_distance),
            ("forces.ideal_vertical_distance", self.ideal_vertical_distance),
            ("forces.centering_strength", self.centering_strength),
        ];

        non_negative
            .into_iter()
            .try_for_each(|(field, value)| ensure(field, value, value >= 0.0, "must not be negative"))
    }
}

/// Fails with `reason` unless `value` is finite and `holds` is true.
fn ensure(field: &'static str, value: f32, holds: bool, reason: &str) -> Result<(), LayoutError> {
    if !value.is_finite() {
        return Err(LayoutError::invalid_config(
            field,
            format!("must be finite, got {value}"),
        ));
    }
    if !holds {
        return Err(LayoutError::invalid_config(
            field,
            format!("{reason}, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_constants() {
        let config = LayoutConfig::default();
        let simulation = config.simulation();
        let forces = config.forces();

        assert_eq!(simulation.damping(), 0.5);
        assert_eq!(simulation.max_speed(), 100.0);
        assert_eq!(simulation.min_energy(), 0.01);
        assert_eq!(simulation.timestep_ms(), 15.0);
        assert_eq!(forces.horizontal_push_force(), 1000.0);
        assert_eq!(forces.vertical_push_force(), 1000.0);
        assert_eq!(forces.min_vertical_distance_for_separation(), 80.0);
        assert_eq!(forces.min_vertical_distance_for_aligning(), 50.0);
        assert_eq!(forces.alignment_force(), 100.0);
        assert_eq!(forces.min_input_output_distance(), 500.0);
        assert_eq!(forces.ideal_vertical_distance(), 200.0);
    }

    #[test]
    fn test_rejects_damping_out_of_range() {
        let mut config = LayoutConfig::default();
        *config.simulation_mut() = SimulationConfig::default().with_damping(1.5);

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidConfig {
                field: "simulation.damping",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let config = LayoutConfig::new(
            SimulationConfig::default().with_default_mass(0.0),
            ForceConfig::default(),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_default_mass_outside_ingest_range() {
        let config = LayoutConfig::new(
            SimulationConfig::default().with_default_mass(1.0e-9),
            ForceConfig::default(),
        );

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration `simulation.default_mass`: must be between 0.001 and 1000000, got 0.000000001"
        );
    }

    #[test]
    fn test_rejects_nan_force() {
        let config = LayoutConfig::new(
            SimulationConfig::default(),
            ForceConfig::default().with_alignment_force(f32::NAN),
        );

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration `forces.alignment_force`: must be finite, got NaN"
        );
    }

    #[test]
    fn test_rejects_negative_distance() {
        let mut config = LayoutConfig::default();
        *config.forces_mut() = ForceConfig::default().with_min_horizontal_distance(-1.0);

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidConfig {
                field: "forces.min_horizontal_distance",
                ..
            }
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: LayoutConfig = toml::from_str(
            r#"
            [simulation]
            seed = 7
            max_iterations = 50

            [forces]
            centering_strength = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation().seed(), Some(7));
        assert_eq!(config.simulation().max_iterations(), 50);
        assert_eq!(config.simulation().damping(), 0.5);
        assert_eq!(config.forces().centering_strength(), 0.0);
        assert_eq!(config.forces().min_horizontal_distance(), 400.0);
    }
}
