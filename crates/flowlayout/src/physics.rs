//! Point-mass integration.
//!
//! A [`Body`] is the moving part of an entity. Each step it takes the force
//! accumulated for it and advances with a fixed-timestep semi-implicit Euler
//! update: velocity first, then position from the new velocity.

use flowlayout_core::geometry::Vector2;

/// Position, velocity and mass of one simulated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    position: Vector2,
    velocity: Vector2,
    mass: f32,
}

impl Body {
    /// Creates a body at rest. `mass` must be positive.
    pub fn at_rest(position: Vector2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vector2::ZERO,
            mass,
        }
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Advances the body by one step of `dt_ms` milliseconds under `force`.
    ///
    /// `a = force / mass`, `v' = v + a·dt`, `p' = p + v'·dt`, with `dt` in
    /// seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use flowlayout::physics::Body;
    /// # use flowlayout::geometry::Vector2;
    /// let body = Body::at_rest(Vector2::ZERO, 2.0);
    /// let moved = body.integrate(Vector2::new(200.0, 0.0), 100.0);
    ///
    /// // a = 100, v' = 10, p' = 1
    /// assert!((moved.velocity().x() - 10.0).abs() < 1e-5);
    /// assert!((moved.position().x() - 1.0).abs() < 1e-5);
    /// ```
    pub fn integrate(self, force: Vector2, dt_ms: f32) -> Self {
        let dt = dt_ms / 1000.0;
        let acceleration = force.scale(1.0 / self.mass);
        let velocity = self.velocity.add_vector(acceleration.scale(dt));
        let position = self.position.add_vector(velocity.scale(dt));

        Self {
            position,
            velocity,
            mass: self.mass,
        }
    }

    /// Scales the velocity down by `factor`
    pub fn damp(self, factor: f32) -> Self {
        Self {
            velocity: self.velocity.scale(factor),
            ..self
        }
    }

    /// Rescales the velocity to `max_speed` if it is faster than that
    pub fn clamp_speed(self, max_speed: f32) -> Self {
        if self.velocity.length() <= max_speed {
            return self;
        }
        Self {
            velocity: self.velocity.normalize().scale(max_speed),
            ..self
        }
    }

    /// Returns true if position and velocity are both finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Returns `0.5·m·|v|²`
    pub fn kinetic_energy(&self) -> f32 {
        let speed = self.velocity.length();
        0.5 * self.mass * speed * speed
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_integrate_without_force_keeps_body_at_rest() {
        let body = Body::at_rest(Vector2::new(3.0, 4.0), 1.0);
        let next = body.integrate(Vector2::ZERO, 15.0);
        assert_eq!(next, body);
    }

    #[test]
    fn test_integrate_uses_updated_velocity_for_position() {
        let body = Body::at_rest(Vector2::ZERO, 1.0);
        let next = body.integrate(Vector2::new(0.0, 1000.0), 15.0);

        // v' = 1000 * 0.015 = 15, p' = 15 * 0.015 = 0.225
        assert_approx_eq!(f32, next.velocity().y(), 15.0, epsilon = 1e-4);
        assert_approx_eq!(f32, next.position().y(), 0.225, epsilon = 1e-5);
        assert_eq!(next.position().x(), 0.0);
    }

    #[test]
    fn test_heavier_body_accelerates_less() {
        let light = Body::at_rest(Vector2::ZERO, 1.0).integrate(Vector2::new(100.0, 0.0), 15.0);
        let heavy = Body::at_rest(Vector2::ZERO, 4.0).integrate(Vector2::new(100.0, 0.0), 15.0);

        assert_approx_eq!(f32, heavy.velocity().x() * 4.0, light.velocity().x(), epsilon = 1e-4);
    }

    #[test]
    fn test_damp() {
        let body = Body::at_rest(Vector2::ZERO, 1.0)
            .integrate(Vector2::new(1000.0, 0.0), 10.0)
            .damp(0.5);
        assert_approx_eq!(f32, body.velocity().x(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clamp_speed() {
        let fast = Body::at_rest(Vector2::ZERO, 1.0).integrate(Vector2::new(30000.0, 40000.0), 100.0);
        let clamped = fast.clamp_speed(100.0);

        assert_approx_eq!(f32, clamped.velocity().length(), 100.0, epsilon = 1e-3);
        assert_approx_eq!(f32, clamped.velocity().x(), 60.0, epsilon = 1e-3);
        assert_approx_eq!(f32, clamped.velocity().y(), 80.0, epsilon = 1e-3);
        assert_eq!(clamped.position(), fast.position());
    }

    #[test]
    fn test_clamp_speed_leaves_slow_body_alone() {
        let slow = Body::at_rest(Vector2::ZERO, 1.0).integrate(Vector2::new(100.0, 0.0), 15.0);
        assert_eq!(slow.clamp_speed(100.0), slow);
    }

    #[test]
    fn test_kinetic_energy() {
        let body = Body::at_rest(Vector2::ZERO, 2.0).integrate(Vector2::new(600.0, 800.0), 10.0);
        // v = (3, 4), |v| = 5, E = 0.5 * 2 * 25
        assert_approx_eq!(f32, body.kinetic_energy(), 25.0, epsilon = 1e-3);
        assert_eq!(Body::at_rest(Vector2::ZERO, 1.0).kinetic_energy(), 0.0);
    }

    #[test]
    fn test_overflowing_force_is_not_finite() {
        let body = Body::at_rest(Vector2::ZERO, 1.0).integrate(Vector2::new(f32::MAX, 0.0), 15.0);
        assert!(body.is_finite());

        let blown = Body::at_rest(Vector2::ZERO, 1.0e-3).integrate(Vector2::new(f32::MAX, 0.0), 15.0);
        assert!(!blown.is_finite());
    }
}
