//! Point-mass kinematic body integrated from accumulated forces.

use ws_core::Vec3;

use crate::{SteeringError, SteeringResult};

/// Below this squared speed the facing direction is kept as-is, so a body at
/// rest does not snap to an arbitrary heading.
const DIRECTION_SPEED_SQ: f32 = 0.1;

/// Physics state owned by exactly one agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Unit facing direction.
    pub direction: Vec3,
    pub mass:     f32,
    pub radius:   f32,
    /// Magnitude of the force opposing motion; `0.0` disables friction.
    pub friction: f32,
    /// Acceleration accumulated since the last `integrate`.
    pub acceleration: Vec3,
}

impl KinematicBody {
    /// A unit-mass body at rest, facing +z.
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity:     Vec3::ZERO,
            direction:    Vec3::FORWARD,
            mass:         1.0,
            radius,
            friction:     0.0,
            acceleration: Vec3::ZERO,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_friction(mut self, coefficient: f32) -> Self {
        self.friction = coefficient;
        self
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.set_direction(direction);
        self
    }

    /// Reject bodies that would make integration produce NaN.
    pub fn validate(&self) -> SteeringResult<()> {
        if !(self.mass > 0.0) || !self.mass.is_finite() {
            return Err(SteeringError::InvalidBody(format!("mass must be > 0, got {}", self.mass)));
        }
        if !(self.radius >= 0.0) || !self.radius.is_finite() {
            return Err(SteeringError::InvalidBody(format!("radius must be >= 0, got {}", self.radius)));
        }
        if !(self.friction >= 0.0) {
            return Err(SteeringError::InvalidBody(format!(
                "friction must be >= 0, got {}",
                self.friction
            )));
        }
        if !self.position.is_finite() || !self.velocity.is_finite() {
            return Err(SteeringError::InvalidBody("non-finite position or velocity".into()));
        }
        Ok(())
    }

    /// Accumulate `force / mass` into this tick's acceleration.
    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force / self.mass;
    }

    /// Face `direction`.  A zero vector leaves the current facing unchanged.
    pub fn set_direction(&mut self, direction: Vec3) {
        let d = direction.normalized();
        if d != Vec3::ZERO {
            self.direction = d;
        }
    }

    /// Where the body will be after `t` seconds at constant velocity.
    #[inline]
    pub fn future_position(&self, t: f32) -> Vec3 {
        self.position + self.velocity * t
    }

    /// Advance one frame.
    ///
    /// The velocity change uses `min(dt, max_step)` so a single long frame
    /// cannot inject a velocity spike; the position change uses the full
    /// `dt`.  Acceleration is cleared afterwards.
    pub fn integrate(&mut self, dt: f32, max_step: f32) {
        if self.friction > 0.0 {
            let opposing = -self.velocity.normalized() * self.friction;
            self.apply_force(opposing);
        }

        self.velocity += self.acceleration * dt.min(max_step);
        self.position += self.velocity * dt;

        if self.velocity.length_squared() > DIRECTION_SPEED_SQ {
            self.direction = self.velocity.normalized();
        }
        self.acceleration = Vec3::ZERO;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
