//! Per-kind agent tunables.

use ws_steering::{PileTimer, SteeringParams};

use crate::{AgentError, AgentResult};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElfConfig {
    /// Base steering tunables; `max_speed` is overridden per state.
    pub steering:        SteeringParams,
    pub radius:          f32,
    pub mass:            f32,
    pub friction:        f32,
    /// Speed cap while waiting for a task.
    pub speed_wandering: f32,
    /// Speed cap while walking empty-handed.
    pub speed_walking:   f32,
    /// Speed cap while walking with an item.
    pub speed_carrying:  f32,
}

impl Default for ElfConfig {
    fn default() -> Self {
        Self {
            steering:        SteeringParams::default(),
            radius:          0.5,
            mass:            1.0,
            friction:        0.2,
            speed_wandering: 4.0,
            speed_walking:   5.0,
            speed_carrying:  3.0,
        }
    }
}

impl ElfConfig {
    pub fn validate(&self) -> AgentResult<()> {
        self.steering.validate()?;
        for (name, v) in [
            ("speed_wandering", self.speed_wandering),
            ("speed_walking", self.speed_walking),
            ("speed_carrying", self.speed_carrying),
        ] {
            if !(v >= 0.0) {
                return Err(AgentError::Config(format!("elf {name} must be >= 0, got {v}")));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnowmanConfig {
    pub steering: SteeringParams,
    pub radius:   f32,
    pub mass:     f32,
    /// Seconds into the throwing state before the snowball leaves.
    pub throw_time:           f32,
    /// Total seconds spent in the throwing state.
    pub throw_state_duration: f32,
    /// Launch elevation in degrees.
    pub throw_angle:          f32,
    /// Probability per second of starting a throw once off cooldown.
    pub throw_chance_per_sec: f32,
    /// Minimum wandering time between throws.
    pub throw_cooldown:       f32,
    /// Height above the snowman's feet the snowball is released from.
    pub throw_height:         f32,
    /// Radius of the obstacle a landed snowball leaves.
    pub pile_radius:          f32,
    pub pile:                 PileTimer,
}

impl Default for SnowmanConfig {
    fn default() -> Self {
        Self {
            steering:             SteeringParams::default(),
            radius:               1.0,
            mass:                 1.0,
            throw_time:           1.0,
            throw_state_duration: 2.0,
            throw_angle:          60.0,
            throw_chance_per_sec: 0.2,
            throw_cooldown:       3.0,
            throw_height:         1.5,
            pile_radius:          1.0,
            pile:                 PileTimer::default(),
        }
    }
}

impl SnowmanConfig {
    pub fn validate(&self) -> AgentResult<()> {
        self.steering.validate()?;
        if !(0.0..=1.0).contains(&self.throw_chance_per_sec) {
            return Err(AgentError::Config(format!(
                "throw_chance_per_sec must be in [0, 1], got {}",
                self.throw_chance_per_sec
            )));
        }
        if !(self.throw_angle > 0.0 && self.throw_angle < 90.0) {
            return Err(AgentError::Config(format!(
                "throw_angle must be in (0, 90) degrees, got {}",
                self.throw_angle
            )));
        }
        if self.throw_state_duration < self.throw_time {
            return Err(AgentError::Config(
                "throw_state_duration must not be shorter than throw_time".into(),
            ));
        }
        if !(self.pile_radius >= 0.0) {
            return Err(AgentError::Config(format!("pile_radius must be >= 0, got {}", self.pile_radius)));
        }
        Ok(())
    }
}
