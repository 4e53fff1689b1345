//! Launch pads that send finished goods off from a finish station.
//!
//! A pad is a one-dimensional body (height + vertical velocity) driven by a
//! phase machine:
//!
//! ```text
//! Preparing ──prepare_duration──▶ Launching ──speed reached──▶ Coasting ──time_to_despawn──▶ Despawned
//! ```
//!
//! While preparing, the pad dips toward `prepare_offset` on a damped spring.
//! Phase changes happen on the first update where the elapsed time in the
//! phase reaches its threshold.

use ws_core::ItemId;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaunchPadParams {
    pub prepare_offset:      f32,
    pub prepare_spring:      f32,
    pub prepare_damper:      f32,
    pub prepare_duration:    f32,
    pub launch_acceleration: f32,
    pub launch_speed:        f32,
    pub time_to_despawn:     f32,
    /// Delay after a launch before the finish station shows a fresh pad.
    pub seconds_to_replace:  f32,
}

impl Default for LaunchPadParams {
    fn default() -> Self {
        Self {
            prepare_offset:      -0.2,
            prepare_spring:      10.0,
            prepare_damper:      2.0,
            prepare_duration:    1.5,
            launch_acceleration: 16.0,
            launch_speed:        8.0,
            time_to_despawn:     5.0,
            seconds_to_replace:  2.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaunchPhase {
    Preparing,
    Launching,
    Coasting,
    Despawned,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaunchPad {
    pub item:        ItemId,
    pub phase:       LaunchPhase,
    pub phase_start: f32,
    pub height:      f32,
    pub velocity:    f32,
}

impl LaunchPad {
    /// A pad carrying `item`, starting its launch sequence at `now`.
    pub fn launch(item: ItemId, now: f32) -> Self {
        Self {
            item,
            phase:       LaunchPhase::Preparing,
            phase_start: now,
            height:      0.0,
            velocity:    0.0,
        }
    }

    fn enter(&mut self, phase: LaunchPhase, now: f32) {
        self.phase = phase;
        self.phase_start = now;
    }

    /// Advance one frame.  Returns `true` once the pad has despawned.
    pub fn update(&mut self, now: f32, dt: f32, p: &LaunchPadParams) -> bool {
        let elapsed = now - self.phase_start;
        match self.phase {
            LaunchPhase::Preparing => {
                if elapsed < p.prepare_duration {
                    self.velocity += (p.prepare_offset - self.height) * p.prepare_spring * dt;
                    self.velocity *= 1.0 - (p.prepare_damper * dt).clamp(0.0, 1.0);
                } else {
                    self.velocity = 0.0;
                    self.enter(LaunchPhase::Launching, now);
                }
            }
            LaunchPhase::Launching => {
                if self.velocity < p.launch_speed {
                    self.velocity += p.launch_acceleration * dt;
                } else {
                    self.velocity = p.launch_speed;
                    self.enter(LaunchPhase::Coasting, now);
                }
            }
            LaunchPhase::Coasting => {
                if elapsed >= p.time_to_despawn {
                    self.velocity = 0.0;
                    self.enter(LaunchPhase::Despawned, now);
                }
            }
            LaunchPhase::Despawned => return true,
        }
        self.height += self.velocity * dt;
        self.phase == LaunchPhase::Despawned
    }
}
