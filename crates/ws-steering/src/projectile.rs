//! Ballistic snowballs and the timed piles they leave behind.

use ws_core::Vec3;

/// Gravity applied to projectiles (m/s²).
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Lifetime of a snow pile: it blocks for `stay_time`, then sinks over
/// `melt_time` while still blocking, then disappears.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PileTimer {
    pub stay_time: f32,
    pub melt_time: f32,
}

impl PileTimer {
    #[inline]
    pub fn lifetime(self) -> f32 {
        self.stay_time + self.melt_time
    }

    /// Sink progress in `[0, 1]` after `age` seconds (0 while staying).
    pub fn melt_fraction(self, age: f32) -> f32 {
        if age < self.stay_time {
            0.0
        } else if self.melt_time <= 0.0 {
            1.0
        } else {
            ((age - self.stay_time) / self.melt_time).clamp(0.0, 1.0)
        }
    }
}

impl Default for PileTimer {
    fn default() -> Self {
        Self { stay_time: 12.0, melt_time: 2.0 }
    }
}

/// Outcome of one projectile step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ProjectileStep {
    Flying,
    /// Reached the ground; carries the landing point with `y = 0`.
    Landed(Vec3),
}

/// A gravity-integrated point with no steering.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    pub gravity:  Vec3,
}

impl Projectile {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity, gravity: GRAVITY }
    }

    pub fn step(&mut self, dt: f32) -> ProjectileStep {
        self.velocity += self.gravity * dt;
        self.position += self.velocity * dt;
        if self.position.y <= 0.0 {
            ProjectileStep::Landed(self.position.flat())
        } else {
            ProjectileStep::Flying
        }
    }
}

/// Launch velocity that carries a projectile from `from` to `to` when thrown
/// at `angle_deg` above the horizontal under vertical gravity `gravity_y`
/// (negative).
///
/// Returns `None` when no such trajectory exists: the target is directly
/// below/above, gravity is not downward, or the angle is too shallow to
/// clear the height difference.
pub fn ballistic_launch_velocity(from: Vec3, to: Vec3, angle_deg: f32, gravity_y: f32) -> Option<Vec3> {
    let offset = to - from;
    let horizontal = offset.flat();
    let h_dis = horizontal.length();
    if h_dis <= f32::EPSILON || gravity_y >= 0.0 {
        return None;
    }
    let h_dir = horizontal / h_dis;
    let v_dis = offset.y;
    let tan = angle_deg.to_radians().tan();

    let denom = h_dis * tan - v_dis;
    if denom <= 0.0 {
        return None;
    }
    let h_speed = h_dis * (-gravity_y / 2.0 / denom).sqrt();
    let v_speed = h_speed * tan;
    let velocity = h_dir * h_speed + Vec3::UP * v_speed;
    velocity.is_finite().then_some(velocity)
}
