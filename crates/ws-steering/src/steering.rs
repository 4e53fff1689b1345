//! Per-tick steering force accumulator and the primitive behaviors.
//!
//! Every primitive turns a desired velocity into a force
//! `(desired − velocity) × weight` and adds it to the running total.  The
//! `+ 0.1` terms in distance weights keep the weights finite when two
//! points coincide.

use ws_core::{AgentRng, Vec3};

use crate::avoid::{Route, plan_detour};
use crate::{KinematicBody, Obstacle, SteeringError, SteeringResult};

/// Tunables shared by every steering agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringParams {
    pub max_speed: f32,
    /// Cap on the magnitude of the summed steering force.
    pub max_force: f32,
    /// Wander angle limit in degrees.
    pub max_wander_angle: f32,
    /// Wander angle change rate limit in degrees per second.
    pub max_wander_change_per_sec: f32,
    /// Distance other agents are pushed away within.
    pub personal_space: f32,
    /// How far ahead obstacles are considered.
    pub vision_range: f32,
}

impl SteeringParams {
    pub fn validate(&self) -> SteeringResult<()> {
        let fields = [
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("max_wander_angle", self.max_wander_angle),
            ("max_wander_change_per_sec", self.max_wander_change_per_sec),
            ("personal_space", self.personal_space),
            ("vision_range", self.vision_range),
        ];
        for (name, value) in fields {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(SteeringError::InvalidParams(format!("{name} must be >= 0, got {value}")));
            }
        }
        Ok(())
    }
}

impl Default for SteeringParams {
    fn default() -> Self {
        Self {
            max_speed:                 5.0,
            max_force:                 5.0,
            max_wander_angle:          45.0,
            max_wander_change_per_sec: 10.0,
            personal_space:            1.0,
            vision_range:              4.0,
        }
    }
}

/// Weighted force accumulator for one agent for one tick.
///
/// Borrows the agent's body immutably; the caller applies the result of
/// [`finish`](Self::finish) to the body afterwards.
pub struct Steering<'a> {
    body:   &'a KinematicBody,
    params: &'a SteeringParams,
    total:  Vec3,
}

impl<'a> Steering<'a> {
    pub fn new(body: &'a KinematicBody, params: &'a SteeringParams) -> Self {
        Self { body, params, total: Vec3::ZERO }
    }

    /// Unclamped sum so far.
    #[inline]
    pub fn total(&self) -> Vec3 {
        self.total
    }

    /// The accumulated force clamped to `max_force`.
    pub fn finish(self) -> Vec3 {
        self.total.clamp_length(self.params.max_force)
    }

    #[inline]
    pub fn add_force(&mut self, force: Vec3) {
        self.total += force;
    }

    // ── Seek / flee ───────────────────────────────────────────────────────────

    pub fn seek(&mut self, target: Vec3, weight: f32) {
        let desired = (target - self.body.position).normalized() * self.params.max_speed;
        self.total += (desired - self.body.velocity) * weight;
    }

    pub fn flee(&mut self, target: Vec3, weight: f32) {
        let desired = (self.body.position - target).normalized() * self.params.max_speed;
        self.total += (desired - self.body.velocity) * weight;
    }

    /// Seek whose desired speed falls linearly to zero inside `slow_radius`.
    pub fn arrive(&mut self, target: Vec3, slow_radius: f32, weight: f32) {
        let offset = target - self.body.position;
        let dist = offset.length();
        let speed = if slow_radius > 0.0 && dist < slow_radius {
            self.params.max_speed * dist / slow_radius
        } else {
            self.params.max_speed
        };
        let desired = offset.normalized() * speed;
        self.total += (desired - self.body.velocity) * weight;
    }

    /// Brake toward zero velocity.
    pub fn stop(&mut self, weight: f32) {
        self.total += -self.body.velocity * weight;
    }

    // ── Wander ────────────────────────────────────────────────────────────────

    /// Perturb the persistent `angle` by at most
    /// `max_wander_change_per_sec × dt`, clamp it to `±max_wander_angle`,
    /// and seek one unit ahead along the facing rotated by that angle.
    pub fn wander(&mut self, angle: &mut f32, rng: &mut AgentRng, dt: f32, weight: f32) {
        let change = self.params.max_wander_change_per_sec * dt.max(0.0);
        *angle += rng.range(-change, change);
        *angle = angle.clamp(-self.params.max_wander_angle, self.params.max_wander_angle);

        let heading = self.body.direction.normalized().rotate_y(*angle);
        self.seek(self.body.position + heading, weight);
    }

    // ── Pursue / evade ────────────────────────────────────────────────────────

    /// Seek `other`'s extrapolated position when it moves less in
    /// `time_ahead` than the current separation, else its current position.
    pub fn pursue(&mut self, other: &KinematicBody, time_ahead: f32, weight: f32) {
        let aim = self.intercept_point(other, time_ahead);
        self.seek(aim, weight);
    }

    pub fn evade(&mut self, other: &KinematicBody, time_ahead: f32, weight: f32) {
        let aim = self.intercept_point(other, time_ahead);
        self.flee(aim, weight);
    }

    fn intercept_point(&self, other: &KinematicBody, time_ahead: f32) -> Vec3 {
        let future = other.future_position(time_ahead);
        let future_sq = (future - other.position).length_squared();
        let dist_sq = (self.body.position - other.position).length_squared();
        if future_sq < dist_sq { future } else { other.position }
    }

    // ── Separation ────────────────────────────────────────────────────────────

    /// Flee every body inside `personal_space`, weighted by
    /// `personal_space² / (dist² + 0.1)`.  The agent's own body (zero
    /// distance) is skipped, so `others` may include it.
    pub fn separate(&mut self, others: &[KinematicBody], weight: f32) {
        let personal_sq = self.params.personal_space * self.params.personal_space;
        for other in others {
            let sq = (other.position - self.body.position).length_squared();
            if sq < f32::EPSILON || sq >= personal_sq {
                continue;
            }
            let w = personal_sq / (sq + 0.1);
            self.flee(other.position, w * weight);
        }
    }

    /// Like [`separate`](Self::separate), but a neighbor ahead along
    /// `prediction_dir` pushes the agent sideways (flee its projection onto
    /// the agent's lateral axis) instead of backwards, so agents heading the
    /// same way slide past each other.
    pub fn separate_predictive(&mut self, others: &[KinematicBody], prediction_dir: Vec3, weight: f32) {
        let dir = prediction_dir.flat().normalized();
        if dir == Vec3::ZERO {
            self.separate(others, weight);
            return;
        }

        let personal_sq = self.params.personal_space * self.params.personal_space;
        for other in others {
            let offset = other.position - self.body.position;
            let sq = offset.length_squared();
            if sq < f32::EPSILON || sq >= personal_sq {
                continue;
            }
            let w = personal_sq / (sq + 0.1) * weight;

            let ahead = offset.dot(dir);
            if ahead > 0.0 {
                let mut lateral = offset - dir * ahead;
                if lateral.length_squared() < f32::EPSILON {
                    // Dead ahead: sidestep left.
                    lateral = dir.right_of() * f32::EPSILON.sqrt();
                }
                self.flee(self.body.position + lateral, w);
            } else {
                self.flee(other.position, w);
            }
        }
    }

    // ── Obstacle avoidance ────────────────────────────────────────────────────

    /// Steer sideways away from `obstacle` if it lies within vision range
    /// ahead and overlaps the agent's path.
    pub fn avoid_obstacle(&mut self, obstacle: &Obstacle, weight: f32) {
        let facing = self.body.direction.flat().normalized();
        if facing == Vec3::ZERO {
            return;
        }
        let right = facing.right_of();
        let offset = (obstacle.position - self.body.position).flat();
        let combined = obstacle.radius + self.body.radius;

        let forward = offset.dot(facing);
        if forward < 0.0 || forward > self.params.vision_range + combined {
            return;
        }
        let lateral = offset.dot(right);
        if lateral.abs() >= combined {
            return;
        }

        let side = if lateral >= 0.0 { -right } else { right };
        let desired = side * self.params.max_speed;
        let w = self.params.vision_range / (forward + 0.1);
        self.total += (desired - self.body.velocity) * (w * weight);
    }

    pub fn avoid_all_obstacles<'o, I>(&mut self, obstacles: I, weight: f32)
    where
        I: IntoIterator<Item = &'o Obstacle>,
    {
        for o in obstacles {
            self.avoid_obstacle(o, weight);
        }
    }

    /// Seek `target` while routing around blocking obstacles on tangents.
    /// Returns the route taken.
    pub fn avoid_all_obstacles_and_seek<'o, I>(&mut self, target: Vec3, obstacles: I, weight: f32) -> Route
    where
        I: IntoIterator<Item = &'o Obstacle> + Clone,
    {
        let route = plan_detour(
            self.body.position,
            self.body.radius,
            self.params.vision_range,
            target,
            obstacles,
        );
        match route {
            Route::Direct => self.seek(target, weight),
            Route::Detour(point) => self.seek(point, weight),
            Route::Escape(center) => self.flee(center, weight),
        }
        route
    }

    // ── Bounds ────────────────────────────────────────────────────────────────

    /// Seek the region's center when the 1 s future position would touch
    /// the `[min, max]` box edge (inset by the body radius).
    pub fn stay_in_bounds(&mut self, min: Vec3, max: Vec3, weight: f32) {
        let f = self.body.future_position(1.0);
        let r = self.body.radius;
        if f.x < min.x + r || f.x > max.x - r || f.z < min.z + r || f.z > max.z - r {
            self.seek(((min + max) * 0.5).flat(), weight);
        }
    }

    /// Flee the region's center when the 1 s future position would enter
    /// the `[min, max]` box (grown by the body radius).
    pub fn stay_out_of_bounds(&mut self, min: Vec3, max: Vec3, weight: f32) {
        let f = self.body.future_position(1.0);
        let r = self.body.radius;
        if f.x > min.x - r && f.x < max.x + r && f.z > min.z - r && f.z < max.z + r {
            self.flee(((min + max) * 0.5).flat(), weight);
        }
    }
}
