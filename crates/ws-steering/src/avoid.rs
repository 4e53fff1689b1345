//! Tangent-based routing around circular obstacles.
//!
//! # Geometry
//!
//! An obstacle blocks the straight path when it lies ahead of the agent
//! (positive forward distance along the goal direction, within vision range
//! and not beyond the target) and its lateral offset is smaller than the
//! combined radius `obstacle.radius + agent.radius`.
//!
//! For a blocking obstacle at distance `d`, the tangent points on its
//! expanded circle are where that circle meets the Thales circle over the
//! agent-obstacle segment (center at the midpoint, radius `d / 2`): every
//! point on the Thales circle sees the segment at a right angle, so the
//! line from the agent to such a point touches the expanded circle.
//!
//! Both tangents of every blocker are candidates.  Each is scored by its
//! alignment with the goal direction times `1 / (forward² + 0.1)`, so near
//! blockers dominate and the smaller deviation wins for a single blocker.
//! Candidates whose path to the tangent point cuts through another expanded
//! circle are discarded while any clear one remains.  The best candidate
//! becomes the detour unless it points away from the goal, in which case the
//! agent seeks the target directly.
//!
//! All work is done on the ground plane (`y` ignored).

use ws_core::Vec3;

use crate::Obstacle;

/// Where an agent seeking a target should actually steer this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Route {
    /// Nothing blocks: seek the target directly.
    Direct,
    /// Seek this point to slip past the blocking obstacles.
    Detour(Vec3),
    /// The agent is inside this obstacle's combined radius: flee its center.
    Escape(Vec3),
}

/// Intersection points of two circles on the x/z plane.
///
/// Returns `None` when the circles are concentric, disjoint, or one contains
/// the other.
pub fn circle_circle_intersection(c0: Vec3, r0: f32, c1: Vec3, r1: f32) -> Option<(Vec3, Vec3)> {
    let delta = (c1 - c0).flat();
    let d_sq = delta.length_squared();
    if d_sq < f32::EPSILON {
        return None;
    }
    let d = d_sq.sqrt();
    if d > r0 + r1 || d < (r0 - r1).abs() {
        return None;
    }

    let a = (r0 * r0 - r1 * r1 + d_sq) / (2.0 * d);
    let h = (r0 * r0 - a * a).max(0.0).sqrt();
    let base = c0.flat() + delta * (a / d);
    let perp = delta.right_of() * (h / d);
    Some((base + perp, base - perp))
}

/// Decide how an agent at `position` with `radius` should head for `target`.
pub fn plan_detour<'a, I>(
    position:     Vec3,
    radius:       f32,
    vision_range: f32,
    target:       Vec3,
    obstacles:    I,
) -> Route
where
    I: IntoIterator<Item = &'a Obstacle> + Clone,
{
    let origin = position.flat();
    let to_goal = target.flat() - origin;
    let goal_dist_sq = to_goal.length_squared();
    if goal_dist_sq < f32::EPSILON {
        return Route::Direct;
    }
    let goal_dist = goal_dist_sq.sqrt();
    let goal_dir = to_goal / goal_dist;
    let right = goal_dir.right_of();

    // Penetration overrides everything: flee the deepest obstacle.
    let mut deepest: Option<(f32, Vec3)> = None;
    for o in obstacles.clone() {
        let combined = o.radius + radius;
        let sq = origin.distance_squared(o.position.flat());
        if sq < combined * combined {
            let depth = combined - sq.sqrt();
            if deepest.is_none_or(|(best, _)| depth > best) {
                deepest = Some((depth, o.position.flat()));
            }
        }
    }
    if let Some((_, center)) = deepest {
        return Route::Escape(center);
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for o in obstacles.clone() {
        let combined = o.radius + radius;
        let offset = o.position.flat() - origin;
        let forward = offset.dot(goal_dir);
        if forward <= 0.0 || forward > vision_range + combined || forward - combined > goal_dist {
            continue;
        }
        if offset.dot(right).abs() >= combined {
            continue;
        }

        let d = offset.length();
        let midpoint = origin + offset * 0.5;
        let Some((t0, t1)) = circle_circle_intersection(midpoint, d * 0.5, o.position.flat(), combined) else {
            continue;
        };
        let w = 1.0 / (forward * forward + 0.1);
        for tangent in [t0, t1] {
            let reach = (tangent - origin).length();
            if reach < f32::EPSILON {
                continue;
            }
            let dir = (tangent - origin) / reach;
            let alignment = dir.dot(goal_dir);
            candidates.push(Candidate {
                score: w * alignment,
                alignment,
                dir,
                reach,
                clear: true,
            });
        }
    }

    for c in &mut candidates {
        let end = origin + c.dir * c.reach;
        c.clear = obstacles.clone().into_iter().all(|o| {
            let combined = o.radius + radius - CLEARANCE_SLACK;
            segment_distance_sq(origin, end, o.position.flat()) >= combined * combined
        });
    }

    let any_clear = candidates.iter().any(|c| c.clear);
    let best = candidates
        .iter()
        .filter(|c| c.clear || !any_clear)
        .fold(None::<&Candidate>, |best, c| match best {
            Some(b) if b.score >= c.score => Some(b),
            _ => Some(c),
        });

    match best {
        Some(c) if c.alignment > 0.0 => Route::Detour(origin + c.dir * c.reach.max(radius)),
        _ => Route::Direct,
    }
}

/// Tolerance for a tangent point touching its own expanded circle.
const CLEARANCE_SLACK: f32 = 1e-3;

struct Candidate {
    score:     f32,
    alignment: f32,
    dir:       Vec3,
    reach:     f32,
    clear:     bool,
}

fn segment_distance_sq(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < f32::EPSILON {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}
