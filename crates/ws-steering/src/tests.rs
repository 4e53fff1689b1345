//! Unit tests for ws-steering.

#[cfg(test)]
mod helpers {
    use ws_core::Vec3;

    use crate::{KinematicBody, SteeringParams};

    pub fn body_at(x: f32, z: f32) -> KinematicBody {
        KinematicBody::new(Vec3::ground(x, z), 0.5)
    }

    pub fn params() -> SteeringParams {
        SteeringParams::default()
    }
}

#[cfg(test)]
mod body {
    use ws_core::Vec3;

    use super::helpers::body_at;
    use crate::KinematicBody;

    #[test]
    fn velocity_step_is_clamped_position_step_is_not() {
        let mut b = body_at(0.0, 0.0);
        b.apply_force(Vec3::new(1.0, 0.0, 0.0));
        b.integrate(1.0, 0.125);
        assert!((b.velocity.x - 0.125).abs() < 1e-6);
        assert!((b.position.x - 0.125).abs() < 1e-6);
        assert_eq!(b.acceleration, Vec3::ZERO);
    }

    #[test]
    fn force_is_divided_by_mass() {
        let mut b = body_at(0.0, 0.0).with_mass(4.0);
        b.apply_force(Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(b.acceleration, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn slow_body_keeps_direction() {
        let mut b = body_at(0.0, 0.0);
        b.velocity = Vec3::new(0.1, 0.0, 0.0);
        b.integrate(0.016, 0.125);
        assert_eq!(b.direction, Vec3::FORWARD);

        b.velocity = Vec3::new(2.0, 0.0, 0.0);
        b.integrate(0.016, 0.125);
        assert!((b.direction.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn friction_slows_a_coasting_body() {
        let mut b = body_at(0.0, 0.0).with_friction(0.2);
        b.velocity = Vec3::new(1.0, 0.0, 0.0);
        for _ in 0..10 {
            b.integrate(0.1, 0.125);
        }
        assert!(b.velocity.x < 1.0 && b.velocity.x > 0.0, "got {}", b.velocity.x);
    }

    #[test]
    fn zero_direction_is_ignored() {
        let mut b = body_at(0.0, 0.0);
        b.set_direction(Vec3::ZERO);
        assert_eq!(b.direction, Vec3::FORWARD);
    }

    #[test]
    fn validate_rejects_bad_mass_and_radius() {
        assert!(body_at(0.0, 0.0).with_mass(0.0).validate().is_err());
        assert!(KinematicBody::new(Vec3::ZERO, -1.0).validate().is_err());
        assert!(body_at(1.0, 2.0).validate().is_ok());
    }
}

#[cfg(test)]
mod obstacle {
    use ws_core::Vec3;

    use crate::{ObstacleRegistry, PileTimer};

    #[test]
    fn handles_are_never_reused() {
        let mut reg = ObstacleRegistry::new();
        let a = reg.insert(Vec3::ZERO, 1.0);
        assert!(reg.remove(a).is_some());
        let b = reg.insert(Vec3::ZERO, 1.0);
        assert_ne!(a, b);
        assert!(reg.get(a).is_none());
        assert!(reg.remove(a).is_none());
    }

    #[test]
    fn timed_obstacle_lives_for_stay_plus_melt() {
        let mut reg = ObstacleRegistry::new();
        let timer = PileTimer { stay_time: 2.0, melt_time: 1.0 };
        let permanent = reg.insert(Vec3::ground(5.0, 5.0), 1.0);
        let pile = reg.insert_timed(Vec3::ground(1.0, 1.0), 1.0, 10.0, timer);

        assert!(reg.expire(12.9).is_empty());
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.expire(13.0), vec![pile]);
        assert!(reg.get(permanent).is_some());
        assert!(reg.expire(1000.0).is_empty());
    }

    #[test]
    fn melt_fraction_ramps_after_stay() {
        let t = PileTimer::default();
        assert_eq!(t.melt_fraction(5.0), 0.0);
        assert!((t.melt_fraction(13.0) - 0.5).abs() < 1e-6);
        assert_eq!(t.melt_fraction(30.0), 1.0);
        assert_eq!(t.lifetime(), 14.0);
    }
}

#[cfg(test)]
mod steering {
    use ws_core::{AgentId, AgentRng, Vec3};

    use super::helpers::{body_at, params};
    use crate::{Obstacle, Steering};

    #[test]
    fn finish_clamps_to_max_force() {
        let b = body_at(0.0, 0.0);
        let p = params();
        let mut s = Steering::new(&b, &p);
        s.seek(Vec3::ground(10.0, 0.0), 10.0);
        assert!(s.total().length() > p.max_force);
        assert!((s.finish().length() - p.max_force).abs() < 1e-4);
    }

    #[test]
    fn seek_never_overshoots_max_speed() {
        let mut b = body_at(0.0, 0.0);
        let p = params();
        for _ in 0..600 {
            let mut s = Steering::new(&b, &p);
            s.seek(Vec3::ground(1000.0, 400.0), 1.0);
            let f = s.finish();
            b.apply_force(f);
            b.integrate(1.0 / 60.0, 0.125);
            assert!(b.speed() <= p.max_speed + 1e-3, "speed {}", b.speed());
        }
        assert!(b.speed() > p.max_speed * 0.9);
    }

    #[test]
    fn flee_points_away() {
        let b = body_at(0.0, 0.0);
        let p = params();
        let mut s = Steering::new(&b, &p);
        s.flee(Vec3::ground(1.0, 0.0), 1.0);
        assert!(s.total().x < 0.0);
    }

    #[test]
    fn arrive_slows_inside_radius() {
        let b = body_at(0.0, 0.0);
        let p = params();
        let mut near = Steering::new(&b, &p);
        near.arrive(Vec3::ground(1.0, 0.0), 4.0, 1.0);
        let mut far = Steering::new(&b, &p);
        far.arrive(Vec3::ground(10.0, 0.0), 4.0, 1.0);
        assert!((near.total().x - p.max_speed / 4.0).abs() < 1e-5);
        assert!((far.total().x - p.max_speed).abs() < 1e-5);
    }

    #[test]
    fn wander_angle_stays_bounded() {
        let b = body_at(0.0, 0.0);
        let mut p = params();
        p.max_wander_change_per_sec = 720.0;
        let mut rng = AgentRng::new(3, AgentId(0));
        let mut angle = 0.0;
        for _ in 0..5_000 {
            let mut s = Steering::new(&b, &p);
            s.wander(&mut angle, &mut rng, 0.1, 1.0);
            assert!(angle.abs() <= p.max_wander_angle);
        }
    }

    #[test]
    fn separate_skips_self_and_distant() {
        let me = body_at(0.0, 0.0);
        let far = body_at(5.0, 0.0);
        let p = params();
        let mut s = Steering::new(&me, &p);
        s.separate(&[me.clone(), far], 1.0);
        assert_eq!(s.total(), Vec3::ZERO);

        let close = body_at(0.5, 0.0);
        let mut s = Steering::new(&me, &p);
        s.separate(&[me.clone(), close], 1.0);
        assert!(s.total().x < 0.0);
    }

    #[test]
    fn predictive_separation_pushes_sideways_for_neighbor_ahead() {
        let me = body_at(0.0, 0.0);
        // Ahead along +z and slightly to the right.
        let other = body_at(0.2, 0.6);
        let p = params();
        let mut s = Steering::new(&me, &p);
        s.separate_predictive(&[other], Vec3::FORWARD, 1.0);
        let f = s.total();
        assert!(f.x < 0.0, "expected push to the left, got {f}");
        assert!(f.z.abs() < 1e-5, "no backwards push expected, got {f}");
    }

    #[test]
    fn predictive_separation_behind_is_plain_flee() {
        let me = body_at(0.0, 0.0);
        let other = body_at(0.0, -0.5);
        let p = params();
        let mut s = Steering::new(&me, &p);
        s.separate_predictive(&[other], Vec3::FORWARD, 1.0);
        assert!(s.total().z > 0.0);
    }

    #[test]
    fn pursue_leads_a_target_that_moves_slowly() {
        let me = body_at(0.0, 0.0);
        let mut target = body_at(10.0, 0.0);
        target.velocity = Vec3::ground(0.0, 2.0);
        let p = params();
        let mut s = Steering::new(&me, &p);
        s.pursue(&target, 1.0, 1.0);
        assert!(s.total().z > 0.0, "should aim at the future position");

        let mut fast = body_at(1.0, 0.0);
        fast.velocity = Vec3::ground(0.0, 50.0);
        let mut s = Steering::new(&me, &p);
        s.pursue(&fast, 1.0, 1.0);
        assert!(s.total().z.abs() < 1e-5, "should aim at the current position");
    }

    #[test]
    fn evade_flees_where_a_slow_target_is_heading() {
        let me = body_at(0.0, 0.0);
        let mut target = body_at(10.0, 0.0);
        target.velocity = Vec3::ground(0.0, 2.0);
        let p = params();
        let mut s = Steering::new(&me, &p);
        s.evade(&target, 1.0, 1.0);
        assert!(s.total().x < 0.0, "should move away from the target");
        assert!(s.total().z < 0.0, "should flee the future position");

        let mut fast = body_at(1.0, 0.0);
        fast.velocity = Vec3::ground(0.0, 50.0);
        let mut s = Steering::new(&me, &p);
        s.evade(&fast, 1.0, 1.0);
        assert!(s.total().x < 0.0);
        assert!(s.total().z.abs() < 1e-5, "should flee the current position");
    }

    #[test]
    fn avoid_obstacle_steers_away_from_lateral_side() {
        let me = body_at(0.0, 0.0);
        let p = params();
        let right_side = Obstacle::new(Vec3::ground(0.3, 2.0), 0.5);
        let mut s = Steering::new(&me, &p);
        s.avoid_obstacle(&right_side, 1.0);
        assert!(s.total().x < 0.0);

        let behind = Obstacle::new(Vec3::ground(0.0, -2.0), 0.5);
        let mut s = Steering::new(&me, &p);
        s.avoid_all_obstacles([&behind], 1.0);
        assert_eq!(s.total(), Vec3::ZERO);
    }

    #[test]
    fn stay_in_bounds_seeks_center_near_edge() {
        let mut me = body_at(9.0, 0.0);
        me.velocity = Vec3::ground(3.0, 0.0);
        let p = params();
        let mut s = Steering::new(&me, &p);
        s.stay_in_bounds(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0), 1.0);
        assert!(s.total().x < 0.0);

        let centered = body_at(0.0, 0.0);
        let mut s = Steering::new(&centered, &p);
        s.stay_in_bounds(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0), 1.0);
        assert_eq!(s.total(), Vec3::ZERO);
    }

    #[test]
    fn stay_out_of_bounds_flees_forbidden_region() {
        let mut me = body_at(6.0, 0.0);
        me.velocity = Vec3::ground(-2.0, 0.0);
        let p = params();
        let mut s = Steering::new(&me, &p);
        s.stay_out_of_bounds(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, 5.0), 1.0);
        assert!(s.total().x > 0.0);
    }

    #[test]
    fn stop_opposes_velocity() {
        let mut me = body_at(0.0, 0.0);
        me.velocity = Vec3::ground(1.0, -2.0);
        let p = params();
        let mut s = Steering::new(&me, &p);
        s.stop(1.0);
        assert_eq!(s.total(), Vec3::ground(-1.0, 2.0));
    }
}

#[cfg(test)]
mod avoid {
    use ws_core::Vec3;

    use crate::{Obstacle, Route, circle_circle_intersection, plan_detour};

    #[test]
    fn thales_intersection_gives_tangent_points() {
        let origin = Vec3::ZERO;
        let obs = Vec3::ground(0.0, 4.0);
        let (t0, t1) = circle_circle_intersection(obs * 0.5, 2.0, obs, 1.5).unwrap();
        for t in [t0, t1] {
            assert!(((t - obs).length() - 1.5).abs() < 1e-4);
            assert!((t - origin).dot(t - obs).abs() < 1e-3, "not tangent at {t}");
        }
        assert!(t0.x * t1.x < 0.0, "tangents lie on opposite sides");
    }

    #[test]
    fn disjoint_circles_have_no_intersection() {
        assert!(circle_circle_intersection(Vec3::ZERO, 1.0, Vec3::ground(5.0, 0.0), 1.0).is_none());
        assert!(circle_circle_intersection(Vec3::ZERO, 1.0, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn blocking_obstacle_gives_lateral_detour_on_clear_side() {
        let target = Vec3::ground(0.0, 10.0);
        let right = [Obstacle::new(Vec3::ground(0.3, 4.0), 1.0)];
        match plan_detour(Vec3::ZERO, 0.5, 5.0, target, &right) {
            Route::Detour(p) => assert!(p.x < 0.0, "obstacle on the right, pass left: {p}"),
            other => panic!("expected detour, got {other:?}"),
        }

        let left = [Obstacle::new(Vec3::ground(-0.3, 4.0), 1.0)];
        match plan_detour(Vec3::ZERO, 0.5, 5.0, target, &left) {
            Route::Detour(p) => assert!(p.x > 0.0, "obstacle on the left, pass right: {p}"),
            other => panic!("expected detour, got {other:?}"),
        }
    }

    #[test]
    fn detour_clears_the_expanded_circle() {
        let target = Vec3::ground(0.0, 10.0);
        let obs = Obstacle::new(Vec3::ground(0.2, 4.0), 1.0);
        let Route::Detour(p) = plan_detour(Vec3::ZERO, 0.5, 5.0, target, [&obs]) else {
            panic!("expected detour");
        };
        // Distance from the obstacle center to the ray toward `p`.
        let dir = p.normalized();
        let along = obs.position.dot(dir);
        let closest = dir * along;
        assert!((obs.position - closest).length() >= 1.5 - 1e-3);
    }

    #[test]
    fn obstacles_out_of_the_way_route_direct() {
        let target = Vec3::ground(0.0, 10.0);
        let cases = [
            Obstacle::new(Vec3::ground(0.0, -3.0), 1.0), // behind
            Obstacle::new(Vec3::ground(5.0, 4.0), 1.0),  // beside
            Obstacle::new(Vec3::ground(0.0, 9.0), 1.0),  // beyond vision
            Obstacle::new(Vec3::ground(0.0, 2.0), 1.0),  // beyond a near target
        ];
        for (i, o) in cases.iter().enumerate() {
            let goal = if i == 3 { Vec3::ground(0.0, 0.2) } else { target };
            assert_eq!(plan_detour(Vec3::ZERO, 0.5, 5.0, goal, [o]), Route::Direct, "case {i}");
        }
    }

    #[test]
    fn competing_obstacles_pick_a_clearing_tangent() {
        let pair = [
            Obstacle::new(Vec3::ground(0.6, 4.0), 1.0),
            Obstacle::new(Vec3::ground(-0.6, 4.0), 1.0),
        ];
        let Route::Detour(p) = plan_detour(Vec3::ZERO, 0.5, 5.0, Vec3::ground(0.0, 10.0), &pair) else {
            panic!("expected detour");
        };
        assert!(p.z > 0.0, "detour should still make progress: {p}");
        for o in &pair {
            assert!((p - o.position).length() >= 1.5 - 1e-3, "{p} inside the circle around {}", o.position);
            // The whole leg to the detour point stays outside too.
            let dir = p.normalized();
            let along = o.position.dot(dir).clamp(0.0, p.length());
            assert!((o.position - dir * along).length() >= 1.5 - 1e-3, "leg to {p} crosses {}", o.position);
        }
    }

    #[test]
    fn nearer_blocker_decides_the_detour() {
        let target = Vec3::ground(0.0, 10.0);
        let near = Obstacle::new(Vec3::ground(0.4, 2.5), 0.5);
        let far = Obstacle::new(Vec3::ground(-0.4, 5.0), 0.5);
        let Route::Detour(p) = plan_detour(Vec3::ZERO, 0.5, 6.0, target, [&near, &far]) else {
            panic!("expected detour");
        };
        assert!(p.x < 0.0, "near blocker on the right, pass left: {p}");
        assert!((p - near.position).length() >= 1.0 - 1e-3);
    }

    #[test]
    fn opposing_avoidance_falls_back_to_direct() {
        // Boxed in: every forward tangent is cut by a neighbour, only the
        // outer tangents of the flanking obstacles are clear and they point back.
        let obstacles = [
            Obstacle::new(Vec3::ground(0.0, 1.2), 0.6),
            Obstacle::new(Vec3::ground(1.0, 0.5), 0.6),
            Obstacle::new(Vec3::ground(-1.0, 0.5), 0.6),
        ];
        let route = plan_detour(Vec3::ZERO, 0.5, 5.0, Vec3::ground(0.0, 10.0), &obstacles);
        assert_eq!(route, Route::Direct);
    }

    #[test]
    fn penetration_escapes_deepest_obstacle() {
        let shallow = Obstacle::new(Vec3::ground(1.4, 0.0), 1.0);
        let deep = Obstacle::new(Vec3::ground(0.0, 0.2), 1.0);
        let route = plan_detour(Vec3::ZERO, 0.5, 5.0, Vec3::ground(0.0, 10.0), [&shallow, &deep]);
        assert_eq!(route, Route::Escape(deep.position));
    }
}

#[cfg(test)]
mod projectile {
    use ws_core::Vec3;

    use crate::{GRAVITY, Projectile, ProjectileStep, ballistic_launch_velocity};

    #[test]
    fn lands_on_ground_plane() {
        let mut p = Projectile::new(Vec3::new(2.0, 0.05, 3.0), Vec3::new(1.0, 0.0, 0.0));
        match p.step(0.1) {
            ProjectileStep::Landed(at) => {
                assert_eq!(at.y, 0.0);
                assert!((at.z - 3.0).abs() < 1e-6);
            }
            ProjectileStep::Flying => panic!("should have landed"),
        }
    }

    #[test]
    fn ballistic_solution_hits_target() {
        let from = Vec3::new(0.0, 1.5, 0.0);
        let to = Vec3::ground(6.0, 8.0);
        let v = ballistic_launch_velocity(from, to, 60.0, GRAVITY.y).unwrap();
        let mut p = Projectile::new(from, v);
        let dt = 1.0 / 1000.0;
        let landed = (0..20_000).find_map(|_| match p.step(dt) {
            ProjectileStep::Landed(at) => Some(at),
            ProjectileStep::Flying => None,
        });
        let at = landed.expect("projectile never landed");
        assert!((at - to).length() < 0.15, "landed at {at}");
    }

    #[test]
    fn impossible_throws_have_no_solution() {
        let from = Vec3::new(0.0, 1.0, 0.0);
        assert!(ballistic_launch_velocity(from, Vec3::ZERO, 60.0, GRAVITY.y).is_none());
        // Target far above a shallow arc.
        assert!(ballistic_launch_velocity(from, Vec3::new(1.0, 50.0, 0.0), 10.0, GRAVITY.y).is_none());
        assert!(ballistic_launch_velocity(from, Vec3::ground(5.0, 0.0), 45.0, 9.81).is_none());
    }
}
