//! Moving bodies and the per-tick physics step

use std::collections::VecDeque;

use glam::DVec2;

use super::boundary::Boundary;
use super::collision::{body_boundary_collision, decompose, reflect_velocity};
use super::config::{BodyConfig, BounceSignificance, FrictionModel, SimulationConfig};
use super::events::Impact;
use crate::Color;
use crate::consts::TRAIL_LENGTH;

/// A point mass with a radius, bouncing inside the boundary
#[derive(Debug, Clone)]
pub struct CircleBody {
    pub position: DVec2,
    /// Displacement per tick (pixels/tick)
    pub velocity: DVec2,
    pub radius: f64,
    pub color: Color,
    /// In continuous contact with the wall (sliding friction model only)
    pub sliding: bool,
    /// Body clock at the last bounce that produced a note
    pub last_bounce_time: Option<f64>,
    /// Seconds simulated for this body
    pub time: f64,
    /// Recent positions, oldest first
    pub trail: VecDeque<DVec2>,
}

impl CircleBody {
    pub fn new(position: DVec2, velocity: DVec2, radius: f64, color: Color) -> Self {
        Self {
            position,
            velocity,
            radius,
            color,
            sliding: false,
            last_bounce_time: None,
            time: 0.0,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn from_config(config: &BodyConfig) -> Self {
        Self::new(
            config.position,
            config.launch.velocity(),
            config.radius,
            config.color,
        )
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Record current position to trail, evicting the oldest past the cap
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.position);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    /// Advance one fixed tick
    ///
    /// Gravity is a per-tick velocity increment; `dt` only drives the body
    /// clock used by the sound cooldown. Returns an impact when the tick
    /// ended in a bounce that deserves a note.
    pub fn step(
        &mut self,
        dt: f64,
        boundary: &Boundary,
        config: &SimulationConfig,
    ) -> Option<Impact> {
        self.time += dt;
        self.velocity.y += config.gravity;

        let mut next = self.position + self.velocity;
        let contact = body_boundary_collision(next, self.radius, boundary);

        let impact = if contact.hit {
            next = contact.corrected(next);
            self.resolve_contact(contact.normal, config)
        } else {
            // Free flight: damping never stacks with contact friction
            self.velocity *= config.friction.flight_damping();
            None
        };

        self.position = next;
        self.record_trail();

        if let FrictionModel::Sliding {
            slide_threshold, ..
        } = config.friction
        {
            if self.sliding && self.speed() > slide_threshold {
                self.sliding = false;
            }
        }

        impact
    }

    /// Velocity response for a tick that ended on the wall
    fn resolve_contact(&mut self, normal: DVec2, config: &SimulationConfig) -> Option<Impact> {
        let pre = self.velocity;
        let (vn, tangent) = decompose(pre, normal);

        // Already heading back inside; position correction is enough
        if vn <= 0.0 {
            return None;
        }

        if let FrictionModel::Sliding {
            coefficient,
            slide_threshold,
        } = config.friction
        {
            if self.sliding && vn < slide_threshold {
                self.velocity = tangent * (1.0 - coefficient);
                return None;
            }
        }

        self.velocity = reflect_velocity(pre, normal, config.restitution);

        match config.friction {
            FrictionModel::ConstantDamping { .. } => {}
            FrictionModel::Coulomb {
                coefficient,
                static_threshold,
            } => {
                let (post_vn, post_tangent) = decompose(self.velocity, normal);
                // Friction impulse is bounded by the normal impulse
                let max_drop = coefficient * 2.0 * vn * config.restitution;
                let tangent_speed = post_tangent.length();
                let tangent = if tangent_speed > 0.0 {
                    post_tangent * ((tangent_speed - max_drop).max(0.0) / tangent_speed)
                } else {
                    post_tangent
                };
                self.velocity = normal * post_vn + tangent;
                if self.speed() < static_threshold {
                    self.velocity = DVec2::ZERO;
                }
            }
            FrictionModel::Sliding {
                slide_threshold, ..
            } => {
                if self.speed() < slide_threshold {
                    self.sliding = true;
                }
            }
        }

        let threshold = config.bounce_sound_threshold;
        let significant = match config.significance {
            BounceSignificance::ComponentThreshold => pre.x.abs().max(pre.y.abs()) > threshold,
            BounceSignificance::ImpactSpeed => vn > threshold,
            BounceSignificance::SpeedDelta => (pre.length() - self.speed()).abs() > threshold,
        };
        if !significant {
            return None;
        }

        if let (Some(cooldown), Some(last)) = (config.sound_cooldown, self.last_bounce_time) {
            if self.time - last <= cooldown {
                return None;
            }
        }
        self.last_bounce_time = Some(self.time);

        Some(Impact { speed: vn, normal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn boundary() -> Boundary {
        Boundary::new(DVec2::new(300.0, 300.0), 250.0)
    }

    fn ball(position: DVec2, velocity: DVec2) -> CircleBody {
        CircleBody::new(position, velocity, 30.0, [255, 0, 0])
    }

    fn config(gravity: f64, restitution: f64, friction: FrictionModel) -> SimulationConfig {
        SimulationConfig {
            gravity,
            restitution,
            friction,
            bounce_sound_threshold: 1.0,
            ..Default::default()
        }
    }

    fn no_damping() -> FrictionModel {
        FrictionModel::ConstantDamping { factor: 1.0 }
    }

    #[test]
    fn test_body_at_center_gets_gravity_only() {
        let b = boundary();
        let cfg = config(0.5, 0.8, no_damping());
        let mut body = ball(b.center, DVec2::new(0.0, 5.0));

        let impact = body.step(SIM_DT, &b, &cfg);
        assert!(impact.is_none());
        assert!((body.velocity - DVec2::new(0.0, 5.5)).length() < 1e-12);
        assert!((body.position - DVec2::new(300.0, 305.5)).length() < 1e-12);
    }

    #[test]
    fn test_prediction_landing_on_center_is_not_a_collision() {
        let b = boundary();
        let cfg = config(0.5, 0.8, no_damping());
        // Gravity cancels the upward velocity exactly, so d == 0
        let mut body = ball(b.center, DVec2::new(0.0, -0.5));

        let impact = body.step(SIM_DT, &b, &cfg);
        assert!(impact.is_none());
        assert_eq!(body.velocity, DVec2::ZERO);
        assert_eq!(body.position, b.center);
        assert!(body.position.is_finite());
    }

    #[test]
    fn test_bounce_off_top_of_boundary() {
        // 220 px above the center, heading up into the wall
        let b = boundary();
        let cfg = config(0.5, 0.8, no_damping());
        let mut body = ball(DVec2::new(300.0, 80.0), DVec2::new(0.0, -20.0));

        let impact = body.step(SIM_DT, &b, &cfg).expect("bounce should be significant");

        // Corrected back onto the surface
        assert!((body.position - DVec2::new(300.0, 80.0)).length() < 1e-9);
        assert!(b.penetration(body.position, body.radius).abs() < 1e-9);
        // vy flipped and scaled by |1 - 2e|
        assert!(body.velocity.y > 0.0);
        assert!((body.velocity.y - 19.5 * 0.6).abs() < 1e-9);
        assert!((impact.speed - 19.5).abs() < 1e-9);
        assert!((impact.normal - DVec2::NEG_Y).length() < 1e-12);
    }

    #[test]
    fn test_downward_from_200_above_center_is_plain_flight() {
        // 200 px above the center and falling: 30 px short of the wall
        let b = boundary();
        let cfg = config(0.5, 0.8, no_damping());
        let mut body = ball(DVec2::new(300.0, 100.0), DVec2::new(0.0, 20.0));

        assert!(body.step(SIM_DT, &b, &cfg).is_none());
        assert_eq!(body.velocity, DVec2::new(0.0, 20.5));
        assert_eq!(body.position, DVec2::new(300.0, 120.5));
        assert!(!body.sliding);
        assert!(body.last_bounce_time.is_none());
    }

    #[test]
    fn test_free_flight_keeps_direction() {
        let b = boundary();
        let cfg = config(0.0, 0.8, no_damping());
        let v = DVec2::new(3.0, 4.0);
        let mut body = ball(b.center, v);

        for i in 1..=10 {
            assert!(body.step(SIM_DT, &b, &cfg).is_none());
            assert_eq!(body.velocity, v);
            assert!((body.position - (b.center + v * i as f64)).length() < 1e-9);
        }
    }

    #[test]
    fn test_constant_damping_only_in_flight() {
        let b = boundary();
        let cfg = config(0.0, 1.0, FrictionModel::ConstantDamping { factor: 0.5 });

        let mut flying = ball(b.center, DVec2::new(4.0, 0.0));
        flying.step(SIM_DT, &b, &cfg);
        assert!((flying.velocity.x - 2.0).abs() < 1e-12);

        // Contact tick reflects without also damping
        let mut touching = ball(DVec2::new(520.0, 300.0), DVec2::new(4.0, 0.0));
        touching.step(SIM_DT, &b, &cfg);
        assert!((touching.velocity.x + 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_coulomb_friction_slows_tangential_motion() {
        let b = boundary();
        let start = DVec2::new(300.0, 520.0);
        let v = DVec2::new(10.0, 10.0);

        let mut smooth = ball(start, v);
        smooth.step(SIM_DT, &b, &config(0.0, 0.8, no_damping()));

        let coulomb = FrictionModel::Coulomb {
            coefficient: 0.5,
            static_threshold: 0.0,
        };
        let mut rough = ball(start, v);
        rough.step(SIM_DT, &b, &config(0.0, 0.8, coulomb));

        assert!(rough.speed() < smooth.speed());
        assert!(rough.speed() > 0.0);
        // Normal response is identical; only the tangent is cut
        let n = b.outward_normal_at(rough.position).unwrap();
        assert!((rough.velocity.dot(n) - smooth.velocity.dot(n)).abs() < 1e-9);
    }

    #[test]
    fn test_coulomb_static_threshold_stops_body() {
        let b = boundary();
        let coulomb = FrictionModel::Coulomb {
            coefficient: 1.0,
            static_threshold: 100.0,
        };
        let mut body = ball(DVec2::new(300.0, 520.0), DVec2::new(1.0, 2.0));
        body.step(SIM_DT, &b, &config(0.0, 0.8, coulomb));
        assert_eq!(body.velocity, DVec2::ZERO);
        assert!(b.contains(body.position, body.radius, 1e-6));
    }

    #[test]
    fn test_sliding_state_entered_and_damps_instead_of_bouncing() {
        let b = boundary();
        let sliding = FrictionModel::Sliding {
            coefficient: 0.1,
            slide_threshold: 2.0,
        };
        let mut cfg = config(0.0, 0.8, sliding);
        cfg.bounce_sound_threshold = 5.0;

        let mut body = ball(DVec2::new(300.0, 520.0), DVec2::new(1.0, 1.0));
        assert!(body.step(SIM_DT, &b, &cfg).is_none());
        assert!(body.sliding, "slow bounce should start sliding");

        // Another sub-threshold contact: normal motion is absorbed, not reflected
        body.velocity = DVec2::new(1.0, 1.0);
        body.step(SIM_DT, &b, &cfg);
        let n = b.outward_normal_at(body.position).unwrap();
        assert!(body.velocity.dot(n).abs() < 1e-9);
        assert!(body.speed() < 1.0);
        assert!(body.sliding);
    }

    #[test]
    fn test_sliding_state_left_when_fast_again() {
        let b = boundary();
        let sliding = FrictionModel::Sliding {
            coefficient: 0.1,
            slide_threshold: 2.0,
        };
        let cfg = config(0.0, 0.8, sliding);
        let mut body = ball(b.center, DVec2::new(5.0, 0.0));
        body.sliding = true;
        body.step(SIM_DT, &b, &cfg);
        assert!(!body.sliding);
    }

    #[test]
    fn test_significance_rules() {
        let b = boundary();
        let start = DVec2::new(520.0, 300.0);
        let v = DVec2::new(10.0, 0.0);

        let run = |significance, threshold| {
            let mut cfg = config(0.0, 0.8, no_damping());
            cfg.significance = significance;
            cfg.bounce_sound_threshold = threshold;
            let mut body = ball(start, v);
            body.step(SIM_DT, &b, &cfg).is_some()
        };

        assert!(run(BounceSignificance::ComponentThreshold, 9.0));
        assert!(!run(BounceSignificance::ComponentThreshold, 11.0));
        assert!(run(BounceSignificance::ImpactSpeed, 9.0));
        assert!(!run(BounceSignificance::ImpactSpeed, 10.0));
        // Speed goes 10 -> 6
        assert!(run(BounceSignificance::SpeedDelta, 3.0));
        assert!(!run(BounceSignificance::SpeedDelta, 5.0));
    }

    #[test]
    fn test_sound_cooldown_gates_repeat_bounces() {
        let b = boundary();
        let mut cfg = config(0.0, 0.8, no_damping());
        cfg.sound_cooldown = Some(0.15);
        let v = DVec2::new(10.0, 0.0);
        let mut body = ball(DVec2::new(520.0, 300.0), v);

        assert!(body.step(SIM_DT, &b, &cfg).is_some());
        let first = body.last_bounce_time;

        body.velocity = v;
        assert!(body.step(SIM_DT, &b, &cfg).is_none());
        assert_eq!(body.last_bounce_time, first);

        body.time += 0.2;
        body.velocity = v;
        assert!(body.step(SIM_DT, &b, &cfg).is_some());
    }

    #[test]
    fn test_trail_capped_to_most_recent() {
        let b = boundary();
        let cfg = SimulationConfig::default();
        let mut body = CircleBody::from_config(&cfg.bodies[0]);
        let mut history = Vec::new();

        for _ in 0..150 {
            body.step(SIM_DT, &b, &cfg);
            history.push(body.position);
        }

        assert_eq!(body.trail.len(), TRAIL_LENGTH);
        let expected: Vec<DVec2> = history[50..].to_vec();
        let actual: Vec<DVec2> = body.trail.iter().copied().collect();
        assert_eq!(actual, expected);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn friction_model() -> impl Strategy<Value = FrictionModel> {
            prop_oneof![
                (0.9f64..=1.0).prop_map(|factor| FrictionModel::ConstantDamping { factor }),
                (0.0f64..=1.0, 0.0f64..1.0).prop_map(|(coefficient, static_threshold)| {
                    FrictionModel::Coulomb {
                        coefficient,
                        static_threshold,
                    }
                }),
                (0.0f64..=1.0, 0.0f64..3.0).prop_map(|(coefficient, slide_threshold)| {
                    FrictionModel::Sliding {
                        coefficient,
                        slide_threshold,
                    }
                }),
            ]
        }

        proptest! {
            #[test]
            fn body_stays_inside_boundary(
                angle in 0.0f64..std::f64::consts::TAU,
                reach in 0.0f64..=1.0,
                vx in -40.0f64..40.0,
                vy in -40.0f64..40.0,
                gravity in 0.0f64..2.0,
                restitution in 0.0f64..=1.0,
                friction in friction_model(),
                ticks in 1usize..300,
            ) {
                let b = boundary();
                let radius = 30.0;
                let start = b.center
                    + DVec2::new(angle.cos(), angle.sin()) * reach * (b.radius - radius);
                let cfg = config(gravity, restitution, friction);
                let mut body = CircleBody::new(start, DVec2::new(vx, vy), radius, [255, 0, 0]);

                for _ in 0..ticks {
                    body.step(SIM_DT, &b, &cfg);
                    prop_assert!(
                        b.contains(body.position, body.radius, crate::consts::CONTAINMENT_EPSILON),
                        "penetration {} at {:?}",
                        b.penetration(body.position, body.radius),
                        body.position
                    );
                }
            }

            #[test]
            fn bounce_never_adds_energy(
                angle in 0.0f64..std::f64::consts::TAU,
                speed in 0.1f64..50.0,
                heading in -1.2f64..1.2,
                restitution in 0.0f64..=1.0,
            ) {
                let b = boundary();
                let radius = 30.0;
                let outward = DVec2::new(angle.cos(), angle.sin());
                // Touching the wall, moving within ~70° of the outward normal
                let start = b.center + outward * (b.radius - radius);
                let dir = DVec2::from_angle(heading).rotate(outward);
                let cfg = config(0.0, restitution, no_damping());
                let mut body = CircleBody::new(start, dir * speed, radius, [255, 0, 0]);

                let before = body.speed();
                body.step(SIM_DT, &b, &cfg);
                prop_assert!(body.speed() <= before + 1e-9);
            }
        }
    }
}
