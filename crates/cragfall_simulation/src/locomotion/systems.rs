//! ECS-системы climb-тика
//!
//! Порядок внутри тика фиксирован (см. `ClimbLocomotionPlugin`):
//! 1. climb_locomotion_tick — руки, голова, тело, momentum
//! 2. apply_gravity — ускорение свободного падения
//! 3. integrate_body_velocity — интеграция скорости со страховкой головой

use bevy::prelude::*;

use crate::components::{BodyMotion, HandSide, Hands, HeadAnchor, TrackedRig};
use crate::config::{ClimbConfig, ConfigRejected};
use crate::logger::{log_error, log_info};
use crate::surface::SurfaceMaterials;
use crate::sweep::{StaticScene, SweepBackend, SweepResolver, CLIMB_GROUP};

use super::events::{GripContactChanged, GripReleased, RigPoseSynced, SweepStage, SweepTrace};
use super::hand::{self, ContactTransition, HandIteration};
use super::velocity::VelocityHistory;

/// Ускорение свободного падения (m/s^2)
pub const GRAVITY: f32 = 9.81;

/// Startup-проверка конфигурации. Невалидный config не паникует, а
/// паркует locomotion-системы через маркер `ConfigRejected`.
pub fn validate_config(mut commands: Commands, config: Res<ClimbConfig>) {
    if let Err(err) = config.validate() {
        log_error(&format!("climb config rejected: {}", err));
        commands.insert_resource(ConfigRejected {
            reason: err.to_string(),
        });
    }
}

/// Основной тик локомоции: реконсиляция двух рук, головы и тела.
#[allow(clippy::type_complexity)]
pub fn climb_locomotion_tick(
    time: Res<Time>,
    config: Res<ClimbConfig>,
    rejected: Option<Res<ConfigRejected>>,
    scene: Res<StaticScene>,
    materials: Res<SurfaceMaterials>,
    mut climbers: Query<(
        Entity,
        &mut Transform,
        &mut Hands,
        &mut HeadAnchor,
        &mut BodyMotion,
        &mut TrackedRig,
        &mut VelocityHistory,
    )>,
    mut pose_events: EventWriter<RigPoseSynced>,
    mut contact_events: EventWriter<GripContactChanged>,
    mut release_events: EventWriter<GripReleased>,
    mut trace_events: EventWriter<SweepTrace>,
) {
    if rejected.is_some() {
        return;
    }
    let dt = time.delta_secs();
    let resolver = SweepResolver::new(&*scene, &*materials, CLIMB_GROUP, &config);

    for (entity, mut transform, mut hands, mut head, mut motion, mut rig, mut history) in
        &mut climbers
    {
        let body = transform.translation;

        // Фаза 1: руки тянутся к контроллерам, контакт гасит скорость тела
        let mut iterations = [HandIteration {
            movement: Vec3::ZERO,
            colliding: false,
        }; 2];
        for side in [HandSide::Left, HandSide::Right] {
            let tracked = *rig.hand(side);
            let clamped_local = hand::clamp_to_arm_length(
                tracked.controller_local,
                tracked.shoulder_local,
                config.arm_length,
            );
            let controller_world = rig.controller_world(side, body);
            let clamped_world = body + clamped_local;

            let anchor = hands.anchor(side);
            let iteration = hand::update_hand_iteration(
                &resolver,
                &config,
                anchor,
                controller_world,
                clamped_world,
            );
            trace_events.send(SweepTrace {
                entity,
                stage: SweepStage::HandIteration(side),
                start: anchor.position,
                end: controller_world,
                blocked: iteration.colliding,
            });

            if iteration.colliding {
                motion.velocity = Vec3::ZERO;
            }
            // кламп записывается обратно: остаток тика работает с ним
            rig.hand_mut(side).controller_local = clamped_local;
            iterations[side as usize] = iteration;
        }

        let (left_it, right_it) = (iterations[0], iterations[1]);
        let single_hand = !((left_it.colliding || hands.left.was_contacting)
            && (right_it.colliding || hands.right.was_contacting));

        // двуручный хват усредняет вклады, одноручный суммирует
        let mut body_movement = if single_hand {
            left_it.movement + right_it.movement
        } else {
            (left_it.movement + right_it.movement) / 2.0
        };

        // Фаза 2: голова не должна пройти сквозь геометрию
        let head_world = rig.head_world(body);
        let last_head = head.last_position;
        let head_outcome = resolver.resolve(
            last_head,
            config.head_radius,
            body_movement,
            config.default_precision,
            true,
        );
        if head_outcome.hit.is_some() {
            let guard_reach = (head_world - last_head + body_movement).length()
                + config.head_radius * config.default_precision;
            body_movement = if scene
                .cast_ray(last_head, body_movement, guard_reach, CLIMB_GROUP)
                .is_some()
            {
                // голова почти в стене: откат к последней безопасной точке
                last_head - head_world
            } else {
                head_outcome.position - last_head
            };
        }
        trace_events.send(SweepTrace {
            entity,
            stage: SweepStage::HeadReconcile,
            start: last_head,
            end: last_head + body_movement,
            blocked: head_outcome.hit.is_some(),
        });

        transform.translation += body_movement;
        let new_body = transform.translation;
        head.last_position = rig.head_world(new_body);

        // Фаза 3: руки дорезолвливаются на новом месте тела
        let mut colliding = [false; 2];
        for side in [HandSide::Left, HandSide::Right] {
            let hand_world = rig.controller_world(side, new_body);
            let anchor = hands.anchor_mut(side);
            let (hit, transition) = hand::finalize_against_body(
                &resolver,
                &config,
                &materials,
                anchor,
                hand_world,
                body_movement,
                single_hand,
            );
            colliding[side as usize] = hit;

            trace_events.send(SweepTrace {
                entity,
                stage: SweepStage::HandFinalize(side),
                start: hand_world - body_movement,
                end: hand_world,
                blocked: hit,
            });
            match transition {
                ContactTransition::Entered => {
                    log_info(&format!(
                        "{:?} hand grabbed surface {:?}",
                        side, anchor.contact_surface
                    ));
                    contact_events.send(GripContactChanged {
                        entity,
                        side,
                        entered: true,
                        surface: anchor.contact_surface,
                    });
                }
                ContactTransition::Exited => {
                    log_info(&format!("{:?} hand lost contact", side));
                    contact_events.send(GripContactChanged {
                        entity,
                        side,
                        entered: false,
                        surface: None,
                    });
                }
                ContactTransition::None => {}
            }
        }

        // Фаза 4: окно скорости и momentum от рук
        history.sample(new_body, dt);
        if (colliding[0] || colliding[1]) && config.movement_enabled {
            if let Some(velocity) = history.derive_body_velocity(&config) {
                motion.velocity = velocity;
            }
        }

        // Фаза 5: перерастянутые руки срываются
        for side in [HandSide::Left, HandSide::Right] {
            let clamped_world = rig.controller_world(side, new_body);
            let head_now = rig.head_world(new_body);
            let anchor = hands.anchor_mut(side);
            let (still_colliding, released) = hand::attempt_unstick(
                &config,
                anchor,
                clamped_world,
                head_now,
                colliding[side as usize],
            );
            colliding[side as usize] = still_colliding;
            if released {
                log_info(&format!("{:?} hand overextended, grip released", side));
                release_events.send(GripReleased {
                    entity,
                    side,
                    anchor: anchor.position,
                });
            }
        }

        // Фаза 6: фиксация состояния и публикация позы
        hands.left.is_contacting = colliding[0];
        hands.right.is_contacting = colliding[1];
        hands.left.was_contacting = colliding[0];
        hands.right.was_contacting = colliding[1];

        pose_events.send(RigPoseSynced {
            entity,
            body: new_body,
            head: head.last_position,
            left_hand: hands.left.position,
            right_hand: hands.right.position,
        });
    }
}

/// Гравитация тела. Хват гасит накопленную скорость в начале каждого
/// тика, так что висящий климбер не разгоняется.
pub fn apply_gravity(
    time: Res<Time>,
    rejected: Option<Res<ConfigRejected>>,
    mut bodies: Query<&mut BodyMotion, With<Hands>>,
) {
    if rejected.is_some() {
        return;
    }
    let dt = time.delta_secs();
    for mut motion in &mut bodies {
        motion.velocity.y -= GRAVITY * dt;
    }
}

/// Интеграция скорости тела. Свободный полёт контролируется сферой
/// головы: контакт останавливает тело и гасит скорость.
pub fn integrate_body_velocity(
    time: Res<Time>,
    config: Res<ClimbConfig>,
    rejected: Option<Res<ConfigRejected>>,
    scene: Res<StaticScene>,
    materials: Res<SurfaceMaterials>,
    mut bodies: Query<(
        Entity,
        &mut Transform,
        &mut BodyMotion,
        &mut HeadAnchor,
        &TrackedRig,
    )>,
    mut trace_events: EventWriter<SweepTrace>,
) {
    if rejected.is_some() {
        return;
    }
    let dt = time.delta_secs();
    let resolver = SweepResolver::new(&*scene, &*materials, CLIMB_GROUP, &config);

    for (entity, mut transform, mut motion, mut head, rig) in &mut bodies {
        let displacement = motion.velocity * dt;
        if displacement.length_squared() < 1.0e-12 {
            continue;
        }

        let head_world = rig.head_world(transform.translation);
        let outcome = resolver.resolve(
            head_world,
            config.head_radius,
            displacement,
            config.default_precision,
            true,
        );
        let applied = if outcome.hit.is_some() {
            motion.velocity = Vec3::ZERO;
            outcome.position - head_world
        } else {
            displacement
        };
        trace_events.send(SweepTrace {
            entity,
            stage: SweepStage::GroundGuard,
            start: head_world,
            end: head_world + applied,
            blocked: outcome.hit.is_some(),
        });

        transform.translation += applied;
        head.last_position = rig.head_world(transform.translation);
    }
}
