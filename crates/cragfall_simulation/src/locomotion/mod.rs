//! Climb-локомоция: hand-over-hand движение тела за руками
//!
//! Модель перевёрнута относительно "обычного" характера-контроллера:
//! руки резолвятся против геометрии, а тело подтягивается за якоря рук.
//! Весь домен работает на фиксированном тике 60 Hz.

use bevy::prelude::*;

use crate::components::{BodyMotion, HandAnchor, Hands, HeadAnchor, TrackedRig};
use crate::config::ClimbConfig;

pub mod events;
pub mod hand;
pub mod systems;
pub mod velocity;

pub use events::{GripContactChanged, GripReleased, RigPoseSynced, SweepStage, SweepTrace};
pub use hand::{clamp_to_arm_length, ContactTransition, HandIteration};
pub use systems::{apply_gravity, climb_locomotion_tick, integrate_body_velocity, GRAVITY};
pub use velocity::VelocityHistory;


/// Регистрирует события и системы climb-тика.
///
/// Системы жёстко чейнятся: тик рук/головы, гравитация, интеграция.
pub struct ClimbLocomotionPlugin;

impl Plugin for ClimbLocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RigPoseSynced>()
            .add_event::<GripContactChanged>()
            .add_event::<GripReleased>()
            .add_event::<SweepTrace>()
            .add_systems(Startup, systems::validate_config)
            .add_systems(
                FixedUpdate,
                (
                    systems::climb_locomotion_tick,
                    systems::apply_gravity,
                    systems::integrate_body_velocity,
                )
                    .chain(),
            );
    }
}

/// Спавнит климбера с дефолтным ригом в позиции `position`.
///
/// Якоря рук и последняя позиция головы инициализируются текущими
/// позициями трекинга: первый тик не должен увидеть фантомного движения.
pub fn spawn_climber(world: &mut World, position: Vec3, config: &ClimbConfig) -> Entity {
    let rig = TrackedRig::default();
    let hands = Hands {
        left: HandAnchor::at(position + rig.left.controller_local),
        right: HandAnchor::at(position + rig.right.controller_local),
    };
    let head = HeadAnchor {
        last_position: position + rig.head_local,
    };
    let history = VelocityHistory::new(config.velocity_history_size, position);

    world
        .spawn((
            Transform::from_translation(position),
            hands,
            head,
            BodyMotion::default(),
            rig,
            history,
        ))
        .id()
}
