//! CRAGFALL Simulation Core
//!
//! ECS-симуляция hand-over-hand climbing-локомоции на Bevy 0.16.
//! Тело не управляется напрямую: руки хватаются за геометрию, тело
//! подтягивается за якоря рук. Вся геометрия резолвится swept-sphere
//! запросами (parry через bevy_rapier3d), rigidbody-пайплайн не нужен.
//!
//! Слои:
//! - sweep = геометрический слой (backend, сцена, итеративный резолвер)
//! - locomotion = игровой слой (тик рук/головы/тела, momentum)
//! - внешние слои подписываются на события (RigPoseSynced и другие)

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod config;
pub mod locomotion;
pub mod logger;
pub mod surface;
pub mod sweep;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::{ClimbConfig, ConfigError, ConfigRejected};
pub use locomotion::{
    spawn_climber, ClimbLocomotionPlugin, GripContactChanged, GripReleased, RigPoseSynced,
    SweepTrace, VelocityHistory,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_logger, LogLevel, LogPrinter};
pub use surface::{SurfaceId, SurfaceMaterial, SurfaceMaterials};
pub use sweep::{StaticScene, SweepBackend, SweepHit, SweepOutcome, SweepResolver, CLIMB_GROUP};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct ClimbSimulationPlugin;

impl Plugin for ClimbSimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для climb tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .init_resource::<ClimbConfig>()
            .init_resource::<StaticScene>()
            .init_resource::<SurfaceMaterials>()
            .add_plugins(ClimbLocomotionPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции.
///
/// Время переведено в ручной режим: один `app.update()` == ровно один
/// fixed-тик, прогоны с одним seed бит-в-бит совпадают.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_secs_f64(1.0 / 60.0),
        ))
        .add_plugins(ClimbSimulationPlugin)
        .insert_resource(DeterministicRng::new(seed));

    app
}
