//! Headless симуляция CRAGFALL
//!
//! Запускает Bevy App без рендера: скриптованные руки карабкаются по
//! уступам, тело подтягивается за ними. Для проверки детерминизма и
//! поведения без VR-устройств.

use bevy::prelude::*;
use rand::Rng;

use cragfall_simulation::locomotion::climb_locomotion_tick;
use cragfall_simulation::{
    create_headless_app, spawn_climber, ClimbConfig, DeterministicRng, Hands, StaticScene,
    SurfaceId, SurfaceMaterial, SurfaceMaterials, TrackedRig, CLIMB_GROUP,
};

fn main() {
    let seed = 42;
    println!("Starting CRAGFALL headless climb (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_systems(FixedUpdate, drive_climbing_hands.before(climb_locomotion_tick));

    let slippery = build_crag(app.world_mut());
    {
        let mut materials = app.world_mut().resource_mut::<SurfaceMaterials>();
        materials.insert(
            slippery,
            SurfaceMaterial {
                slip_percentage: 0.8,
                ..Default::default()
            },
        );
    }

    let config = app.world().resource::<ClimbConfig>().clone();
    spawn_climber(app.world_mut(), Vec3::new(0.0, 1.2, 0.0), &config);

    // 600 тиков: падение на пол, хват, подъём по уступам
    for tick in 0..600 {
        app.update();

        if tick % 60 == 0 {
            let mut query = app.world_mut().query::<(&Transform, &Hands)>();
            if let Some((transform, hands)) = query.iter(app.world()).next() {
                println!(
                    "Tick {}: body y = {:.2}, grip = {}/{}",
                    tick,
                    transform.translation.y,
                    hands.left.is_contacting,
                    hands.right.is_contacting,
                );
            }
        }
    }

    println!("Climb complete!");
}

/// Пол и лестница из уступов; возвращает поверхность скользкого уступа
fn build_crag(world: &mut World) -> SurfaceId {
    let mut scene = world.resource_mut::<StaticScene>();
    scene.add_box(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(20.0, 0.5, 20.0),
        CLIMB_GROUP,
    );
    // уступы через каждый метр высоты, валун-зацеп сбоку от маршрута
    scene.add_ball(Vec3::new(0.8, 1.4, 1.15), 0.25, CLIMB_GROUP);
    scene.add_box(Vec3::new(0.0, 0.9, 1.0), Vec3::new(2.0, 0.1, 0.3), CLIMB_GROUP);
    scene.add_box(Vec3::new(0.0, 1.9, 1.3), Vec3::new(2.0, 0.1, 0.3), CLIMB_GROUP);
    scene.add_box(Vec3::new(0.0, 2.9, 1.6), Vec3::new(2.0, 0.1, 0.3), CLIMB_GROUP)
}

/// Скриптованный драйвер рук: каждый тик контроллеры продавливаются
/// вниз от текущих якорей, с небольшим шумом трекинга
fn drive_climbing_hands(
    mut rng: ResMut<DeterministicRng>,
    mut climbers: Query<(&Transform, &Hands, &mut TrackedRig)>,
) {
    for (transform, hands, mut rig) in &mut climbers {
        let body = transform.translation;
        let pull = Vec3::new(0.0, -0.25, 0.0);

        let mut jitter = || {
            Vec3::new(
                (rng.rng.gen::<f32>() - 0.5) * 0.01,
                0.0,
                (rng.rng.gen::<f32>() - 0.5) * 0.01,
            )
        };

        let left = hands.left.position - body + pull + jitter();
        let right = hands.right.position - body + pull + jitter();
        rig.left.controller_local = left;
        rig.right.controller_local = right;
    }
}
