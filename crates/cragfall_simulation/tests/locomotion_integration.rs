//! Интеграционные тесты climb-локомоции на полном App
//!
//! Руки управляются прямой записью в TrackedRig между тиками: так тест
//! хореографирует захват/протяжку без отдельной driver-системы.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use cragfall_simulation::{
    create_headless_app, set_logger, spawn_climber, ClimbConfig, ConfigRejected, Hands,
    HeadAnchor, LogLevel, LogPrinter, StaticScene, TrackedRig, CLIMB_GROUP,
};

/// App с полом (верхняя грань y = 0) и климбером в `start`
fn setup(config: ClimbConfig, start: Vec3) -> (App, Entity) {
    let mut app = create_headless_app(7);
    app.insert_resource(config.clone());
    {
        let mut scene = app.world_mut().resource_mut::<StaticScene>();
        scene.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            CLIMB_GROUP,
        );
    }
    let entity = spawn_climber(app.world_mut(), start, &config);

    // первый update: Startup + инициализация времени, fixed-тиков ещё нет
    app.update();
    (app, entity)
}

fn body_position(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).map(|t| t.translation).unwrap()
}

fn hands(app: &App, entity: Entity) -> Hands {
    app.world().get::<Hands>(entity).cloned().unwrap()
}

/// Ставит контроллер руки в мировую точку `world` (тик читает локальные
/// координаты относительно тела)
fn place_controllers(app: &mut App, entity: Entity, left_world: Vec3, right_world: Vec3) {
    let body = body_position(app, entity);
    let mut rig = app.world_mut().get_mut::<TrackedRig>(entity).unwrap();
    rig.left.controller_local = left_world - body;
    rig.right.controller_local = right_world - body;
}

/// Один тик с контроллерами, продавленными на `pull` ниже текущих якорей
fn press_tick(app: &mut App, entity: Entity, left_pull: Vec3, right_pull: Vec3) {
    let state = hands(app, entity);
    place_controllers(
        app,
        entity,
        state.left.position + left_pull,
        state.right.position + right_pull,
    );
    app.update();
}

/// Прижимает обе руки к полу до установления хвата
fn establish_grip(app: &mut App, entity: Entity) {
    for _ in 0..10 {
        press_tick(
            app,
            entity,
            Vec3::new(0.0, -0.8, 0.0),
            Vec3::new(0.0, -0.8, 0.0),
        );
        let state = hands(app, entity);
        if state.left.is_contacting && state.right.is_contacting {
            return;
        }
    }
    panic!("hands never reached the floor");
}

#[test]
fn test_pressing_down_climbs_the_body_up() {
    let (mut app, entity) = setup(ClimbConfig::default(), Vec3::new(0.0, 0.5, 0.0));
    let start_y = body_position(&mut app, entity).y;

    let mut max_rise = 0.0_f32;
    for _ in 0..40 {
        press_tick(
            &mut app,
            entity,
            Vec3::new(0.0, -0.25, 0.0),
            Vec3::new(0.0, -0.25, 0.0),
        );
        max_rise = max_rise.max(body_position(&mut app, entity).y - start_y);
    }

    assert!(max_rise > 1.5, "max rise = {}", max_rise);
}

#[test]
fn test_grip_caches_contact_surface() {
    let (mut app, entity) = setup(ClimbConfig::default(), Vec3::new(0.0, 0.4, 0.0));
    establish_grip(&mut app, entity);

    let state = hands(&app, entity);
    assert!(state.left.contact_surface.is_some());
    assert!(state.right.contact_surface.is_some());
}

#[test]
fn test_dual_hand_movement_is_averaged() {
    let config = ClimbConfig {
        movement_enabled: false, // без momentum, тик должен быть чистым
        ..Default::default()
    };
    let (mut app, entity) = setup(config, Vec3::new(0.0, 0.4, 0.0));
    establish_grip(&mut app, entity);

    let before = body_position(&mut app, entity);
    press_tick(
        &mut app,
        entity,
        Vec3::new(0.0, -0.3, 0.0),
        Vec3::new(0.0, -0.1, 0.0),
    );
    let rise = body_position(&mut app, entity).y - before.y;

    // (0.3 + 0.1) / 2, минус гравитационный дрейф за тик
    assert!((rise - 0.2).abs() < 0.02, "rise = {}", rise);
}

#[test]
fn test_single_hand_movement_is_summed() {
    let config = ClimbConfig {
        movement_enabled: false,
        ..Default::default()
    };
    let (mut app, entity) = setup(config, Vec3::new(0.0, 0.4, 0.0));

    // хватается только левая, правая остаётся высоко над полом
    for _ in 0..10 {
        let state = hands(&app, entity);
        let body = body_position(&mut app, entity);
        place_controllers(
            &mut app,
            entity,
            state.left.position + Vec3::new(0.0, -0.8, 0.0),
            body + Vec3::new(0.25, 2.0, 0.25),
        );
        app.update();
        if hands(&app, entity).left.is_contacting {
            break;
        }
    }
    let state = hands(&app, entity);
    assert!(state.left.is_contacting);
    assert!(!state.right.is_contacting);

    let before = body_position(&mut app, entity);
    let body = before;
    place_controllers(
        &mut app,
        entity,
        state.left.position + Vec3::new(0.0, -0.3, 0.0),
        body + Vec3::new(0.25, 2.0, 0.25),
    );
    app.update();
    let rise = body_position(&mut app, entity).y - before.y;

    assert!((rise - 0.3).abs() < 0.02, "rise = {}", rise);
}

#[test]
fn test_head_stops_body_under_ceiling() {
    let config = ClimbConfig {
        movement_enabled: false,
        ..Default::default()
    };
    let (mut app, entity) = setup(config, Vec3::new(0.0, 0.4, 0.0));
    {
        // потолок с нижней гранью y = 1.5
        let mut scene = app.world_mut().resource_mut::<StaticScene>();
        scene.add_box(
            Vec3::new(0.0, 1.75, 0.0),
            Vec3::new(20.0, 0.25, 20.0),
            CLIMB_GROUP,
        );
    }
    establish_grip(&mut app, entity);

    for _ in 0..10 {
        press_tick(
            &mut app,
            entity,
            Vec3::new(0.0, -0.2, 0.0),
            Vec3::new(0.0, -0.2, 0.0),
        );
    }

    let body = body_position(&mut app, entity);
    let head = app.world().get::<HeadAnchor>(entity).unwrap().last_position;

    // голова (радиус 0.2) не проходит под потолок, тело замирает под ней
    assert!(head.y <= 1.31, "head = {:?}", head);
    assert!(head.y > 1.1, "head = {:?}", head);
    assert!(body.y <= 0.72, "body = {:?}", body);
}

#[test]
fn test_released_body_falls_and_rests_on_head() {
    let (mut app, entity) = setup(ClimbConfig::default(), Vec3::new(0.0, 0.4, 0.0));
    establish_grip(&mut app, entity);

    // подъём, затем руки уводятся высоко над головой: хват теряется
    for _ in 0..4 {
        press_tick(
            &mut app,
            entity,
            Vec3::new(0.0, -0.25, 0.0),
            Vec3::new(0.0, -0.25, 0.0),
        );
    }
    let top = body_position(&mut app, entity);
    assert!(top.y > 0.8, "top = {:?}", top);

    for _ in 0..90 {
        let body = body_position(&mut app, entity);
        place_controllers(
            &mut app,
            entity,
            body + Vec3::new(-0.25, 2.0, 0.0),
            body + Vec3::new(0.25, 2.0, 0.0),
        );
        app.update();
    }

    let state = hands(&app, entity);
    assert!(!state.any_contacting());

    // тело падает, пока сфера головы не ляжет на пол: head_local 0.6,
    // радиус головы 0.2 => тело около -0.4
    let rested = body_position(&mut app, entity);
    assert!(rested.y < top.y - 0.5, "rested = {:?}", rested);
    assert!((rested.y + 0.4).abs() < 0.05, "rested = {:?}", rested);
}

/// Printer, складывающий строки в общий буфер
struct CapturePrinter(Arc<Mutex<Vec<String>>>);

impl LogPrinter for CapturePrinter {
    fn print(&self, _level: LogLevel, message: &str) {
        if let Ok(mut lines) = self.0.lock() {
            lines.push(message.to_string());
        }
    }
}

#[test]
fn test_grip_transitions_are_logged() {
    let lines = Arc::new(Mutex::new(Vec::new()));
    set_logger(Box::new(CapturePrinter(lines.clone())));

    let (mut app, entity) = setup(ClimbConfig::default(), Vec3::new(0.0, 0.4, 0.0));
    establish_grip(&mut app, entity);

    let logged = lines.lock().unwrap();
    assert!(
        logged.iter().any(|m| m.contains("hand grabbed surface")),
        "log lines = {:?}",
        *logged
    );
}

#[test]
fn test_rejected_config_parks_the_simulation() {
    let bad = ClimbConfig {
        default_precision: 0.0,
        ..Default::default()
    };
    let (mut app, entity) = setup(bad, Vec3::new(0.0, 2.0, 0.0));

    assert!(app.world().get_resource::<ConfigRejected>().is_some());

    let before = body_position(&mut app, entity);
    for _ in 0..30 {
        app.update();
    }
    // гравитация тоже запаркована: тело не двигается
    assert_eq!(body_position(&mut app, entity), before);
}
