//! Per-hand операции climb-тика
//!
//! Чистые функции над `HandAnchor`: итерация хвата, финализация после
//! движения тела, аварийное отлипание. ECS-обвязка живёт в systems.

use bevy::prelude::*;

use crate::components::HandAnchor;
use crate::config::ClimbConfig;
use crate::surface::SurfaceMaterials;
use crate::sweep::SweepResolver;

/// Вклад руки в движение тела за тик
#[derive(Debug, Clone, Copy)]
pub struct HandIteration {
    /// Displacement тела: "куда надо сдвинуть тело, чтобы рука осталась
    /// на якоре"
    pub movement: Vec3,
    pub colliding: bool,
}

/// Переход contact-состояния руки за тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTransition {
    None,
    Entered,
    Exited,
}

/// Кламп позиции контроллера на длину руки от плеча
pub fn clamp_to_arm_length(controller: Vec3, shoulder: Vec3, arm_length: f32) -> Vec3 {
    let offset = controller - shoulder;
    if offset.length() > arm_length {
        shoulder + offset.normalize() * arm_length
    } else {
        controller
    }
}

/// Фаза 1: рука тянется к контроллеру, контакт превращается в рычаг.
///
/// Пока рука держится (was_contacting), нулевой точкой остаётся якорь:
/// движение контроллера от якоря целиком уходит в displacement тела.
/// Свежий контакт использует разрешённую позицию. Travel считается от
/// неклампленного контроллера, displacement — от клампленного.
pub fn update_hand_iteration(
    resolver: &SweepResolver,
    config: &ClimbConfig,
    anchor: &HandAnchor,
    controller_world: Vec3,
    clamped_world: Vec3,
) -> HandIteration {
    let travel = controller_world - anchor.position;
    let outcome = resolver.resolve(
        anchor.position,
        config.hand_radius,
        travel,
        config.default_precision,
        false,
    );

    match outcome.hit {
        Some(_) => {
            let pivot = if anchor.was_contacting {
                anchor.position
            } else {
                outcome.position
            };
            HandIteration {
                movement: pivot - clamped_world,
                colliding: true,
            }
        }
        None => HandIteration {
            movement: Vec3::ZERO,
            colliding: false,
        },
    }
}

/// Фаза 3: после движения тела рука дорезолвливается на новое место.
///
/// `hand_world` — клампленный контроллер уже при новом положении тела;
/// вычитание `body_movement` даёт желаемый сдвиг руки в координатах до
/// движения. Материал поверхности берётся один раз на входе в контакт.
pub fn finalize_against_body(
    resolver: &SweepResolver,
    config: &ClimbConfig,
    materials: &SurfaceMaterials,
    anchor: &mut HandAnchor,
    hand_world: Vec3,
    body_movement: Vec3,
    single_hand: bool,
) -> (bool, ContactTransition) {
    let travel = hand_world - body_movement - anchor.position;
    let outcome = resolver.resolve(
        anchor.position,
        config.hand_radius,
        travel,
        config.default_precision,
        !single_hand,
    );

    let colliding = outcome.hit.is_some();
    anchor.position = if colliding { outcome.position } else { hand_world };

    let transition = if !anchor.was_contacting && colliding {
        anchor.contact_surface = outcome.hit.and_then(|hit| hit.surface);
        anchor.contact_material = anchor
            .contact_surface
            .and_then(|surface| materials.lookup(surface));
        ContactTransition::Entered
    } else if anchor.was_contacting && !colliding {
        anchor.clear_contact();
        ContactTransition::Exited
    } else {
        ContactTransition::None
    };

    (colliding, transition)
}

/// Фаза 5: рука, растянутая дальше unstick_distance, срывается.
///
/// Срыв разрешён только при движении контроллера к голове: тянуть руку
/// СКВОЗЬ геометрию от себя нельзя. Возвращает (colliding, released).
pub fn attempt_unstick(
    config: &ClimbConfig,
    anchor: &mut HandAnchor,
    clamped_world: Vec3,
    head_world: Vec3,
    colliding: bool,
) -> (bool, bool) {
    if !colliding {
        return (false, false);
    }
    if (clamped_world - anchor.position).length() <= config.unstick_distance {
        return (true, false);
    }

    let pulling_towards_body =
        clamped_world.distance(head_world) < anchor.position.distance(head_world);
    if pulling_towards_body {
        anchor.position = clamped_world;
        return (false, true);
    }
    (true, false)
}
