//! Итеративный swept-sphere резолвер
//!
//! Разрешает желаемое перемещение сферы (рука или голова) против сцены
//! в три ступени:
//! 1. прямой sweep к цели; при контакте позиция отодвигается от
//!    поверхности на полный радиус;
//! 2. скольжение вдоль плоскости контакта на долю slip (материал
//!    поверхности, иначе дефолт по режиму рук);
//! 3. повторное прижатие к цели из скользнувшей позиции.
//!
//! Каждая ступень сама состоит из пары sweep'ов (уменьшенный радиус +
//! уточнение) и страховочных raycast'ов против туннелирования.

use bevy::prelude::*;
use bevy_rapier3d::geometry::Group;

use crate::config::ClimbConfig;
use crate::surface::SurfaceMaterials;

use super::backend::{SweepBackend, SweepHit};

/// Результат resolve: разрешённая позиция и остановивший контакт
#[derive(Debug, Clone, Copy)]
pub struct SweepOutcome {
    pub position: Vec3,
    /// None — путь до цели свободен (position тогда равна старту,
    /// вызывающий сам решает, куда двигаться)
    pub hit: Option<SweepHit>,
}

/// Резолвер движения одной сферы за один тик
pub struct SweepResolver<'a> {
    backend: &'a dyn SweepBackend,
    materials: &'a SurfaceMaterials,
    mask: Group,
    default_slide_factor: f32,
    single_hand_slip: f32,
}

impl<'a> SweepResolver<'a> {
    pub fn new(
        backend: &'a dyn SweepBackend,
        materials: &'a SurfaceMaterials,
        mask: Group,
        config: &ClimbConfig,
    ) -> Self {
        Self {
            backend,
            materials,
            mask,
            default_slide_factor: config.default_slide_factor,
            single_hand_slip: config.single_hand_slip,
        }
    }

    /// Разрешает перемещение `movement` сферы радиуса `radius` из `start`.
    ///
    /// `dual_hand` выбирает дефолтный slip, когда у поверхности нет
    /// материала: двуручный хват скользит заметнее одноручного.
    pub fn resolve(
        &self,
        start: Vec3,
        radius: f32,
        movement: Vec3,
        precision: f32,
        dual_hand: bool,
    ) -> SweepOutcome {
        if let Some((first_position, first_hit)) =
            self.sphere_cast(start, radius * precision, movement, precision)
        {
            let target = start + movement;

            let slip = first_hit
                .surface
                .and_then(|s| self.materials.lookup(s))
                .map(|m| m.slip_percentage)
                .unwrap_or(if dual_hand {
                    self.default_slide_factor
                } else {
                    self.single_hand_slip
                });

            // скольжение вдоль плоскости контакта в сторону цели
            let slide =
                project_on_plane(target - first_position, first_hit.normal) * slip;

            if let Some((end, hit)) =
                self.sphere_cast(first_position, radius, slide, precision * precision)
            {
                return SweepOutcome {
                    position: end,
                    hit: Some(hit),
                };
            }

            // скольжение могло увести от поверхности, прижимаемся обратно к цели
            let slid = first_position + slide;
            if let Some((end, hit)) = self.sphere_cast(
                slid,
                radius,
                target - slid,
                precision * precision * precision,
            ) {
                return SweepOutcome {
                    position: end,
                    hit: Some(hit),
                };
            }

            // скольжение обогнуло угол и дошло до цели: откат к первой позиции
            return SweepOutcome {
                position: first_position,
                hit: Some(first_hit),
            };
        }

        // уменьшенный повторный sweep: исходная сфера могла стартовать
        // вплотную к поверхности и не увидеть её
        let near_field = movement.normalize_or_zero()
            * (movement.length() + radius * precision * 0.34);
        if let Some((_, hit)) =
            self.sphere_cast(start, radius * precision * 0.66, near_field, precision * 0.66)
        {
            return SweepOutcome {
                position: start,
                hit: Some(hit),
            };
        }

        SweepOutcome {
            position: start,
            hit: None,
        }
    }

    /// Одиночная ступень: sweep уменьшенным радиусом, отодвигание на
    /// полный радиус от нормали, уточняющий sweep и anti-tunnel лучи.
    ///
    /// Some — движение заблокировано (позиция + контакт), None — путь
    /// свободен.
    pub fn sphere_cast(
        &self,
        start: Vec3,
        radius: f32,
        movement: Vec3,
        precision: f32,
    ) -> Option<(Vec3, SweepHit)> {
        let length = movement.length();
        let dir = movement.normalize_or_zero();

        let reach = dir * (length + radius * (1.0 - precision));
        if let Some(outer) = self.backend.sweep_sphere(start, radius * precision, reach, self.mask)
        {
            // целевая позиция держит сферу на полном радиусе от поверхности
            let candidate = outer.point + outer.normal * radius;
            let travel = candidate - start;
            let travel_length = travel.length();
            let travel_dir = travel.normalize_or_zero();

            let refine_reach =
                travel_dir * (travel_length + radius * (1.0 - precision * precision));
            if let Some(inner) = self.backend.sweep_sphere(
                start,
                radius * precision * precision,
                refine_reach,
                self.mask,
            ) {
                // уточнение зацепило геометрию по пути: отступаем по
                // дистанции внешнего sweep'а
                let pulled = start
                    + travel_dir
                        * (outer.distance - radius * (1.0 - precision * precision)).max(0.0);
                return Some((pulled, inner));
            }

            let ray_reach = travel_length + radius * precision * precision * 0.999;
            if let Some(ray_hit) = self.backend.cast_ray(start, travel, ray_reach, self.mask) {
                // сфера проскочила тонкую геометрию, остаёмся на месте
                return Some((start, ray_hit));
            }

            return Some((candidate, outer));
        }

        let ray_reach = length + radius * precision * 0.999;
        if let Some(ray_hit) = self.backend.cast_ray(start, movement, ray_reach, self.mask) {
            return Some((start, ray_hit));
        }

        None
    }
}

/// Проекция вектора на плоскость с нормалью `normal`
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let n = normal.normalize_or_zero();
    v - n * v.dot(n)
}
