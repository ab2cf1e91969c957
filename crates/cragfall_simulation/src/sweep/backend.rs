//! Примитивы sweep-запросов

use bevy::prelude::*;
use bevy_rapier3d::geometry::Group;

use crate::surface::SurfaceId;

/// Слой climbable-геометрии (аналог locomotion layer mask)
pub const CLIMB_GROUP: Group = Group::GROUP_1;

/// Результат одного sweep'а или raycast'а
#[derive(Debug, Clone, Copy)]
pub struct SweepHit {
    /// Точка контакта на поверхности
    pub point: Vec3,
    /// Нормаль поверхности в точке контакта (направлена навстречу движению)
    pub normal: Vec3,
    /// Дистанция, пройденная центром сферы (или лучом) до контакта
    pub distance: f32,
    /// Поверхность, в которую попали
    pub surface: Option<SurfaceId>,
}

/// Геометрический backend для резолвера
///
/// Контракт обоих методов:
/// - `sweep_sphere`: длина `movement` — это максимальная дистанция sweep'а;
///   нулевой `movement` означает "нет движения" и возвращает None.
///   Brush'и, которых сфера касается уже на старте, игнорируются.
/// - `cast_ray`: brush'и, содержащие origin, игнорируются.
pub trait SweepBackend {
    fn sweep_sphere(&self, start: Vec3, radius: f32, movement: Vec3, mask: Group)
        -> Option<SweepHit>;

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: Group)
        -> Option<SweepHit>;
}

/// Аналитический backend для unit-тестов резолвера: один half-space.
///
/// Считает sweep против плоскости точной формулой, без parry: тесты
/// арифметики резолвера не должны зависеть от численных допусков
/// shape-cast'а.
#[cfg(test)]
pub mod testing {
    use super::*;

    pub struct PlaneBackend {
        /// Точка на плоскости
        pub origin: Vec3,
        /// Единичная нормаль (solid-сторона — против нормали)
        pub normal: Vec3,
        pub surface: Option<SurfaceId>,
    }

    impl PlaneBackend {
        pub fn floor() -> Self {
            Self {
                origin: Vec3::ZERO,
                normal: Vec3::Y,
                surface: Some(SurfaceId(0)),
            }
        }
    }

    impl SweepBackend for PlaneBackend {
        fn sweep_sphere(
            &self,
            start: Vec3,
            radius: f32,
            movement: Vec3,
            _mask: Group,
        ) -> Option<SweepHit> {
            let max_distance = movement.length();
            if max_distance < 1.0e-9 {
                return None;
            }
            let dir = movement / max_distance;

            // зазор между поверхностью сферы и плоскостью на старте
            let clearance = (start - self.origin).dot(self.normal) - radius;
            if clearance <= 1.0e-6 {
                // уже касаемся: sweep этот brush не видит
                return None;
            }

            let approach = dir.dot(self.normal);
            if approach >= 0.0 {
                return None;
            }
            let toi = clearance / -approach;
            if toi > max_distance {
                return None;
            }

            let center = start + dir * toi;
            Some(SweepHit {
                point: center - self.normal * radius,
                normal: self.normal,
                distance: toi,
                surface: self.surface,
            })
        }

        fn cast_ray(
            &self,
            origin: Vec3,
            direction: Vec3,
            max_distance: f32,
            _mask: Group,
        ) -> Option<SweepHit> {
            let len = direction.length();
            if len < 1.0e-9 || max_distance <= 0.0 {
                return None;
            }
            let dir = direction / len;

            let height = (origin - self.origin).dot(self.normal);
            if height <= 0.0 {
                // origin внутри solid-стороны
                return None;
            }
            let approach = dir.dot(self.normal);
            if approach >= 0.0 {
                return None;
            }
            let toi = height / -approach;
            if toi > max_distance {
                return None;
            }

            Some(SweepHit {
                point: origin + dir * toi,
                normal: self.normal,
                distance: toi,
                surface: self.surface,
            })
        }
    }
}
