//! Статическая climbable-сцена поверх parry
//!
//! Brush-список вместо полноценного физического мира: климбер не
//! rigidbody, ему нужны только shape-cast'ы против статики. Каждый brush
//! получает стабильный `SurfaceId` для lookup'а материала.

use bevy::prelude::*;
use bevy_rapier3d::geometry::Group;
use bevy_rapier3d::rapier::parry::math::{Isometry, Point, Real, Vector};
use bevy_rapier3d::rapier::parry::query::{self, PointQuery, Ray, RayCast, ShapeCastOptions};
use bevy_rapier3d::rapier::parry::shape::{Ball, SharedShape};

use crate::surface::SurfaceId;

use super::backend::{SweepBackend, SweepHit};

/// Сфера, касающаяся brush'а ближе этого зазора, для sweep'а невидима
const TOUCH_SKIP_GAP: f32 = 1.0e-6;

struct Brush {
    surface: SurfaceId,
    shape: SharedShape,
    position: Isometry<Real>,
    layers: Group,
}

/// Неподвижная геометрия, против которой резолвится движение
#[derive(Resource, Default)]
pub struct StaticScene {
    brushes: Vec<Brush>,
    next_surface: u32,
}

impl StaticScene {
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layers: Group) -> SurfaceId {
        self.push(
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            center,
            layers,
        )
    }

    pub fn add_ball(&mut self, center: Vec3, radius: f32, layers: Group) -> SurfaceId {
        self.push(SharedShape::ball(radius), center, layers)
    }

    fn push(&mut self, shape: SharedShape, center: Vec3, layers: Group) -> SurfaceId {
        let surface = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.brushes.push(Brush {
            surface,
            shape,
            position: to_isometry(center),
            layers,
        });
        surface
    }

    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }

    /// Восстанавливает нормаль поверхности в точке остановки sweep'а.
    ///
    /// Короткий луч из центра сферы вдоль движения покрывает фронтальные
    /// контакты; на grazing-контактах луч промахивается, тогда нормаль
    /// берётся из ближайшей пары точек. Знак выправляется так, чтобы
    /// нормаль смотрела навстречу движению.
    fn surface_normal(&self, brush: &Brush, center: Vec3, dir: Vec3, radius: f32) -> Option<Vec3> {
        let ray = Ray::new(to_point(center), to_vector(dir));
        if let Some(intersection) =
            brush
                .shape
                .cast_ray_and_get_normal(&brush.position, &ray, radius * 2.0, true)
        {
            let normal = from_vector(intersection.normal);
            if normal.length_squared() > 1.0e-9 {
                return Some(normal.normalize());
            }
        }

        let probe = Ball::new(radius);
        let contact = query::contact(
            &to_isometry(center),
            &probe,
            &brush.position,
            &*brush.shape,
            radius * 0.5,
        )
        .ok()??;
        // normal1 — в локальном пространстве ball'а; изометрия ball'а
        // чисто трансляционная, так что направление уже мировое
        let mut normal = -from_vector(contact.normal1.into_inner());
        if normal.dot(dir) > 0.0 {
            normal = -normal;
        }
        if normal.length_squared() <= 1.0e-9 {
            return None;
        }
        Some(normal.normalize())
    }
}

impl SweepBackend for StaticScene {
    fn sweep_sphere(
        &self,
        start: Vec3,
        radius: f32,
        movement: Vec3,
        mask: Group,
    ) -> Option<SweepHit> {
        let max_distance = movement.length();
        if max_distance < 1.0e-9 {
            return None;
        }
        let dir = movement / max_distance;

        let ball = Ball::new(radius);
        let ball_position = to_isometry(start);
        let velocity = to_vector(dir);
        let still = Vector::zeros();
        let options = ShapeCastOptions::with_max_time_of_impact(max_distance);

        let mut nearest: Option<(f32, &Brush)> = None;
        for brush in &self.brushes {
            if !brush.layers.intersects(mask) {
                continue;
            }
            // касание на старте — brush для sweep'а невидим
            let gap = query::distance(&ball_position, &ball, &brush.position, &*brush.shape)
                .unwrap_or(Real::MAX);
            if gap <= TOUCH_SKIP_GAP {
                continue;
            }
            let Ok(Some(hit)) = query::cast_shapes(
                &ball_position,
                &velocity,
                &ball,
                &brush.position,
                &still,
                &*brush.shape,
                options,
            ) else {
                continue;
            };
            if nearest.map_or(true, |(toi, _)| hit.time_of_impact < toi) {
                nearest = Some((hit.time_of_impact, brush));
            }
        }

        let (toi, brush) = nearest?;
        let center = start + dir * toi;
        let normal = self.surface_normal(brush, center, dir, radius)?;
        Some(SweepHit {
            point: center - normal * radius,
            normal,
            distance: toi,
            surface: Some(brush.surface),
        })
    }

    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: Group,
    ) -> Option<SweepHit> {
        let len = direction.length();
        if len < 1.0e-9 || max_distance <= 0.0 {
            return None;
        }
        let dir = direction / len;
        let ray = Ray::new(to_point(origin), to_vector(dir));

        let mut nearest: Option<(f32, Vec3, SurfaceId)> = None;
        for brush in &self.brushes {
            if !brush.layers.intersects(mask) {
                continue;
            }
            if brush.shape.contains_point(&brush.position, &to_point(origin)) {
                continue;
            }
            let Some(intersection) =
                brush
                    .shape
                    .cast_ray_and_get_normal(&brush.position, &ray, max_distance, true)
            else {
                continue;
            };
            if nearest.map_or(true, |(toi, _, _)| intersection.time_of_impact < toi) {
                nearest = Some((
                    intersection.time_of_impact,
                    from_vector(intersection.normal),
                    brush.surface,
                ));
            }
        }

        let (toi, normal, surface) = nearest?;
        if normal.length_squared() <= 1.0e-9 {
            return None;
        }
        Some(SweepHit {
            point: origin + dir * toi,
            normal: normal.normalize(),
            distance: toi,
            surface: Some(surface),
        })
    }
}

fn to_isometry(v: Vec3) -> Isometry<Real> {
    Isometry::translation(v.x, v.y, v.z)
}

fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

fn from_vector(v: Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}
