//! Скользящее окно скорости тела
//!
//! Кольцевой буфер мгновенных скоростей; среднее поддерживается
//! инкрементально (+новый/-вытесненный), без пересуммирования окна.

use bevy::prelude::*;

use crate::config::ClimbConfig;

#[derive(Component, Debug, Clone)]
pub struct VelocityHistory {
    samples: Vec<Vec3>,
    index: usize,
    average: Vec3,
    current: Vec3,
    last_position: Vec3,
}

impl VelocityHistory {
    pub fn new(size: usize, start_position: Vec3) -> Self {
        Self {
            samples: vec![Vec3::ZERO; size.max(1)],
            index: 0,
            average: Vec3::ZERO,
            current: Vec3::ZERO,
            last_position: start_position,
        }
    }

    /// Записывает позицию тела за текущий тик.
    ///
    /// При dt ~ 0 мгновенная скорость не пересчитывается (деление на
    /// ноль), в окно повторно уходит предыдущее значение.
    pub fn sample(&mut self, position: Vec3, dt: f32) {
        let size = self.samples.len();
        self.index = (self.index + 1) % size;
        let evicted = self.samples[self.index];

        if dt > 1.0e-6 {
            self.current = (position - self.last_position) / dt;
        }
        self.average += (self.current - evicted) / size as f32;

        self.samples[self.index] = self.current;
        self.last_position = position;
    }

    pub fn average(&self) -> Vec3 {
        self.average
    }

    pub fn instantaneous(&self) -> Vec3 {
        self.current
    }

    /// Momentum, передаваемый телу при отпускании/рывке.
    ///
    /// Среднее ниже `velocity_limit` телу не передаётся (дрожание рук на
    /// месте не должно толкать тело). Итог ограничен `max_force_velocity`.
    pub fn derive_body_velocity(&self, config: &ClimbConfig) -> Option<Vec3> {
        let magnitude = self.average.length();
        if magnitude <= config.velocity_limit {
            return None;
        }

        if magnitude * config.force_multiplier > config.max_force_velocity {
            return Some(self.average.normalize() * config.max_force_velocity);
        }

        let velocity = self.average * config.force_multiplier;
        if velocity.length() > config.max_force_velocity {
            return Some(velocity.normalize() * config.max_force_velocity);
        }
        Some(velocity)
    }
}
