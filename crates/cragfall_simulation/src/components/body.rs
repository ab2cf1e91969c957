//! Движение тела климбера

use bevy::prelude::*;

/// Скорость тела (интегрируется в Transform после climb-тика)
///
/// Velocity интегрируем сами: хват гасит её каждый тик, momentum от
/// среднего движения рук записывается сюда же.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct BodyMotion {
    /// Текущая скорость тела (m/s)
    pub velocity: Vec3,
}

/// Последняя безопасная позиция головы
///
/// Head reconciliation свипает голову из этой точки вдоль кандидата
/// body displacement; после применения displacement точка обновляется.
#[derive(Component, Debug, Clone, Copy)]
pub struct HeadAnchor {
    pub last_position: Vec3,
}
