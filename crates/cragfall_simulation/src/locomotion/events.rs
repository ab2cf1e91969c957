//! События climb-локомоции
//!
//! Core не трогает визуальный риг напрямую: внешний слой (рендер,
//! реплликация, отладка) подписывается на события тика.

use bevy::prelude::*;

use crate::components::HandSide;
use crate::surface::SurfaceId;

/// Финальная поза рига за тик: тело и разрешённые позиции рук
#[derive(Event, Debug, Clone, Copy)]
pub struct RigPoseSynced {
    pub entity: Entity,
    pub body: Vec3,
    pub head: Vec3,
    pub left_hand: Vec3,
    pub right_hand: Vec3,
}

/// Рука вошла в контакт с поверхностью или вышла из него
#[derive(Event, Debug, Clone, Copy)]
pub struct GripContactChanged {
    pub entity: Entity,
    pub side: HandSide,
    pub entered: bool,
    /// Поверхность при входе в контакт; None на выходе
    pub surface: Option<SurfaceId>,
}

/// Перерастянутая рука сорвалась с якоря
#[derive(Event, Debug, Clone, Copy)]
pub struct GripReleased {
    pub entity: Entity,
    pub side: HandSide,
    /// Новая позиция якоря (клампленный контроллер)
    pub anchor: Vec3,
}

/// Фаза тика, породившая sweep (для отладочной отрисовки)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStage {
    HandIteration(HandSide),
    HeadReconcile,
    HandFinalize(HandSide),
    GroundGuard,
}

/// Запись одного resolve за тик: чем заменена immediate-отрисовка линий
#[derive(Event, Debug, Clone, Copy)]
pub struct SweepTrace {
    pub entity: Entity,
    pub stage: SweepStage,
    pub start: Vec3,
    pub end: Vec3,
    pub blocked: bool,
}
