//! Цели трекинга (TrackingSource)
//!
//! Внешний слой (VR-устройства, scripted driver в тестах) пишет сюда
//! per-tick цели контроллеров и головы. Core только читает.

use bevy::prelude::*;

use super::hand::HandSide;

/// Цель одной руки: позиция контроллера + референс плеча
///
/// Оба — локальные офсеты относительно transform'а тела (риг без
/// вращения): world = body.translation + local.
#[derive(Debug, Clone, Copy)]
pub struct TrackedHand {
    /// Целевая позиция контроллера
    pub controller_local: Vec3,
    /// Референс плеча для arm-length клампа
    pub shoulder_local: Vec3,
}

/// Per-tick цели трекинга для всего рига
#[derive(Component, Debug, Clone)]
pub struct TrackedRig {
    /// Позиция головы относительно тела
    pub head_local: Vec3,
    pub left: TrackedHand,
    pub right: TrackedHand,
}

impl Default for TrackedRig {
    fn default() -> Self {
        Self {
            head_local: Vec3::new(0.0, 0.6, 0.0), // голова над корнем рига
            left: TrackedHand {
                controller_local: Vec3::new(-0.25, 0.45, 0.25),
                shoulder_local: Vec3::new(-0.15, 0.5, 0.0),
            },
            right: TrackedHand {
                controller_local: Vec3::new(0.25, 0.45, 0.25),
                shoulder_local: Vec3::new(0.15, 0.5, 0.0),
            },
        }
    }
}

impl TrackedRig {
    pub fn hand(&self, side: HandSide) -> &TrackedHand {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }

    pub fn hand_mut(&mut self, side: HandSide) -> &mut TrackedHand {
        match side {
            HandSide::Left => &mut self.left,
            HandSide::Right => &mut self.right,
        }
    }

    /// Мировая позиция головы при данном положении тела
    pub fn head_world(&self, body: Vec3) -> Vec3 {
        body + self.head_local
    }

    /// Мировая позиция контроллера при данном положении тела
    pub fn controller_world(&self, side: HandSide, body: Vec3) -> Vec3 {
        body + self.hand(side).controller_local
    }
}
