//! Surface materials — свойства поверхностей, за которые можно хвататься
//!
//! Заменяет reflection-lookup компонента на struck-объекте: материал
//! ищется по стабильному `SurfaceId` один раз на contact-переход.

use bevy::prelude::*;
use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Стабильный идентификатор поверхности (выдаётся сценой при регистрации)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

/// Авторские свойства поверхности
///
/// `bounciness` и `strength` авторятся вместе со slip, но локомоция
/// читает только `slip_percentage`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    /// 0 — без отскока, 1 — вся скорость сохраняется в обратном направлении
    pub bounciness: f32,
    /// 0 — рука держит намертво, 1 — скользит вдоль поверхности полностью
    pub slip_percentage: f32,
    /// Множитель силы хвата на этой поверхности
    pub strength: f32,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            bounciness: 0.0,
            slip_percentage: 0.0,
            strength: 1.0,
        }
    }
}

impl SurfaceMaterial {
    /// Приводит значения к авторским диапазонам:
    /// bounciness [0,5], slip [0,1], strength [0,5]
    pub fn clamped(self) -> Self {
        Self {
            bounciness: self.bounciness.clamp(0.0, 5.0),
            slip_percentage: self.slip_percentage.clamp(0.0, 1.0),
            strength: self.strength.clamp(0.0, 5.0),
        }
    }
}

/// Lookup материалов по поверхности
///
/// Иммутабелен во время тика; авторится внешним слоем при загрузке сцены.
#[derive(Resource, Debug, Default)]
pub struct SurfaceMaterials {
    materials: HashMap<SurfaceId, SurfaceMaterial>,
}

impl SurfaceMaterials {
    pub fn insert(&mut self, surface: SurfaceId, material: SurfaceMaterial) {
        self.materials.insert(surface, material.clamped());
    }

    /// Не у каждой поверхности есть материал — тогда резолвер берёт
    /// slip по умолчанию для текущего режима рук.
    pub fn lookup(&self, surface: SurfaceId) -> Option<SurfaceMaterial> {
        self.materials.get(&surface).copied()
    }
}
