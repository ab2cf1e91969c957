//! Якоря рук и их contact-состояние

use bevy::prelude::*;

use crate::surface::{SurfaceId, SurfaceMaterial};

/// Сторона руки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandSide {
    Left,
    Right,
}

/// Якорь руки — точка мира, к которой рука сейчас разрешена
///
/// Якорь != сырая позиция контроллера: пока рука держится за поверхность,
/// якорь стоит на месте, а контроллер двигается вокруг него (и двигает
/// тело). Инвариант: дистанция до плеча <= arm_length (обеспечивается
/// клампом контроллера, не конструкцией).
#[derive(Debug, Clone, Copy)]
pub struct HandAnchor {
    /// Разрешённая мировая позиция руки
    pub position: Vec3,
    /// Касается ли рука поверхности после текущего тика
    pub is_contacting: bool,
    /// Касалась ли рука поверхности в прошлом тике
    pub was_contacting: bool,
    /// Поверхность текущего контакта (ставится на переходе not-touching → touching)
    pub contact_surface: Option<SurfaceId>,
    /// Материал текущего контакта, если поверхность его имеет
    pub contact_material: Option<SurfaceMaterial>,
}

impl HandAnchor {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            is_contacting: false,
            was_contacting: false,
            contact_surface: None,
            contact_material: None,
        }
    }

    /// Сбрасывает contact-состояние (переход touching → not-touching)
    pub fn clear_contact(&mut self) {
        self.contact_surface = None;
        self.contact_material = None;
    }
}

/// Обе руки климбера
///
/// Один компонент вместо двух entity: тик всегда работает с парой рук
/// (single/dual-hand режим, усреднение displacement'ов).
#[derive(Component, Debug, Clone)]
pub struct Hands {
    pub left: HandAnchor,
    pub right: HandAnchor,
}

impl Hands {
    pub fn anchor(&self, side: HandSide) -> &HandAnchor {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }

    pub fn anchor_mut(&mut self, side: HandSide) -> &mut HandAnchor {
        match side {
            HandSide::Left => &mut self.left,
            HandSide::Right => &mut self.right,
        }
    }

    pub fn any_contacting(&self) -> bool {
        self.left.is_contacting || self.right.is_contacting
    }
}
