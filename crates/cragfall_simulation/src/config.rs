//! Конфигурация climb-локомоции
//!
//! Все tuning-значения контроллера в одном resource. Валидация — на
//! setup'е, до первого тика: невалидный config паркует симуляцию
//! (`ConfigRejected`), ошибки в середине тика не возникают.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tuning-значения climb-локомоции
///
/// Низкий `velocity_history_size` рекомендуется для более отзывчивого
/// движения.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ClimbConfig {
    /// Радиус сферы руки (метры)
    pub hand_radius: f32,
    /// Радиус сферы головы (метры)
    pub head_radius: f32,

    /// Точность sweep'ов, (0, 1]. Эффективный радиус = radius·precision
    pub default_precision: f32,

    /// Slip по умолчанию при хвате двумя руками (двуручный упор не
    /// должен держать на 100%)
    pub default_slide_factor: f32,
    /// Slip по умолчанию одной рукой (почти жёсткий хват)
    pub single_hand_slip: f32,

    /// Дистанция рука-якорь, после которой хват может сорваться (метры)
    pub unstick_distance: f32,

    /// Минимальная средняя скорость рук, чтобы она передалась телу (m/s)
    pub velocity_limit: f32,
    /// Максимальная скорость, которую руки могут придать телу (m/s)
    pub max_force_velocity: f32,
    /// Множитель усилия рук
    pub force_multiplier: f32,
    /// Размер окна средней скорости (тиков), >= 1
    pub velocity_history_size: usize,

    /// Максимальная длина руки от плеча (метры)
    pub arm_length: f32,

    /// Выключает передачу momentum телу (сам climbing остаётся)
    pub movement_enabled: bool,
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            hand_radius: 0.15,
            head_radius: 0.2,
            default_precision: 0.995,
            default_slide_factor: 0.03,
            single_hand_slip: 0.001,
            unstick_distance: 1.25,
            velocity_limit: 2.75,
            max_force_velocity: 14.0,
            force_multiplier: 1.0,
            velocity_history_size: 6,
            arm_length: 3.65,
            movement_enabled: true,
        }
    }
}

impl ClimbConfig {
    /// Проверка инвариантов конфигурации. Вызывается один раз до старта
    /// цикла (см. `validate_config` в locomotion).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.velocity_history_size < 1 {
            return Err(ConfigError::HistoryWindow(self.velocity_history_size));
        }
        if self.hand_radius <= 0.0 {
            return Err(ConfigError::Radius("hand_radius", self.hand_radius));
        }
        if self.head_radius <= 0.0 {
            return Err(ConfigError::Radius("head_radius", self.head_radius));
        }
        if !(self.default_precision > 0.0 && self.default_precision <= 1.0) {
            return Err(ConfigError::Precision(self.default_precision));
        }
        if self.arm_length <= 0.0 {
            return Err(ConfigError::Radius("arm_length", self.arm_length));
        }
        Ok(())
    }
}

/// Ошибка валидации конфигурации
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Окно истории скорости должно быть >= 1
    HistoryWindow(usize),
    /// Радиус/длина должны быть > 0
    Radius(&'static str, f32),
    /// Precision должен лежать в (0, 1]
    Precision(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HistoryWindow(n) => {
                write!(f, "velocity_history_size must be >= 1, got {}", n)
            }
            ConfigError::Radius(name, v) => write!(f, "{} must be > 0, got {}", name, v),
            ConfigError::Precision(p) => write!(f, "precision must be in (0, 1], got {}", p),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Маркер: конфигурация отклонена, locomotion-системы не выполняются
#[derive(Resource, Debug, Clone)]
pub struct ConfigRejected {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ClimbConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_history_window_rejected() {
        let cfg = ClimbConfig {
            velocity_history_size: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::HistoryWindow(0)));
    }

    #[test]
    fn test_bad_precision_rejected() {
        let cfg = ClimbConfig {
            default_precision: 0.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Precision(_))));

        let cfg = ClimbConfig {
            default_precision: 1.5,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Precision(_))));
    }

    #[test]
    fn test_negative_radius_rejected() {
        let cfg = ClimbConfig {
            hand_radius: -0.1,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Radius("hand_radius", _))));
    }
}
