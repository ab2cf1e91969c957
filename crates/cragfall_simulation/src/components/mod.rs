//! ECS Components климбера
//!
//! Организация по доменам:
//! - hand: якоря рук и contact-состояние (HandSide, HandAnchor, Hands)
//! - body: движение тела и "последняя безопасная" позиция головы
//! - tracking: per-tick цели трекинга (контроллеры, голова, плечи)

pub mod body;
pub mod hand;
pub mod tracking;

// Re-exports для удобного импорта
pub use body::*;
pub use hand::*;
pub use tracking::*;
