//! Swept-sphere коллизии
//!
//! Домен разбит на три слоя:
//! - backend: trait `SweepBackend` — примитивы sweep/raycast и маски слоёв
//! - scene: `StaticScene` — parry-реализация backend'а поверх brush-списка
//! - resolver: `SweepResolver` — трёхступенчатый итеративный resolve
//!   (контакт + скольжение вдоль поверхности + повторное прижатие)
//!
//! Ключевая семантика backend'а: sweep НЕ видит brush'и, которых сфера
//! уже касается на старте. Без этого рука, лежащая на поверхности,
//! блокировала бы любое тангенциальное движение.

pub mod backend;
pub mod resolver;
pub mod scene;

pub use backend::{SweepBackend, SweepHit, CLIMB_GROUP};
pub use resolver::{SweepOutcome, SweepResolver};
pub use scene::StaticScene;
