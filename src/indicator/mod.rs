//! Indicator: внешнее представление состояния боксов.
//!
//! Ядро знает только трейт `Indicator` и никогда не проверяет, какая
//! реализация выбрана.

mod console_indicator;
mod log_indicator;
mod r#trait;

pub use self::r#trait::{create_indicator, Indicator};
