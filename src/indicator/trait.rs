use crate::config::Config;
use crate::model::{BoxStatus, BoxView};
use anyhow::Result;

/// Trait for indicator backends that render box state to the user
pub trait Indicator {
    /// Called after every change: combined status plus the sorted box list
    fn status_changed(&self, combined: BoxStatus, boxes: &[BoxView]);

    /// Show an error message to the user
    fn show_error(&self, message: &str);
}

/// Factory function to create the indicator selected in the config
pub fn create_indicator(config: &Config) -> Result<Box<dyn Indicator + Send>> {
    match config.indicator.backend.as_str() {
        "log" => Ok(Box::new(super::log_indicator::LogIndicator::new())),
        "console" => Ok(Box::new(super::console_indicator::ConsoleIndicator::new())),
        other => anyhow::bail!("Неизвестный индикатор: {}", other),
    }
}
