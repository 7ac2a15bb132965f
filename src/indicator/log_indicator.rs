use super::Indicator;
use crate::model::{BoxStatus, BoxView};
use tracing::{error, info};

pub struct LogIndicator;

impl LogIndicator {
    pub fn new() -> Self {
        info!("Инициализация LogIndicator");
        Self
    }
}

impl Indicator for LogIndicator {
    fn status_changed(&self, combined: BoxStatus, boxes: &[BoxView]) {
        let summary = boxes
            .iter()
            .map(|b| format!("{}={}", b.name, b.status))
            .collect::<Vec<_>>()
            .join(", ");
        info!("Общее состояние: {} [{}]", combined, summary);
    }

    fn show_error(&self, message: &str) {
        error!("{}", message);
    }
}
