use super::Indicator;
use crate::model::{BoxStatus, BoxView};
use std::io::Write;
use tracing::{debug, info};

/// Печатает меню боксов в stdout, ошибки в stderr
pub struct ConsoleIndicator;

impl ConsoleIndicator {
    pub fn new() -> Self {
        info!("Инициализация ConsoleIndicator");
        Self
    }

    fn glyph(status: BoxStatus) -> &'static str {
        match status {
            BoxStatus::Closed => "[ ]",
            BoxStatus::Opened => "[+]",
            BoxStatus::Error => "[!]",
        }
    }

    pub(crate) fn render(combined: BoxStatus, boxes: &[BoxView]) -> String {
        let mut out = format!("{} loot: {}\n", Self::glyph(combined), combined);
        if boxes.is_empty() {
            out.push_str("    (боксов нет)\n");
        }
        for b in boxes {
            out.push_str(&format!("    {} {}\n", Self::glyph(b.status), b.name));
        }
        out
    }
}

impl Indicator for ConsoleIndicator {
    fn status_changed(&self, combined: BoxStatus, boxes: &[BoxView]) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout
            .write_all(Self::render(combined, boxes).as_bytes())
            .and_then(|_| stdout.flush())
        {
            debug!("Не удалось вывести состояние: {}", e);
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("loot: ошибка: {}", message);
    }
}
