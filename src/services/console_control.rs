use crate::events::AppCommand;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Источник команд из консоли: по одной команде на строку.
///
/// Работает в отдельном потоке на блокирующем чтении, чтобы ожидание ввода
/// не мешало завершению рантайма.
pub struct ConsoleControl<R> {
    input: R,
    commands: mpsc::Sender<AppCommand>,
}

impl<R: BufRead> ConsoleControl<R> {
    pub fn new(input: R, commands: mpsc::Sender<AppCommand>) -> Self {
        Self { input, commands }
    }

    /// Читает до конца ввода; конец ввода сам по себе не завершает приложение
    pub fn run(mut self) -> std::io::Result<()> {
        info!("Консоль: list | toggle NAME | refresh NAME | reload | quit");

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                debug!("Конец ввода консоли");
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<AppCommand>() {
                Ok(command) => command,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };

            if self.commands.blocking_send(command).is_err() {
                debug!("Очередь команд закрыта");
                return Ok(());
            }
        }
    }
}
