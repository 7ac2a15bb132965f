use crate::error::Result;
use crate::model::{BoxStatus, LootBox};
use crate::services::process_runner::{BoxCommand, CommandRunner};
use std::fmt;
use tracing::{info, warn};

/// Что делает активация бокса в зависимости от его состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxAction {
    Open,
    Close,
    Refresh,
}

impl BoxAction {
    /// Closed -> open, Opened -> close, Error -> повторный опрос
    pub fn for_status(status: BoxStatus) -> Self {
        match status {
            BoxStatus::Closed => BoxAction::Open,
            BoxStatus::Opened => BoxAction::Close,
            BoxStatus::Error => BoxAction::Refresh,
        }
    }
}

impl fmt::Display for BoxAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxAction::Open => f.write_str("open"),
            BoxAction::Close => f.write_str("close"),
            BoxAction::Refresh => f.write_str("refresh"),
        }
    }
}

/// Переходы состояния бокса поверх запуска его скрипта
pub struct BoxStateMachine<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> BoxStateMachine<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Опрос `status`. Никогда не падает: любая проблема даёт `Error`.
    pub fn refresh(&self, lb: &mut LootBox) -> BoxStatus {
        lb.status = match self.runner.run(lb.path(), BoxCommand::Status, true) {
            Ok(output) => {
                let status = BoxStatus::from_status_output(&output);
                if status == BoxStatus::Error {
                    warn!(
                        "Бокс {:?}: непонятный вывод status: {:?}",
                        lb.name(),
                        String::from_utf8_lossy(&output)
                    );
                }
                status
            }
            Err(e) => {
                warn!("Бокс {:?}: опрос состояния не удался: {}", lb.name(), e);
                BoxStatus::Error
            }
        };
        info!("Бокс {}", lb);
        lb.status
    }

    /// Допустим из любого состояния: что делать, решает сам скрипт
    pub fn open(&self, lb: &mut LootBox) -> Result<()> {
        self.transition(lb, BoxCommand::Open, BoxStatus::Opened)
    }

    pub fn close(&self, lb: &mut LootBox) -> Result<()> {
        self.transition(lb, BoxCommand::Close, BoxStatus::Closed)
    }

    /// Применить действие. Ошибка означает, что бокс уже переведён в `Error`.
    pub fn apply(&self, lb: &mut LootBox, action: BoxAction) -> Result<()> {
        match action {
            BoxAction::Open => self.open(lb),
            BoxAction::Close => self.close(lb),
            BoxAction::Refresh => {
                self.refresh(lb);
                Ok(())
            }
        }
    }

    fn transition(&self, lb: &mut LootBox, command: BoxCommand, target: BoxStatus) -> Result<()> {
        info!("Бокс {:?}: {}", lb.name(), command);
        match self.runner.run(lb.path(), command, false) {
            Ok(_) => {
                lb.status = target;
                info!("Бокс {}", lb);
                Ok(())
            }
            Err(e) => {
                lb.status = BoxStatus::Error;
                warn!("Бокс {:?}: {} не удался: {}", lb.name(), command, e);
                Err(e)
            }
        }
    }
}
