use crate::config::Config;
use crate::error::Result;
use crate::events::AppCommand;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::notify_watcher::NotifyDirWatcher;
use super::polling_watcher::PollingDirWatcher;

/// Trait for directory watchers that can run in different modes
#[async_trait::async_trait]
pub trait DirWatcherTrait {
    /// Run the watcher until the command queue is closed
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create a watcher for the configured mode.
///
/// Failure to set up notify is not fatal: the user can always reload by
/// hand, so we fall back to polling.
pub fn create_dir_watcher(
    config: &Config,
    dir: PathBuf,
    commands: mpsc::Sender<AppCommand>,
) -> Result<Box<dyn DirWatcherTrait + Send>> {
    let polling = |dir: PathBuf, commands: mpsc::Sender<AppCommand>| {
        Box::new(PollingDirWatcher::new(dir, config.polling_interval(), commands))
            as Box<dyn DirWatcherTrait + Send>
    };

    match config.watch.mode.as_str() {
        "notify" => match NotifyDirWatcher::new(dir.clone(), config.debounce(), commands.clone()) {
            Ok(watcher) => Ok(Box::new(watcher)),
            Err(e) => {
                warn!("Не удалось отслеживать {} через notify: {}, переключаемся на polling", dir.display(), e);
                Ok(polling(dir, commands))
            }
        },
        "polling" => {
            info!("Отслеживание {} опросом", dir.display());
            Ok(polling(dir, commands))
        }
        other => Err(crate::loot_error!(internal, "Неизвестный режим отслеживания: {}", other)),
    }
}
