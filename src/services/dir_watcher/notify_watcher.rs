use crate::error::Result;
use crate::events::AppCommand;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::debounce::absorb_burst;
use super::r#trait::DirWatcherTrait;

pub struct NotifyDirWatcher {
    dir: PathBuf,
    debounce: Duration,
    commands: mpsc::Sender<AppCommand>,
    // Вотчер должен жить, пока идёт отслеживание
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl NotifyDirWatcher {
    pub fn new(dir: PathBuf, debounce: Duration, commands: mpsc::Sender<AppCommand>) -> Result<Self> {
        let (event_tx, events) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            if event_tx.send(res).is_err() {
                debug!("Получатель событий notify закрыт");
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        info!("Отслеживание {} через notify", dir.display());
        Ok(Self {
            dir,
            debounce,
            commands,
            _watcher: watcher,
            events,
        })
    }

    /// Чтение файлов не меняет набор боксов, а запуск скриптов даёт
    /// события доступа, которые иначе зациклили бы перезагрузку.
    pub(crate) fn is_relevant(event: &Event) -> bool {
        !matches!(event.kind, EventKind::Access(_))
    }

    async fn run_impl(mut self) -> Result<()> {
        while let Some(res) = self.events.recv().await {
            match res {
                Ok(event) if Self::is_relevant(&event) => {
                    debug!("Изменение в {}: {:?}", self.dir.display(), event.kind);
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!("Ошибка notify для {}: {}", self.dir.display(), e);
                    continue;
                }
            }

            let open = absorb_burst(&mut self.events, self.debounce).await;

            if self.commands.send(AppCommand::DirectoryChanged).await.is_err() {
                debug!("Очередь команд закрыта, отслеживание завершено");
                return Ok(());
            }
            if !open {
                break;
            }
        }

        error!("Канал событий notify для {} закрыт", self.dir.display());
        Ok(())
    }
}

#[async_trait::async_trait]
impl DirWatcherTrait for NotifyDirWatcher {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
