use crate::error::Result;
use crate::events::AppCommand;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info};

use super::r#trait::DirWatcherTrait;

/// Снимок директории: имя, размер, режим и время изменения каждой записи.
/// `None`, если директорию прочитать нельзя.
pub(crate) type Fingerprint = Option<Vec<(std::ffi::OsString, u64, u32, i64, i64)>>;

pub struct PollingDirWatcher {
    dir: PathBuf,
    polling_interval: Duration,
    commands: mpsc::Sender<AppCommand>,
}

impl PollingDirWatcher {
    pub fn new(dir: PathBuf, polling_interval: Duration, commands: mpsc::Sender<AppCommand>) -> Self {
        Self {
            dir,
            polling_interval,
            commands,
        }
    }

    pub(crate) fn fingerprint(dir: &Path) -> Fingerprint {
        let entries = fs::read_dir(dir).ok()?;
        let mut snapshot: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| {
                let name = entry.file_name();
                // Как и при сканировании, смотрим на цель симлинка
                match fs::metadata(entry.path()) {
                    Ok(m) => (name, m.len(), m.mode(), m.mtime(), m.mtime_nsec()),
                    Err(_) => (name, 0, 0, 0, 0),
                }
            })
            .collect();
        snapshot.sort();
        Some(snapshot)
    }

    async fn run_impl(self) -> Result<()> {
        info!(
            "Опрос {} каждые {}мс",
            self.dir.display(),
            self.polling_interval.as_millis()
        );

        let mut ticker = interval(self.polling_interval);
        let mut previous = Self::fingerprint(&self.dir);

        loop {
            ticker.tick().await;

            let current = Self::fingerprint(&self.dir);
            if current == previous {
                continue;
            }
            previous = current;

            debug!("Содержимое {} изменилось", self.dir.display());
            if self.commands.send(AppCommand::DirectoryChanged).await.is_err() {
                debug!("Очередь команд закрыта, опрос завершён");
                return Ok(());
            }
        }
    }
}

#[async_trait::async_trait]
impl DirWatcherTrait for PollingDirWatcher {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
