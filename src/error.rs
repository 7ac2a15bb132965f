use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LootError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не удалось открыть директорию {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Не удалось запустить {path:?}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} завершился с ошибкой: {status}")]
    ProcessFailure { path: PathBuf, status: ExitStatus },

    #[error("{path:?} не завершился за {timeout:?}")]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("{path:?} вывел больше {limit} байт")]
    OutputOverflow { path: PathBuf, limit: usize },

    #[error("Ошибка отслеживания директории: {0}")]
    Watch(#[from] notify::Error),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl LootError {
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LootError::Directory {
            path: path.into(),
            source,
        }
    }

    pub fn spawn(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LootError::Spawn {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LootError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! loot_error {
    (internal, $($arg:tt)*) => {
        $crate::error::LootError::Internal(format!($($arg)*))
    };
}
