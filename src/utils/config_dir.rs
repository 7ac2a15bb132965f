use crate::error::{LootError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const APP_DIR: &str = "loot";

/// `$XDG_CONFIG_HOME/loot`, иначе `$HOME/.config/loot`, иначе `/.config/loot`.
/// Пустые значения переменных считаются незаданными.
pub fn resolve_config_dir(xdg_config_home: Option<&str>, home: Option<&str>) -> PathBuf {
    match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(config_home) => Path::new(config_home).join(APP_DIR),
        None => {
            let home = home.filter(|v| !v.is_empty()).unwrap_or("/");
            Path::new(home).join(".config").join(APP_DIR)
        }
    }
}

/// То же по текущему окружению процесса
pub fn default_config_dir() -> PathBuf {
    let xdg = std::env::var("XDG_CONFIG_HOME").ok();
    let home = std::env::var("HOME").ok();
    resolve_config_dir(xdg.as_deref(), home.as_deref())
}

/// Создать директорию вместе с родителями, если её нет.
/// Путь, занятый не директорией, это ошибка.
pub fn ensure_config_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    info!("Создание директории конфигурации {}", dir.display());
    fs::create_dir_all(dir).map_err(|e| LootError::directory(dir, e))
}
