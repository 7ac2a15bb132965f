use crate::error::{LootError, Result};
use crate::model::{BoxSet, LootBox};
use crate::utils::permissions::{is_owner_executable_file, is_visible_name};
use crate::{debug_if_enabled, trace_if_enabled};
use std::fs;
use std::path::Path;
use tracing::info;

/// Поиск боксов в директории конфигурации (без рекурсии).
///
/// Боксом считается любой видимый обычный файл с правом исполнения для
/// владельца. Остальные записи молча пропускаются. При ошибке чтения
/// директории частичный набор не возвращается.
pub fn scan(config_dir: &Path) -> Result<BoxSet> {
    let entries = fs::read_dir(config_dir).map_err(|e| LootError::directory(config_dir, e))?;

    let mut boxes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LootError::directory(config_dir, e))?;
        let file_name = entry.file_name();

        let Some(name) = file_name.to_str() else {
            debug_if_enabled!("Пропускаем запись с не-UTF-8 именем: {:?}", file_name);
            continue;
        };
        if !is_visible_name(name) {
            trace_if_enabled!("Пропускаем скрытую запись {:?}", name);
            continue;
        }

        let path = config_dir.join(name);
        // Как stat(): симлинк на исполняемый файл тоже бокс
        match fs::metadata(&path) {
            Ok(metadata) if is_owner_executable_file(&metadata) => {
                boxes.push(LootBox::new(name, path));
            }
            Ok(_) => {
                debug_if_enabled!("{} не является исполняемым файлом, пропускаем", path.display());
            }
            Err(e) => {
                debug_if_enabled!("Не удалось прочитать атрибуты {}: {}", path.display(), e);
            }
        }
    }

    let set = BoxSet::from_boxes(boxes);
    if set.is_empty() {
        info!("В {} нет ни одного бокса", config_dir.display());
    } else {
        info!("Найдено боксов в {}: {}", config_dir.display(), set.len());
    }
    Ok(set)
}
