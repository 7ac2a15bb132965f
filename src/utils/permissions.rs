use std::fs::Metadata;
use std::os::unix::fs::PermissionsExt;

const OWNER_EXECUTE: u32 = 0o100;

/// Обычный файл с правом исполнения для владельца
pub fn is_owner_executable_file(metadata: &Metadata) -> bool {
    metadata.is_file() && metadata.permissions().mode() & OWNER_EXECUTE != 0
}

/// Скрытые (с точкой в начале) и пустые имена боксами не считаются
pub fn is_visible_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.')
}
