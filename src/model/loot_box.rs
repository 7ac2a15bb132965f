use super::BoxStatus;
use std::fmt;
use std::path::{Path, PathBuf};

/// Один бокс: имя файла в директории конфигурации и его скрипт
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootBox {
    name: String,
    path: PathBuf,
    pub status: BoxStatus,
}

impl LootBox {
    /// Новый бокс всегда начинает с `Error` до первого опроса
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            status: BoxStatus::Error,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn view(&self) -> BoxView {
        BoxView {
            name: self.name.clone(),
            status: self.status,
        }
    }
}

impl fmt::Display for LootBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" ({})", self.name, self.status)
    }
}

/// То, что видит индикатор: имя и текущее состояние
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxView {
    pub name: String,
    pub status: BoxStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_box_starts_in_error() {
        let lb = LootBox::new("vault", "/home/user/.config/loot/vault");
        assert_eq!(lb.status, BoxStatus::Error);
        assert_eq!(lb.name(), "vault");
        assert_eq!(lb.path(), Path::new("/home/user/.config/loot/vault"));
        assert_eq!(lb.to_string(), "\"vault\" (error)");
    }

    #[test]
    fn test_view_reflects_status() {
        let mut lb = LootBox::new("vpn", "/tmp/vpn");
        lb.status = BoxStatus::Opened;
        assert_eq!(
            lb.view(),
            BoxView {
                name: "vpn".to_string(),
                status: BoxStatus::Opened
            }
        );
    }
}
