use std::fmt;
use std::str::FromStr;

/// Единица работы для основного цикла. Все источники (консоль, отслеживание
/// директории, сигналы) присылают команды в одну очередь.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppCommand {
    Reload,
    DirectoryChanged,
    Activate(String),
    Refresh(String),
    List,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError(pub String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "неизвестная команда: {:?}", self.0)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for AppCommand {
    type Err = ParseCommandError;

    /// Строка консоли: `list`, `reload`, `quit`, `toggle NAME`, `refresh NAME`.
    /// Имя берётся целиком до конца строки, в нём могут быть пробелы.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match (verb, rest.is_empty()) {
            ("list" | "ls", true) => Ok(AppCommand::List),
            ("reload", true) => Ok(AppCommand::Reload),
            ("quit" | "exit", true) => Ok(AppCommand::Quit),
            ("toggle" | "activate", false) => Ok(AppCommand::Activate(rest.to_string())),
            ("refresh", false) => Ok(AppCommand::Refresh(rest.to_string())),
            _ => Err(ParseCommandError(line.to_string())),
        }
    }
}

impl fmt::Display for AppCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppCommand::Reload => f.write_str("reload"),
            AppCommand::DirectoryChanged => f.write_str("directory-changed"),
            AppCommand::Activate(name) => write!(f, "toggle {}", name),
            AppCommand::Refresh(name) => write!(f, "refresh {}", name),
            AppCommand::List => f.write_str("list"),
            AppCommand::Quit => f.write_str("quit"),
        }
    }
}
