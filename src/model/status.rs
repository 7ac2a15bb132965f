use std::fmt;

/// Состояние бокса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxStatus {
    Closed,
    Opened,
    /// Неизвестное состояние или сбой скрипта
    Error,
}

impl BoxStatus {
    /// Разбор вывода `status`: первое слово до пробельного символа
    /// (включая вертикальную табуляцию), регистр учитывается.
    /// Всё прочее, включая пустой вывод, это `Error`.
    pub fn from_status_output(output: &[u8]) -> Self {
        let token = output
            .split(|b| b.is_ascii_whitespace() || *b == 0x0b)
            .next()
            .unwrap_or_default();

        match token {
            b"opened" => BoxStatus::Opened,
            b"closed" => BoxStatus::Closed,
            _ => BoxStatus::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoxStatus::Closed => "closed",
            BoxStatus::Opened => "opened",
            BoxStatus::Error => "error",
        }
    }
}

impl fmt::Display for BoxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Общее состояние набора: `Error`, если хоть один бокс в ошибке,
/// иначе `Opened`, если хоть один открыт, иначе `Closed`.
pub fn combined_status<I>(statuses: I) -> BoxStatus
where
    I: IntoIterator<Item = BoxStatus>,
{
    let mut num_opened = 0usize;
    let mut num_error = 0usize;

    for status in statuses {
        match status {
            BoxStatus::Opened => num_opened += 1,
            BoxStatus::Error => num_error += 1,
            BoxStatus::Closed => {}
        }
    }

    if num_error > 0 {
        BoxStatus::Error
    } else if num_opened > 0 {
        BoxStatus::Opened
    } else {
        BoxStatus::Closed
    }
}
