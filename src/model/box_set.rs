use super::{combined_status, BoxStatus, BoxView, LootBox};

/// Упорядоченный по имени набор боксов.
///
/// Набор не редактируется по месту: при перезагрузке строится новый и
/// заменяет старый целиком.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxSet {
    boxes: Vec<LootBox>,
}

impl BoxSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Сортирует по имени (побайтово) и отбрасывает повторяющиеся имена
    pub fn from_boxes(mut boxes: Vec<LootBox>) -> Self {
        boxes.sort_by(|a, b| a.name().as_bytes().cmp(b.name().as_bytes()));
        boxes.dedup_by(|a, b| a.name() == b.name());
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LootBox> {
        self.boxes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LootBox> {
        self.boxes.iter_mut()
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LootBox> {
        self.boxes
            .binary_search_by(|b| b.name().as_bytes().cmp(name.as_bytes()))
            .ok()
            .map(|idx| &mut self.boxes[idx])
    }

    pub fn names(&self) -> Vec<&str> {
        self.boxes.iter().map(LootBox::name).collect()
    }

    pub fn views(&self) -> Vec<BoxView> {
        self.boxes.iter().map(LootBox::view).collect()
    }

    /// Всегда пересчитывается из текущего набора, не кэшируется
    pub fn combined_status(&self) -> BoxStatus {
        combined_status(self.boxes.iter().map(|b| b.status))
    }
}
