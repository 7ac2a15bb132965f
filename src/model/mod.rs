pub mod box_set;
pub mod loot_box;
pub mod status;

pub use box_set::BoxSet;
pub use loot_box::{BoxView, LootBox};
pub use status::{combined_status, BoxStatus};
