//! Stateful inline widgets.

pub mod field;

pub use field::{FieldOption, FieldWidget, Transition, WidgetEffect};

/// Default emoji palette; the toolbar's emoji button inserts the first one
pub const EMOJIS: [&str; 17] = [
    "😃", "😬", "😂", "😅", "😆", "😍", "😱", "👋", "👏", "👍", "🙌", "👌", "🙏", "👻", "🍔", "🍑",
    "🔑",
];
