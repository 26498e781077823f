use crate::editing::{Cmd, Value};
use crate::model::{BlockType, Mark};

/// Block buttons in toolbar order
pub const BLOCK_BUTTONS: [BlockType; 5] = [
    BlockType::HeadingOne,
    BlockType::HeadingTwo,
    BlockType::BlockQuote,
    BlockType::NumberedList,
    BlockType::BulletedList,
];

/// A toolbar button and the command it issues
#[derive(Debug, Clone, PartialEq)]
pub enum Button {
    Mark(Mark),
    Block(BlockType),
    Emoji(String),
}

impl Button {
    pub fn command(&self) -> Cmd {
        match self {
            Button::Mark(mark) => Cmd::ToggleMark(*mark),
            Button::Block(kind) => Cmd::ToggleBlock(*kind),
            Button::Emoji(code) => Cmd::insert_emoji(code.clone()),
        }
    }
}

/// Active flags for every mark and block button, derived from one value
#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarState {
    pub marks: Vec<(Mark, bool)>,
    pub blocks: Vec<(BlockType, bool)>,
}

impl ToolbarState {
    pub fn compute(value: &Value) -> Self {
        let active = value.active_marks();
        Self {
            marks: Mark::ALL
                .into_iter()
                .map(|mark| (mark, active.contains(&mark)))
                .collect(),
            blocks: BLOCK_BUTTONS
                .into_iter()
                .map(|kind| (kind, value.is_block_button_active(kind)))
                .collect(),
        }
    }

    pub fn is_active(&self, button: &Button) -> bool {
        match button {
            Button::Mark(mark) => self.marks.iter().any(|(m, on)| m == mark && *on),
            Button::Block(kind) => self.blocks.iter().any(|(k, on)| k == kind && *on),
            Button::Emoji(_) => false,
        }
    }
}

impl Value {
    /// A list button is lit when the first selected block is a list item
    /// whose parent is a list of that type; other block buttons are lit when
    /// any selected block has the type.
    pub fn is_block_button_active(&self, kind: BlockType) -> bool {
        if !kind.is_list_container() {
            return self.has_block(kind);
        }
        let parent_kind = self
            .blocks_in_range()
            .first()
            .and_then(|(path, _)| path.parent())
            .and_then(|parent| self.document.block(&parent))
            .map(|block| block.kind());
        self.has_block(BlockType::ListItem) && parent_kind == Some(kind)
    }
}
