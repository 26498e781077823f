pub mod editing;
pub mod error;
pub mod io;
pub mod keymap;
pub mod model;
pub mod widgets;

// Re-export key types for easier usage
pub use editing::{Button, Cmd, Editor, MoveTarget, Patch, Point, Selection, ToolbarState, Value};
pub use error::EditError;
pub use io::*;
pub use keymap::Hotkey;
pub use model::{Block, BlockType, Document, Inline, InlineType, Mark, MarkSet, Node, Path, Text};
