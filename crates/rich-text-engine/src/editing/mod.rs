/*!
 * # Editing Core Module
 *
 * Everything that turns one [`Value`] (a document plus the selection into it)
 * into the next.
 *
 * ## Architecture Overview
 *
 * ### 1. Values are replaced, never mutated
 * - A command takes the current value and returns a new one
 * - Unchanged subtrees are shared between the old and the new document
 * - A rejected command returns an error and the caller keeps the old value
 *
 * ### 2. Queries are recomputed
 * - Active marks, selected blocks and toolbar state are derived from the
 *   current value on every call; nothing is cached across edits
 *
 * ### 3. Widget state lives beside the document
 * - The [`Editor`] session keeps per-widget interaction state keyed by inline
 *   identity; the document only records what a widget committed
 *
 * ## Module Structure
 *
 * - **`value`**: the (document, selection) pair
 * - **`selection`**: `Point` and `Selection`
 * - **`query`**: read-only questions about a value
 * - **`commands`**: `Cmd` and the command implementations
 * - **`toolbar`**: button commands and active flags
 * - **`editor`**: the editing session and its field widgets
 * - **`patch`**: what `Editor::apply` reports
 *
 * ## Usage Pattern
 *
 * ```rust
 * use rich_text_engine::editing::*;
 * use rich_text_engine::model::{Block, Document, Mark};
 *
 * let value = Value::new(Document::new(vec![Block::paragraph("hello")]));
 * let mut editor = Editor::new(value);
 *
 * editor
 *     .apply(Cmd::Select(Selection::new(Point::new([0, 0], 0), Point::new([0, 0], 5))))
 *     .unwrap();
 * let patch = editor.apply(Cmd::ToggleMark(Mark::Bold)).unwrap();
 * assert!(patch.changed);
 * assert!(editor.value().has_mark(Mark::Bold));
 * ```
 */

pub mod commands;
pub mod editor;
pub mod patch;
pub mod query;
pub mod selection;
pub mod toolbar;
pub mod value;

pub use commands::{Cmd, MoveTarget, cursor_at};
pub use editor::Editor;
pub use patch::Patch;
pub use query::TextSpan;
pub use selection::{Point, Selection};
pub use toolbar::{BLOCK_BUTTONS, Button, ToolbarState};
pub use value::Value;
