//! Immutable document model: a tree of blocks, void inlines and marked text.

pub mod document;
pub mod invariants;
pub mod mark;
pub mod node;
pub mod outline;
pub mod path;

pub use document::{Descendants, Document};
pub use invariants::InvariantViolation;
pub use mark::{Mark, MarkSet, UnknownMark};
pub use node::{
    Block, BlockType, Inline, InlineType, Leaf, Node, Text, UnknownBlockType, UnknownInlineType,
};
pub use outline::format_outline;
pub use path::{InvalidPath, Path};
