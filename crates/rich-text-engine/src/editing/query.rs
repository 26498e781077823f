//! Read-only questions about a value.
//!
//! Nothing here is cached: toolbar state and the like are recomputed from the
//! current value every time they are observed.

use std::ops::Range;

use crate::editing::Value;
use crate::model::{Block, BlockType, Mark, MarkSet, Path, Text};

/// The part of one text node covered by the selection
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan<'a> {
    pub path: Path,
    pub text: &'a Text,
    pub range: Range<usize>,
}

impl Value {
    /// Texts touched by the selection, in document order, each with the char
    /// range the selection covers
    pub fn texts_in_range(&self) -> Vec<TextSpan<'_>> {
        let start = self.selection.start();
        let end = self.selection.end();
        self.document
            .texts()
            .filter(|(path, _)| *path >= start.path && *path <= end.path)
            .map(|(path, text)| {
                let from = if path == start.path { start.offset } else { 0 };
                let to = if path == end.path { end.offset } else { text.len() };
                let range = from.min(text.len())..to.min(text.len());
                TextSpan { path, text, range }
            })
            .collect()
    }

    /// Marks present on every leaf the selection touches. A collapsed cursor
    /// reports its pending marks, or else the marks at the cursor.
    pub fn active_marks(&self) -> MarkSet {
        let selection = &self.selection;
        if selection.is_collapsed() {
            if let Some(marks) = &selection.marks {
                return marks.clone();
            }
            return self
                .document
                .text(&selection.focus.path)
                .map(|text| text.marks_at(selection.focus.offset))
                .unwrap_or_default();
        }

        self.texts_in_range()
            .into_iter()
            .filter_map(|span| span.text.marks_in(span.range))
            .reduce(|shared, marks| shared.intersection(&marks).copied().collect())
            .unwrap_or_default()
    }

    pub fn has_mark(&self, mark: Mark) -> bool {
        self.active_marks().contains(&mark)
    }

    /// Leaf blocks holding the selected texts, in document order
    pub fn blocks_in_range(&self) -> Vec<(Path, &Block)> {
        let mut blocks: Vec<(Path, &Block)> = Vec::new();
        for span in self.texts_in_range() {
            let Some(parent) = span.path.parent() else {
                continue;
            };
            if blocks.last().is_some_and(|(path, _)| *path == parent) {
                continue;
            }
            if let Some(block) = self.document.block(&parent) {
                blocks.push((parent, block));
            }
        }
        blocks
    }

    pub fn has_block(&self, kind: BlockType) -> bool {
        self.blocks_in_range()
            .iter()
            .any(|(_, block)| block.kind() == kind)
    }

    /// Nearest enclosing list container of `container` type around the block
    /// at `block_path`
    pub fn list_container_of(
        &self,
        block_path: &Path,
        container: BlockType,
    ) -> Option<(Path, &Block)> {
        self.document.closest_of_type(block_path, container)
    }

    /// Whether the first selected block sits inside a `container` list
    pub fn in_list_of(&self, container: BlockType) -> bool {
        self.blocks_in_range()
            .first()
            .is_some_and(|(path, _)| self.list_container_of(path, container).is_some())
    }
}
