use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use uuid::Uuid;

use crate::editing::{Point, Selection, Value};
use crate::error::EditError;
use crate::model::{Block, BlockType, Inline, InlineType, Mark, Node, Path, Text};

/// Where a move command puts the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// Offset zero of the first text after the selection's end
    StartOfNextText,
    /// Offset zero of the first text of the next leaf block
    StartOfNextBlock,
}

/// Edit commands. Every command maps one value to the next.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    ToggleMark(Mark),
    SetBlocks(BlockType),
    WrapBlock(BlockType),
    UnwrapBlock(BlockType),
    /// Toolbar block button: heading/quote toggles and list enter/switch/exit
    ToggleBlock(BlockType),
    /// Insert a void inline at the cursor, then move into the following text
    InsertInline {
        kind: InlineType,
        data: BTreeMap<String, String>,
    },
    /// Replace the attributes of the inline with `key`
    SetInlineData {
        key: Uuid,
        data: BTreeMap<String, String>,
    },
    Move(MoveTarget),
    Select(Selection),
    Focus,
    Blur,
}

impl Cmd {
    pub fn insert_emoji(code: impl Into<String>) -> Cmd {
        Cmd::InsertInline {
            kind: InlineType::Emoji,
            data: BTreeMap::from([("code".to_string(), code.into())]),
        }
    }

    pub fn insert_field() -> Cmd {
        Cmd::InsertInline {
            kind: InlineType::Field,
            data: BTreeMap::new(),
        }
    }
}

impl Value {
    /// Apply `cmd`, producing the next value. On `Err` the caller keeps
    /// `self`; there is never a partial result.
    pub fn apply(&self, cmd: &Cmd) -> Result<Value, EditError> {
        debug!("applying {cmd:?}");
        self.selection.validate(&self.document)?;
        match cmd {
            Cmd::ToggleMark(mark) => self.toggle_mark(*mark),
            Cmd::SetBlocks(kind) => self.set_blocks(*kind),
            Cmd::WrapBlock(kind) => self.wrap_block(*kind),
            Cmd::UnwrapBlock(kind) => self.unwrap_block(*kind),
            Cmd::ToggleBlock(kind) => self.toggle_block(*kind),
            Cmd::InsertInline { kind, data } => self.insert_inline(*kind, data.clone()),
            Cmd::SetInlineData { key, data } => self.set_inline_data(*key, data.clone()),
            Cmd::Move(target) => self.move_to(*target),
            Cmd::Select(selection) => {
                selection.validate(&self.document)?;
                Ok(self.with_selection(selection.clone()))
            }
            Cmd::Focus => Ok(self.with_selection(self.selection.clone().focused())),
            Cmd::Blur => Ok(self.with_selection(self.selection.clone().blurred())),
        }
    }

    /// Remove `mark` from every touched leaf if all of them carry it,
    /// otherwise add it to all of them. On a collapsed cursor the mark is
    /// toggled in the pending marks instead.
    pub fn toggle_mark(&self, mark: Mark) -> Result<Value, EditError> {
        self.selection.validate(&self.document)?;
        let add = !self.has_mark(mark);

        if self.selection.is_collapsed() {
            let mut pending = self.active_marks();
            if add {
                pending.insert(mark);
            } else {
                pending.remove(&mark);
            }
            let focus = &self.selection.focus;
            let at_cursor = self
                .document
                .text(&focus.path)
                .map(|text| text.marks_at(focus.offset))
                .unwrap_or_default();
            let mut selection = self.selection.clone();
            selection.marks = (pending != at_cursor).then_some(pending);
            return Ok(self.with_selection(selection));
        }

        let mut document = self.document.clone();
        for span in self.texts_in_range() {
            if span.range.is_empty() {
                continue;
            }
            let marked = span.text.with_mark(span.range, mark, add);
            document = document.replace_node(&span.path, Node::Text(marked))?;
        }
        Ok(Value {
            document,
            selection: self.selection.clone(),
        })
    }

    /// Retype every selected leaf block
    pub fn set_blocks(&self, kind: BlockType) -> Result<Value, EditError> {
        self.selection.validate(&self.document)?;
        let mut document = self.document.clone();
        for (path, block) in self.blocks_in_range() {
            document = document.replace_node(&path, Node::Block(block.with_kind(kind)))?;
        }
        Ok(Value {
            document,
            selection: self.selection.clone(),
        })
    }

    /// Wrap the selected blocks in a new `kind` container. Blocks wrapped
    /// into a list are retyped to list items first. A wrap that would leave
    /// the document malformed is a no-op.
    pub fn wrap_block(&self, kind: BlockType) -> Result<Value, EditError> {
        Ok(self.try_wrap_block(kind)?.unwrap_or_else(|| self.clone()))
    }

    /// `None` when the selected blocks cannot be wrapped in `kind`
    fn try_wrap_block(&self, kind: BlockType) -> Result<Option<Value>, EditError> {
        self.selection.validate(&self.document)?;
        let blocks = self.blocks_in_range();
        let (Some((first, _)), Some((last, _))) = (blocks.first(), blocks.last()) else {
            debug!("nothing selected to wrap in {kind}");
            return Ok(None);
        };

        let parent = if first == last {
            first.parent().unwrap_or_default()
        } else {
            first.common_ancestor(last)
        };
        if self
            .document
            .block(&parent)
            .is_some_and(|block| block.kind().is_list_container())
        {
            debug!("{parent} holds list items only, cannot wrap them in {kind}");
            return Ok(None);
        }

        let depth = parent.len();
        let (lo, hi) = (first.indices()[depth], last.indices()[depth]);
        let siblings = self
            .document
            .children(&parent)
            .ok_or_else(|| EditError::mismatch(&parent, "wrap parent vanished"))?;

        let mut document = self.document.clone();
        if kind.is_list_container() {
            let mut items = Vec::with_capacity(hi - lo + 1);
            for sibling in &siblings[lo..=hi] {
                match sibling.as_block() {
                    Some(block) if block.is_leaf() => {
                        items.push(Arc::new(Node::Block(block.with_kind(BlockType::ListItem))));
                    }
                    _ => {
                        debug!("selection spans nested containers, cannot wrap in {kind}");
                        return Ok(None);
                    }
                }
            }
            document = document.splice(&parent, lo..hi + 1, items)?;
        }
        let document = document.wrap_nodes(&parent, lo, hi, kind)?;
        let selection = self
            .selection
            .map_paths(|path| path.after_wrap(&parent, lo, hi));
        Ok(Some(Value {
            document,
            selection,
        }))
    }

    /// Like [`Value::unwrap_block`], but reports a missing container as
    /// [`EditError::NoMatchingAncestor`]
    pub fn try_unwrap_block(&self, kind: BlockType) -> Result<Value, EditError> {
        self.selection.validate(&self.document)?;
        let mut containers: Vec<Path> = self
            .blocks_in_range()
            .iter()
            .filter_map(|(path, _)| self.document.closest_of_type(path, kind))
            .map(|(path, _)| path)
            .collect();
        if containers.is_empty() {
            return Err(EditError::NoMatchingAncestor { kind });
        }
        containers.sort();
        containers.dedup();

        // Last container first so the paths of earlier ones stay put
        containers
            .iter()
            .rev()
            .try_fold(self.clone(), |value, container| {
                value.unwrap_container(container, kind)
            })
    }

    /// Lift the selected children of the `kind` container at
    /// `container_path` into its parent, splitting off the unselected head
    /// and tail as containers of their own.
    fn unwrap_container(
        &self,
        container_path: &Path,
        kind: BlockType,
    ) -> Result<Value, EditError> {
        let container = self
            .document
            .block(container_path)
            .ok_or_else(|| EditError::mismatch(container_path, "unwrap container vanished"))?;
        let depth = container_path.len();
        let selected: Vec<usize> = self
            .blocks_in_range()
            .iter()
            .filter(|(path, _)| {
                self.document
                    .closest_of_type(path, kind)
                    .is_some_and(|(closest, _)| closest == *container_path)
            })
            .map(|(path, _)| path.indices()[depth])
            .collect();
        let (Some(&lo), Some(&hi)) = (selected.iter().min(), selected.iter().max()) else {
            return Err(EditError::mismatch(container_path, "no selected block to unwrap"));
        };

        let children = container.nodes();
        let mut replacement = Vec::with_capacity(children.len() + 2);
        if lo > 0 {
            replacement.push(Arc::new(Node::Block(Block::from_shared(
                kind,
                children[..lo].to_vec(),
            ))));
        }
        replacement.extend(children[lo..=hi].iter().cloned());
        if hi + 1 < children.len() {
            replacement.push(Arc::new(Node::Block(Block::from_shared(
                kind,
                children[hi + 1..].to_vec(),
            ))));
        }

        let parent = container_path.parent().unwrap_or_default();
        let at = container_path.last().unwrap_or_default();
        let count = children.len();
        let document = self.document.splice(&parent, at..at + 1, replacement)?;
        let selection = self
            .selection
            .map_paths(|path| path.after_unwrap(container_path, lo, hi, count));
        Ok(Value {
            document,
            selection,
        })
    }

    /// Promote the selected blocks out of their nearest `kind` container.
    /// A missing container is a no-op.
    pub fn unwrap_block(&self, kind: BlockType) -> Result<Value, EditError> {
        match self.try_unwrap_block(kind) {
            Err(EditError::NoMatchingAncestor { kind }) => {
                debug!("no enclosing {kind}, nothing to unwrap");
                Ok(self.clone())
            }
            result => result,
        }
    }

    /// The toolbar's block button.
    ///
    /// For list containers: exit the list when already in a list of this
    /// type, switch list type when in the other one, otherwise enter a new
    /// list. Exiting attempts to unwrap both list types; the one that does
    /// not apply is a no-op.
    ///
    /// For other types: toggle between `kind` and the default block type,
    /// leaving any list the selection was in.
    pub fn toggle_block(&self, kind: BlockType) -> Result<Value, EditError> {
        self.selection.validate(&self.document)?;
        let is_list = self.has_block(BlockType::ListItem);

        if let Some(other) = kind.other_list() {
            return if is_list && self.in_list_of(kind) {
                self.set_blocks(BlockType::DEFAULT)?
                    .unwrap_block(BlockType::BulletedList)?
                    .unwrap_block(BlockType::NumberedList)
            } else {
                let staged = if is_list {
                    self.unwrap_block(other)?
                } else {
                    self.set_blocks(BlockType::ListItem)?
                };
                match staged.try_wrap_block(kind)? {
                    Some(next) => Ok(next),
                    None => {
                        debug!("cannot wrap the selection in {kind}, leaving it as is");
                        Ok(self.clone())
                    }
                }
            };
        }

        if kind == BlockType::ListItem {
            debug!("list items are toggled through their list containers");
            return Ok(self.clone());
        }

        let target = if self.has_block(kind) {
            BlockType::DEFAULT
        } else {
            kind
        };
        let next = self.set_blocks(target)?;
        if is_list {
            next.unwrap_block(BlockType::BulletedList)?
                .unwrap_block(BlockType::NumberedList)
        } else {
            Ok(next)
        }
    }

    /// Insert a void inline at the collapsed cursor, splitting the text
    /// around it, and leave a focused cursor at the start of the text after
    /// the inline.
    pub fn insert_inline(
        &self,
        kind: InlineType,
        data: BTreeMap<String, String>,
    ) -> Result<Value, EditError> {
        self.selection.validate(&self.document)?;
        if !self.selection.is_collapsed() {
            return Err(EditError::InvalidRangeOperation {
                operation: "insert_inline",
            });
        }

        let Point { path, offset } = &self.selection.focus;
        let text = self
            .document
            .text(path)
            .ok_or_else(|| EditError::mismatch(path, "cursor is not in a text"))?;
        let (parent, index) = match (path.parent(), path.last()) {
            (Some(parent), Some(index)) => (parent, index),
            _ => return Err(EditError::mismatch(path, "cursor text has no parent")),
        };
        let inline = Node::Inline(Inline::new(kind, data));

        let replacement: Vec<Node> = if *offset == 0 {
            vec![inline, Node::Text(text.clone())]
        } else if *offset < text.len() {
            let (left, right) = text.split_at(*offset);
            vec![Node::Text(left), inline, Node::Text(right)]
        } else {
            let followed_by_text = self
                .document
                .node(&parent.child(index + 1))
                .and_then(Node::as_text)
                .is_some();
            if followed_by_text {
                vec![Node::Text(text.clone()), inline]
            } else {
                vec![Node::Text(text.clone()), inline, Node::Text(Text::empty())]
            }
        };

        // The text right after the inline
        let cursor_index = if *offset == 0 { index + 1 } else { index + 2 };
        let document = self.document.splice(
            &parent,
            index..index + 1,
            replacement.into_iter().map(Arc::new).collect(),
        )?;
        let selection = self
            .selection
            .moved_to(Point::start_of(parent.child(cursor_index)))
            .focused();
        Ok(Value {
            document,
            selection,
        })
    }

    /// Replace the attributes of the inline identified by `key`
    pub fn set_inline_data(
        &self,
        key: Uuid,
        data: BTreeMap<String, String>,
    ) -> Result<Value, EditError> {
        let (path, inline) = self
            .document
            .descendants()
            .find_map(|(path, node)| {
                node.as_inline()
                    .filter(|inline| inline.key() == key)
                    .map(|inline| (path, inline))
            })
            .ok_or(EditError::UnknownInline { key })?;
        let document = self
            .document
            .replace_node(&path, Node::Inline(inline.with_data(data)))?;
        Ok(Value {
            document,
            selection: self.selection.clone(),
        })
    }

    /// Reposition the cursor without touching the document. Moving past the
    /// last text leaves the selection where it is.
    pub fn move_to(&self, target: MoveTarget) -> Result<Value, EditError> {
        self.selection.validate(&self.document)?;
        let end = self.selection.end();
        let destination = match target {
            MoveTarget::StartOfNextText => self.document.next_text(&end.path).map(|(path, _)| path),
            MoveTarget::StartOfNextBlock => {
                let current = end.path.parent();
                self.document
                    .texts()
                    .find(|(path, _)| *path > end.path && path.parent() != current)
                    .map(|(path, _)| path)
            }
        };

        match destination {
            Some(path) => Ok(self.with_selection(self.selection.moved_to(Point::start_of(path)))),
            None => {
                debug!("no text after {} for {target:?}", end.path);
                Ok(self.clone())
            }
        }
    }
}

/// Convenience for tests and adapters holding a bare path
pub fn cursor_at(path: impl Into<Path>, offset: usize) -> Selection {
    Selection::collapsed(Point::new(path, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, Leaf, MarkSet, format_outline, invariants};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn paragraphs(texts: &[&str]) -> Document {
        Document::new(texts.iter().map(|t| Block::paragraph(*t)).collect())
    }

    fn at(doc: Document, path: impl Into<Path>, offset: usize) -> Value {
        Value::new(doc).with_selection(cursor_at(path, offset))
    }

    fn range(doc: Document, anchor: Point, focus: Point) -> Value {
        Value::new(doc).with_selection(Selection::new(anchor, focus))
    }

    fn list(kind: BlockType, items: &[&str]) -> Block {
        Block::new(
            kind,
            items
                .iter()
                .map(|t| Block::new(BlockType::ListItem, vec![Text::plain(*t).into()]).into())
                .collect(),
        )
    }

    #[rstest]
    #[case(Mark::Bold)]
    #[case(Mark::Italic)]
    #[case(Mark::Underlined)]
    #[case(Mark::Code)]
    fn toggle_mark_twice_restores_range(#[case] mark: Mark) {
        let start = range(
            paragraphs(&["hello", "world"]),
            Point::new([0, 0], 1),
            Point::new([1, 0], 3),
        );
        let once = start.toggle_mark(mark).unwrap();
        assert!(once.has_mark(mark));
        assert_eq!(once.selection, start.selection);
        assert_eq!(once.toggle_mark(mark).unwrap(), start);
    }

    #[test]
    fn toggle_mark_marks_only_the_selected_chars() {
        let start = range(paragraphs(&["hello"]), Point::new([0, 0], 1), Point::new([0, 0], 3));
        let marked = start.toggle_mark(Mark::Bold).unwrap();
        let bold: MarkSet = [Mark::Bold].into_iter().collect();
        assert_eq!(
            marked.document.text(&[0, 0].into()).unwrap().leaves(),
            &[Leaf::plain("h"), Leaf::new("el", bold), Leaf::plain("lo")]
        );
    }

    #[test]
    fn toggle_mark_on_mixed_range_marks_everything_first() {
        let start = range(paragraphs(&["hello"]), Point::new([0, 0], 0), Point::new([0, 0], 5));
        let partly = start
            .with_selection(Selection::new(Point::new([0, 0], 0), Point::new([0, 0], 2)))
            .toggle_mark(Mark::Italic)
            .unwrap()
            .with_selection(start.selection.clone());
        assert!(!partly.has_mark(Mark::Italic));

        let all = partly.toggle_mark(Mark::Italic).unwrap();
        assert!(all.has_mark(Mark::Italic));
        assert_eq!(all.toggle_mark(Mark::Italic).unwrap(), start);
    }

    #[test]
    fn toggle_mark_on_cursor_queues_pending_marks() {
        let start = at(paragraphs(&["hello"]), [0, 0], 2);
        let once = start.toggle_mark(Mark::Code).unwrap();
        assert_eq!(once.document, start.document);
        assert!(once.has_mark(Mark::Code));
        assert_eq!(once.toggle_mark(Mark::Code).unwrap(), start);
    }

    #[test]
    fn set_blocks_retypes_every_selected_block() {
        let start = range(
            paragraphs(&["a", "b", "c"]),
            Point::new([0, 0], 0),
            Point::new([1, 0], 1),
        );
        let next = start.set_blocks(BlockType::HeadingTwo).unwrap();
        assert_eq!(
            format_outline(&next.document),
            "heading-two\n  text \"a\"\nheading-two\n  text \"b\"\nparagraph\n  text \"c\"\n"
        );
        assert_eq!(next.selection, start.selection);
    }

    #[rstest]
    #[case(BlockType::HeadingOne)]
    #[case(BlockType::HeadingTwo)]
    #[case(BlockType::BlockQuote)]
    fn toggle_block_twice_returns_to_paragraph(#[case] kind: BlockType) {
        let start = at(paragraphs(&["text"]), [0, 0], 1);
        let once = start.toggle_block(kind).unwrap();
        assert!(once.has_block(kind));
        assert_eq!(once.toggle_block(kind).unwrap(), start);
    }

    #[test]
    fn toggle_block_switches_between_non_default_types() {
        let start = at(paragraphs(&["text"]), [0, 0], 0);
        let next = start
            .toggle_block(BlockType::HeadingOne)
            .unwrap()
            .toggle_block(BlockType::BlockQuote)
            .unwrap();
        assert!(next.has_block(BlockType::BlockQuote));
        assert!(!next.has_block(BlockType::HeadingOne));
    }

    #[test]
    fn entering_and_leaving_a_list_round_trips() {
        let start = at(paragraphs(&["before", "item", "after"]), [1, 0], 2);

        let entered = start.toggle_block(BlockType::BulletedList).unwrap();
        insta::assert_snapshot!(format_outline(&entered.document), @r#"
        paragraph
          text "before"
        bulleted-list
          list-item
            text "item"
        paragraph
          text "after"
        "#);
        assert_eq!(entered.selection, cursor_at([1, 0, 0], 2));
        assert!(invariants::check(&entered.document).is_ok());

        let left = entered.toggle_block(BlockType::BulletedList).unwrap();
        assert_eq!(left, start);
    }

    #[test]
    fn switching_list_type_rewraps_items() {
        let doc = Document::new(vec![list(BlockType::BulletedList, &["one", "two"])]);
        let start = range(doc, Point::new([0, 0, 0], 0), Point::new([0, 1, 0], 3));

        let switched = start.toggle_block(BlockType::NumberedList).unwrap();
        insta::assert_snapshot!(format_outline(&switched.document), @r#"
        numbered-list
          list-item
            text "one"
          list-item
            text "two"
        "#);
        assert!(switched.in_list_of(BlockType::NumberedList));
        assert!(!switched.in_list_of(BlockType::BulletedList));
        assert_eq!(switched.selection, start.selection);
    }

    #[test]
    fn leaving_a_list_from_the_middle_keeps_the_rest_listed() {
        let doc = Document::new(vec![list(BlockType::NumberedList, &["a", "b", "c"])]);
        let start = at(doc, [0, 1, 0], 0);

        let left = start.toggle_block(BlockType::NumberedList).unwrap();
        insta::assert_snapshot!(format_outline(&left.document), @r#"
        numbered-list
          list-item
            text "a"
        paragraph
          text "b"
        numbered-list
          list-item
            text "c"
        "#);
        assert_eq!(left.selection, cursor_at([1, 0], 0));
        assert!(invariants::check(&left.document).is_ok());
    }

    #[test]
    fn heading_toggle_inside_list_leaves_the_list() {
        let doc = Document::new(vec![list(BlockType::BulletedList, &["a"])]);
        let start = at(doc, [0, 0, 0], 1);
        let next = start.toggle_block(BlockType::HeadingOne).unwrap();
        assert_eq!(format_outline(&next.document), "heading-one\n  text \"a\"\n");
        assert_eq!(next.selection, cursor_at([0, 0], 1));
    }

    #[test]
    fn unwrap_without_matching_ancestor_is_a_no_op() {
        let start = at(paragraphs(&["a"]), [0, 0], 0);
        assert_eq!(start.unwrap_block(BlockType::BulletedList), Ok(start.clone()));
        assert_eq!(
            start.try_unwrap_block(BlockType::BulletedList),
            Err(EditError::NoMatchingAncestor {
                kind: BlockType::BulletedList
            })
        );
    }

    #[test]
    fn wrap_block_coerces_blocks_into_list_items() {
        let start = range(
            paragraphs(&["a", "b"]),
            Point::new([0, 0], 0),
            Point::new([1, 0], 0),
        );
        let wrapped = start.wrap_block(BlockType::NumberedList).unwrap();
        assert!(invariants::check(&wrapped.document).is_ok());
        assert_eq!(
            wrapped.selection,
            Selection::new(Point::new([0, 0, 0], 0), Point::new([0, 1, 0], 0))
        );
    }

    #[test]
    fn wrap_block_in_quote_keeps_block_types() {
        let start = at(paragraphs(&["a", "b"]), [1, 0], 0);
        let wrapped = start.wrap_block(BlockType::BlockQuote).unwrap();
        assert_eq!(
            format_outline(&wrapped.document),
            "paragraph\n  text \"a\"\nblock-quote\n  paragraph\n    text \"b\"\n"
        );
    }

    #[test]
    fn wrap_across_nested_containers_is_a_no_op() {
        let doc = Document::new(vec![
            Block::paragraph("a"),
            Block::new(BlockType::BlockQuote, vec![Block::paragraph("b").into()]),
        ]);
        let start = range(doc, Point::new([0, 0], 0), Point::new([1, 0, 0], 1));
        assert_eq!(start.wrap_block(BlockType::BulletedList), Ok(start.clone()));
    }

    #[test]
    fn heading_toggle_across_a_paragraph_and_a_list_leaves_the_list() {
        let doc = Document::new(vec![Block::paragraph("a"), list(BlockType::BulletedList, &["b"])]);
        let start = range(doc, Point::new([0, 0], 0), Point::new([1, 0, 0], 1));

        let next = start.toggle_block(BlockType::HeadingOne).unwrap();
        insta::assert_snapshot!(format_outline(&next.document), @r#"
        heading-one
          text "a"
        heading-one
          text "b"
        "#);
        assert_eq!(
            next.selection,
            Selection::new(Point::new([0, 0], 0), Point::new([1, 0], 1))
        );
    }

    #[test]
    fn leaving_lists_of_both_types_unwraps_each_one() {
        let doc = Document::new(vec![
            list(BlockType::BulletedList, &["a"]),
            list(BlockType::NumberedList, &["b"]),
        ]);
        let start = range(doc, Point::new([0, 0, 0], 0), Point::new([1, 0, 0], 1));

        let left = start.toggle_block(BlockType::BulletedList).unwrap();
        assert_eq!(format_outline(&left.document), format_outline(&paragraphs(&["a", "b"])));
        assert_eq!(
            left.selection,
            Selection::new(Point::new([0, 0], 0), Point::new([1, 0], 1))
        );
    }

    #[test]
    fn leaving_a_list_across_two_lists_splits_both() {
        let doc = Document::new(vec![
            list(BlockType::BulletedList, &["a", "b"]),
            list(BlockType::BulletedList, &["c", "d"]),
        ]);
        let start = range(doc, Point::new([0, 1, 0], 0), Point::new([1, 0, 0], 1));

        let left = start.toggle_block(BlockType::BulletedList).unwrap();
        insta::assert_snapshot!(format_outline(&left.document), @r#"
        bulleted-list
          list-item
            text "a"
        paragraph
          text "b"
        paragraph
          text "c"
        bulleted-list
          list-item
            text "d"
        "#);
        assert_eq!(
            left.selection,
            Selection::new(Point::new([1, 0], 0), Point::new([2, 0], 1))
        );
        assert!(invariants::check(&left.document).is_ok());
    }

    #[test]
    fn refused_list_wrap_returns_the_original_value() {
        let doc = Document::new(vec![
            Block::paragraph("a"),
            Block::new(BlockType::BlockQuote, vec![Block::paragraph("b").into()]),
        ]);
        let start = range(doc, Point::new([0, 0], 0), Point::new([1, 0, 0], 1));
        assert_eq!(start.toggle_block(BlockType::BulletedList), Ok(start.clone()));
    }

    #[rstest]
    #[case(BlockType::BlockQuote)]
    #[case(BlockType::BulletedList)]
    #[case(BlockType::NumberedList)]
    fn wrap_inside_a_list_is_a_no_op(#[case] kind: BlockType) {
        let doc = Document::new(vec![list(BlockType::BulletedList, &["a"])]);
        let start = at(doc, [0, 0, 0], 0);
        assert_eq!(start.wrap_block(kind), Ok(start.clone()));
    }

    #[test]
    fn insert_inline_mid_text_splits_and_moves_into_the_tail() {
        let start = at(paragraphs(&["abcd"]), [0, 0], 2);
        let next = start.apply(&Cmd::insert_emoji("😃")).unwrap();
        insta::assert_snapshot!(format_outline(&next.document), @r#"
        paragraph
          text "ab"
          emoji code="😃"
          text "cd"
        "#);
        assert_eq!(next.selection, cursor_at([0, 2], 0).focused());
    }

    #[test]
    fn insert_inline_at_end_creates_trailing_text() {
        let start = at(paragraphs(&["ab"]), [0, 0], 2);
        let next = start.apply(&Cmd::insert_field()).unwrap();
        insta::assert_snapshot!(format_outline(&next.document), @r#"
        paragraph
          text "ab"
          field
          text ""
        "#);
        assert_eq!(next.selection, cursor_at([0, 2], 0).focused());
    }

    #[test]
    fn insert_inline_at_start_lands_before_the_text() {
        let start = at(paragraphs(&["ab"]), [0, 0], 0);
        let next = start.apply(&Cmd::insert_emoji("👋")).unwrap();
        let kinds: Vec<bool> = next.document.nodes()[0]
            .nodes()
            .iter()
            .map(|n| n.as_inline().is_some())
            .collect();
        assert_eq!(kinds, vec![true, false]);
        assert_eq!(next.selection, cursor_at([0, 1], 0).focused());
    }

    #[test]
    fn insert_inline_before_another_inline_keeps_a_text_between() {
        let start = at(paragraphs(&["ab"]), [0, 0], 1)
            .apply(&Cmd::insert_emoji("👋"))
            .unwrap()
            .with_selection(cursor_at([0, 0], 1));
        let next = start.apply(&Cmd::insert_emoji("🔑")).unwrap();
        insta::assert_snapshot!(format_outline(&next.document), @r#"
        paragraph
          text "a"
          emoji code="🔑"
          text ""
          emoji code="👋"
          text "b"
        "#);
        assert_eq!(next.selection, cursor_at([0, 2], 0).focused());
    }

    #[test]
    fn insert_inline_at_end_reuses_an_adjacent_text() {
        let doc = Document::new(vec![Block::new(
            BlockType::Paragraph,
            vec![Text::plain("a").into(), Text::plain("b").into()],
        )]);
        let next = at(doc, [0, 0], 1).apply(&Cmd::insert_field()).unwrap();
        assert_eq!(next.document.nodes()[0].nodes().len(), 3);
        assert_eq!(next.selection, cursor_at([0, 2], 0).focused());
        assert_eq!(next.document.text(&[0, 2].into()).map(Text::content), Some("b".into()));
    }

    #[test]
    fn insert_inline_rejects_ranges() {
        let start = range(paragraphs(&["abcd"]), Point::new([0, 0], 1), Point::new([0, 0], 3));
        assert_eq!(
            start.apply(&Cmd::insert_field()),
            Err(EditError::InvalidRangeOperation {
                operation: "insert_inline"
            })
        );
    }

    #[test]
    fn set_inline_data_finds_inline_by_key() {
        let start = at(paragraphs(&["ab"]), [0, 0], 1)
            .apply(&Cmd::insert_field())
            .unwrap();
        let key = start.document.nodes()[0].nodes()[1]
            .as_inline()
            .map(Inline::key)
            .unwrap();
        let data = BTreeMap::from([("value".to_string(), "field2".to_string())]);
        let next = start
            .apply(&Cmd::SetInlineData {
                key,
                data: data.clone(),
            })
            .unwrap();
        let inline = next.document.nodes()[0].nodes()[1].as_inline().unwrap();
        assert_eq!(inline.get("value"), Some("field2"));
        assert_eq!(inline.key(), key);

        let unknown = Uuid::new_v4();
        assert_eq!(
            start.apply(&Cmd::SetInlineData { key: unknown, data }),
            Err(EditError::UnknownInline { key: unknown })
        );
    }

    #[test]
    fn moves_to_next_text_and_next_block() {
        let doc = Document::new(vec![
            Block::new(
                BlockType::Paragraph,
                vec![
                    Text::plain("a").into(),
                    Inline::field().into(),
                    Text::plain("b").into(),
                ],
            ),
            Block::paragraph("c"),
        ]);
        let start = at(doc, [0, 0], 1);

        let next_text = start.move_to(MoveTarget::StartOfNextText).unwrap();
        assert_eq!(next_text.selection, cursor_at([0, 2], 0));
        assert_eq!(next_text.document, start.document);

        let next_block = start.move_to(MoveTarget::StartOfNextBlock).unwrap();
        assert_eq!(next_block.selection, cursor_at([1, 0], 0));

        let stuck = next_block.move_to(MoveTarget::StartOfNextBlock).unwrap();
        assert_eq!(stuck, next_block);
    }

    #[test]
    fn focus_and_blur_only_touch_the_flag() {
        let start = at(paragraphs(&["a"]), [0, 0], 0);
        let focused = start.apply(&Cmd::Focus).unwrap();
        assert!(focused.selection.is_focused);
        assert_eq!(focused.apply(&Cmd::Blur).unwrap(), start);
    }

    #[rstest]
    #[case(Cmd::ToggleMark(Mark::Bold))]
    #[case(Cmd::SetBlocks(BlockType::HeadingOne))]
    #[case(Cmd::WrapBlock(BlockType::BlockQuote))]
    #[case(Cmd::UnwrapBlock(BlockType::BulletedList))]
    #[case(Cmd::ToggleBlock(BlockType::NumberedList))]
    #[case(Cmd::insert_emoji("😃"))]
    #[case(Cmd::Move(MoveTarget::StartOfNextBlock))]
    #[case(Cmd::Focus)]
    fn stale_selection_is_rejected(#[case] cmd: Cmd) {
        let stale = at(paragraphs(&["a"]), [3, 0], 0);
        assert!(matches!(
            stale.apply(&cmd),
            Err(EditError::StructuralMismatch { .. })
        ));
    }

    #[test]
    fn select_validates_the_new_selection() {
        let start = at(paragraphs(&["abc"]), [0, 0], 0);
        let moved = start.apply(&Cmd::Select(cursor_at([0, 0], 3))).unwrap();
        assert_eq!(moved.selection, cursor_at([0, 0], 3));
        assert!(start.apply(&Cmd::Select(cursor_at([0, 0], 4))).is_err());
    }
}
