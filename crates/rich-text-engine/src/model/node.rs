use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Mark, MarkSet};

/// Block type identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Paragraph,
    HeadingOne,
    HeadingTwo,
    BlockQuote,
    NumberedList,
    BulletedList,
    ListItem,
}

impl BlockType {
    /// The type blocks revert to when a toggle is switched off
    pub const DEFAULT: BlockType = BlockType::Paragraph;

    pub const ALL: [BlockType; 7] = [
        BlockType::Paragraph,
        BlockType::HeadingOne,
        BlockType::HeadingTwo,
        BlockType::BlockQuote,
        BlockType::NumberedList,
        BlockType::BulletedList,
        BlockType::ListItem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::HeadingOne => "heading-one",
            BlockType::HeadingTwo => "heading-two",
            BlockType::BlockQuote => "block-quote",
            BlockType::NumberedList => "numbered-list",
            BlockType::BulletedList => "bulleted-list",
            BlockType::ListItem => "list-item",
        }
    }

    /// Containers whose direct children must all be list items
    pub fn is_list_container(&self) -> bool {
        matches!(self, BlockType::NumberedList | BlockType::BulletedList)
    }

    /// The other list container type, for list containers only
    pub fn other_list(&self) -> Option<BlockType> {
        match self {
            BlockType::NumberedList => Some(BlockType::BulletedList),
            BlockType::BulletedList => Some(BlockType::NumberedList),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

impl FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

/// Inline type identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InlineType {
    /// `{code}` holds the glyph to display
    Emoji,
    /// `{value}` holds the bound field name, once one has been chosen
    Field,
}

impl InlineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InlineType::Emoji => "emoji",
            InlineType::Field => "field",
        }
    }

    /// Void inlines contain no editable text
    pub fn is_void(&self) -> bool {
        match self {
            InlineType::Emoji | InlineType::Field => true,
        }
    }
}

impl fmt::Display for InlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown inline type: {0}")]
pub struct UnknownInlineType(pub String);

impl FromStr for InlineType {
    type Err = UnknownInlineType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emoji" => Ok(InlineType::Emoji),
            "field" => Ok(InlineType::Field),
            other => Err(UnknownInlineType(other.to_string())),
        }
    }
}

/// A run of text sharing one set of marks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LeafRepr", into = "LeafRepr")]
pub struct Leaf {
    text: String,
    marks: MarkSet,
}

impl Leaf {
    pub fn new(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, MarkSet::new())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn marks(&self) -> &MarkSet {
        &self.marks
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A text node: an ordered sequence of leaves.
///
/// Texts are always normalised: adjacent leaves with equal marks are merged,
/// empty leaves are dropped, and at least one leaf remains. Offsets are char
/// offsets into the concatenated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TextRepr", into = "TextRepr")]
pub struct Text {
    leaves: Vec<Leaf>,
}

impl Text {
    pub fn new(leaves: Vec<Leaf>) -> Self {
        Self {
            leaves: normalize_leaves(leaves),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Leaf::plain(text)])
    }

    pub fn empty() -> Self {
        Self::plain("")
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn content(&self) -> String {
        self.leaves.iter().map(|leaf| leaf.text()).collect()
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.leaves.iter().map(Leaf::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.iter().all(Leaf::is_empty)
    }

    /// Marks a cursor at `offset` picks up: those of the char before it, or
    /// of the first leaf when the cursor is at the start.
    pub fn marks_at(&self, offset: usize) -> MarkSet {
        if offset == 0 {
            return self
                .leaves
                .first()
                .map(|leaf| leaf.marks.clone())
                .unwrap_or_default();
        }
        let mut start = 0;
        for leaf in &self.leaves {
            let end = start + leaf.len();
            if offset <= end {
                return leaf.marks.clone();
            }
            start = end;
        }
        self.leaves
            .last()
            .map(|leaf| leaf.marks.clone())
            .unwrap_or_default()
    }

    /// Marks shared by every leaf overlapping `range`, or `None` when the
    /// range covers no chars.
    pub fn marks_in(&self, range: Range<usize>) -> Option<MarkSet> {
        if range.is_empty() {
            return None;
        }
        let mut shared: Option<MarkSet> = None;
        let mut start = 0;
        for leaf in &self.leaves {
            let end = start + leaf.len();
            if start < range.end && range.start < end {
                shared = Some(match shared {
                    None => leaf.marks.clone(),
                    Some(acc) => acc.intersection(&leaf.marks).copied().collect(),
                });
            }
            start = end;
        }
        shared
    }

    /// Add or remove `mark` on the chars in `range`
    pub fn with_mark(&self, range: Range<usize>, mark: Mark, add: bool) -> Text {
        let mut leaves = Vec::with_capacity(self.leaves.len() + 2);
        let mut start = 0;
        for leaf in &self.leaves {
            let end = start + leaf.len();
            let lo = range.start.clamp(start, end) - start;
            let hi = range.end.clamp(start, end) - start;
            let (before, rest) = split_chars(&leaf.text, lo);
            let (inside, after) = split_chars(rest, hi - lo);

            let mut marks = leaf.marks.clone();
            if add {
                marks.insert(mark);
            } else {
                marks.remove(&mark);
            }

            leaves.push(Leaf::new(before, leaf.marks.clone()));
            leaves.push(Leaf::new(inside, marks));
            leaves.push(Leaf::new(after, leaf.marks.clone()));
            start = end;
        }
        Text::new(leaves)
    }

    /// Split into the chars before `offset` and the chars from `offset` on
    pub fn split_at(&self, offset: usize) -> (Text, Text) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut start = 0;
        for leaf in &self.leaves {
            let end = start + leaf.len();
            if end <= offset {
                left.push(leaf.clone());
            } else if start >= offset {
                right.push(leaf.clone());
            } else {
                let (before, after) = split_chars(&leaf.text, offset - start);
                left.push(Leaf::new(before, leaf.marks.clone()));
                right.push(Leaf::new(after, leaf.marks.clone()));
            }
            start = end;
        }
        (Text::new(left), Text::new(right))
    }
}

fn split_chars(s: &str, at: usize) -> (&str, &str) {
    let byte = s.char_indices().nth(at).map_or(s.len(), |(i, _)| i);
    s.split_at(byte)
}

fn normalize_leaves(leaves: Vec<Leaf>) -> Vec<Leaf> {
    let mut out: Vec<Leaf> = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        if leaf.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(prev) if prev.marks == leaf.marks => prev.text.push_str(&leaf.text),
            _ => out.push(leaf),
        }
    }
    if out.is_empty() {
        out.push(Leaf::plain(""));
    }
    out
}

/// A container node with a type and ordered children.
///
/// Children sit behind `Arc` so that edits rebuild only the nodes along the
/// edited path and share every other subtree with the previous document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    kind: BlockType,
    #[serde(default)]
    nodes: Vec<Arc<Node>>,
}

impl Block {
    pub fn new(kind: BlockType, nodes: Vec<Node>) -> Self {
        Self::from_shared(kind, nodes.into_iter().map(Arc::new).collect())
    }

    pub fn from_shared(kind: BlockType, nodes: Vec<Arc<Node>>) -> Self {
        Self { kind, nodes }
    }

    /// Paragraph holding a single plain text
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockType::Paragraph, vec![Node::Text(Text::plain(text))])
    }

    pub fn kind(&self) -> BlockType {
        self.kind
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// Same children under a different type
    pub fn with_kind(&self, kind: BlockType) -> Block {
        Block {
            kind,
            nodes: self.nodes.clone(),
        }
    }

    /// Leaf blocks hold texts and inlines rather than other blocks
    pub fn is_leaf(&self) -> bool {
        !self
            .nodes
            .iter()
            .any(|node| matches!(node.as_ref(), Node::Block(_)))
    }
}

/// An inline element. Both inline types are void: their content comes from
/// `data` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inline {
    #[serde(rename = "type")]
    kind: InlineType,
    #[serde(default)]
    data: BTreeMap<String, String>,
    /// Runtime identity, used to key widget state. Never persisted.
    #[serde(skip, default = "Uuid::new_v4")]
    key: Uuid,
}

impl Inline {
    pub fn new(kind: InlineType, data: BTreeMap<String, String>) -> Self {
        Self {
            kind,
            data,
            key: Uuid::new_v4(),
        }
    }

    pub fn emoji(code: impl Into<String>) -> Self {
        Self::new(
            InlineType::Emoji,
            BTreeMap::from([("code".to_string(), code.into())]),
        )
    }

    /// An unbound field reference
    pub fn field() -> Self {
        Self::new(InlineType::Field, BTreeMap::new())
    }

    pub fn kind(&self) -> InlineType {
        self.kind
    }

    pub fn is_void(&self) -> bool {
        self.kind.is_void()
    }

    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.data.get(attribute).map(String::as_str)
    }

    pub fn key(&self) -> Uuid {
        self.key
    }

    /// Same identity, new attributes
    pub fn with_data(&self, data: BTreeMap<String, String>) -> Inline {
        Inline {
            kind: self.kind,
            data,
            key: self.key,
        }
    }
}

// Equality is structural; the key is identity, not content.
impl PartialEq for Inline {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.data == other.data
    }
}

/// A document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum Node {
    Block(Block),
    Inline(Inline),
    Text(Text),
}

impl Node {
    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_inline(&self) -> Option<&Inline> {
        match self {
            Node::Inline(inline) => Some(inline),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Children of a block; texts and void inlines have none
    pub fn nodes(&self) -> &[Arc<Node>] {
        match self {
            Node::Block(block) => block.nodes(),
            Node::Inline(_) | Node::Text(_) => &[],
        }
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<Inline> for Node {
    fn from(inline: Inline) -> Self {
        Node::Inline(inline)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

#[derive(Serialize, Deserialize)]
struct MarkRepr {
    #[serde(rename = "type")]
    kind: Mark,
}

#[derive(Serialize, Deserialize)]
struct LeafRepr {
    #[serde(default)]
    text: String,
    #[serde(default)]
    marks: Vec<MarkRepr>,
}

impl From<LeafRepr> for Leaf {
    fn from(repr: LeafRepr) -> Self {
        Leaf::new(repr.text, repr.marks.into_iter().map(|m| m.kind).collect())
    }
}

impl From<Leaf> for LeafRepr {
    fn from(leaf: Leaf) -> Self {
        LeafRepr {
            text: leaf.text,
            marks: leaf.marks.into_iter().map(|kind| MarkRepr { kind }).collect(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TextRepr {
    #[serde(default)]
    leaves: Vec<Leaf>,
}

impl From<TextRepr> for Text {
    fn from(repr: TextRepr) -> Self {
        Text::new(repr.leaves)
    }
}

impl From<Text> for TextRepr {
    fn from(text: Text) -> Self {
        TextRepr {
            leaves: text.leaves,
        }
    }
}
