use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::model::{Block, BlockType, Node, Path, Text};

/// The document root: an ordered sequence of top-level blocks.
///
/// Documents are values. Every builder returns a new document and leaves
/// `self` untouched; only the nodes along the edited path are rebuilt, every
/// other subtree is shared between the old and new document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    nodes: Vec<Arc<Node>>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            nodes: blocks.into_iter().map(|b| Arc::new(Node::Block(b))).collect(),
        }
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// Children of the node at `path`, or the top-level nodes for the root
    pub fn children(&self, path: &Path) -> Option<&[Arc<Node>]> {
        if path.is_empty() {
            return Some(&self.nodes);
        }
        self.node(path).map(|node| node.nodes())
    }

    pub fn node(&self, path: &Path) -> Option<&Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.nodes.get(*first)?.as_ref();
        for index in rest {
            node = node.nodes().get(*index)?.as_ref();
        }
        Some(node)
    }

    pub fn block(&self, path: &Path) -> Option<&Block> {
        self.node(path).and_then(Node::as_block)
    }

    pub fn text(&self, path: &Path) -> Option<&Text> {
        self.node(path).and_then(Node::as_text)
    }

    /// Every node in document order (pre-order), with its path
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self
                .nodes
                .iter()
                .enumerate()
                .rev()
                .map(|(i, node)| (Path::from([i]), node.as_ref()))
                .collect(),
        }
    }

    /// Every text node in document order
    pub fn texts(&self) -> impl Iterator<Item = (Path, &Text)> {
        self.descendants()
            .filter_map(|(path, node)| node.as_text().map(|text| (path, text)))
    }

    pub fn first_text(&self) -> Option<(Path, &Text)> {
        self.texts().next()
    }

    /// First text strictly after `path` in document order, skipping its
    /// descendants
    pub fn next_text(&self, path: &Path) -> Option<(Path, &Text)> {
        self.texts()
            .find(|(candidate, _)| candidate > path && !path.is_ancestor_of(candidate))
    }

    /// Nearest strict ancestor block of `path` satisfying `predicate`
    pub fn closest<F>(&self, path: &Path, predicate: F) -> Option<(Path, &Block)>
    where
        F: Fn(&Block) -> bool,
    {
        let mut current = path.parent()?;
        while !current.is_empty() {
            if let Some(block) = self.block(&current)
                && predicate(block)
            {
                return Some((current, block));
            }
            current = current.parent()?;
        }
        None
    }

    /// Nearest enclosing block of type `kind`
    pub fn closest_of_type(&self, path: &Path, kind: BlockType) -> Option<(Path, &Block)> {
        self.closest(path, |block| block.kind() == kind)
    }

    /// Replace the node at `path`
    pub fn replace_node(&self, path: &Path, node: Node) -> Result<Document, EditError> {
        let (parent, index) = split_path(path)?;
        self.splice(&parent, index..index + 1, vec![Arc::new(node)])
    }

    /// Insert `node` so that it ends up at `path`
    pub fn insert_node(&self, path: &Path, node: Node) -> Result<Document, EditError> {
        let (parent, index) = split_path(path)?;
        self.splice(&parent, index..index, vec![Arc::new(node)])
    }

    pub fn remove_node(&self, path: &Path) -> Result<Document, EditError> {
        let (parent, index) = split_path(path)?;
        self.splice(&parent, index..index + 1, Vec::new())
    }

    /// Wrap the children `lo..=hi` of `parent` in a new block of `kind`,
    /// placed at index `lo`
    pub fn wrap_nodes(
        &self,
        parent: &Path,
        lo: usize,
        hi: usize,
        kind: BlockType,
    ) -> Result<Document, EditError> {
        let children = self
            .children(parent)
            .ok_or_else(|| EditError::mismatch(parent, "no such parent"))?;
        if lo > hi || hi >= children.len() {
            return Err(EditError::mismatch(
                parent,
                format!("cannot wrap children {lo}..={hi} of {}", children.len()),
            ));
        }
        let wrapper = Block::from_shared(kind, children[lo..=hi].to_vec());
        self.splice(parent, lo..hi + 1, vec![Arc::new(Node::Block(wrapper))])
    }

    /// Remove the block at `path` and promote its children into its place
    pub fn unwrap_node(&self, path: &Path) -> Result<Document, EditError> {
        let block = self
            .block(path)
            .ok_or_else(|| EditError::mismatch(path, "not a block"))?;
        let (parent, index) = split_path(path)?;
        self.splice(&parent, index..index + 1, block.nodes().to_vec())
    }

    /// Replace the children `range` of `parent` with `replacement`.
    ///
    /// This is the one primitive every builder goes through: it copies the
    /// spine from the root down to `parent` and nothing else.
    pub fn splice(
        &self,
        parent: &Path,
        range: std::ops::Range<usize>,
        replacement: Vec<Arc<Node>>,
    ) -> Result<Document, EditError> {
        let nodes = splice_children(&self.nodes, parent, parent.indices(), range, replacement)?;
        Ok(Document { nodes })
    }
}

fn split_path(path: &Path) -> Result<(Path, usize), EditError> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(EditError::mismatch(path, "the root has no parent")),
    }
}

fn splice_children(
    original: &[Arc<Node>],
    full: &Path,
    remaining: &[usize],
    range: std::ops::Range<usize>,
    replacement: Vec<Arc<Node>>,
) -> Result<Vec<Arc<Node>>, EditError> {
    let mut children = original.to_vec();
    match remaining.split_first() {
        None => {
            if range.start > range.end || range.end > children.len() {
                return Err(EditError::mismatch(
                    full,
                    format!("range {range:?} outside {} children", children.len()),
                ));
            }
            children.splice(range, replacement);
        }
        Some((&index, rest)) => {
            let Some(Node::Block(block)) = original.get(index).map(|node| node.as_ref()) else {
                return Err(EditError::mismatch(full, "path does not lead through a block"));
            };
            let nodes = splice_children(block.nodes(), full, rest, range, replacement)?;
            children[index] = Arc::new(Node::Block(Block::from_shared(block.kind(), nodes)));
        }
    }
    Ok(children)
}

/// Pre-order iterator over a document's nodes
pub struct Descendants<'a> {
    stack: Vec<(Path, &'a Node)>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (Path, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (i, child) in node.nodes().iter().enumerate().rev() {
            self.stack.push((path.child(i), child.as_ref()));
        }
        Some((path, node))
    }
}
